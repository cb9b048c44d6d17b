use graphlink::{Client, ErrorPolicy, Operation};
use graphlink_reqwest::NativeFetcher;
use indoc::indoc;
use integration_tests::runtime;
use serde_json::json;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

const QUERY: &str = indoc! {r#"
    query Good {
        goodField
    }
"#};

fn partial_success_body() -> serde_json::Value {
    json!({
        "data": { "goodField": "x" },
        "errors": [{ "message": "bad" }],
    })
}

fn client(server: &MockServer) -> Client {
    Client::builder()
        .endpoint(url::Url::parse(&server.uri()).unwrap())
        .fetcher(NativeFetcher::new().unwrap().into_fetcher())
        .build()
        .unwrap()
}

#[test]
fn default_policy_rejects_and_discards_data() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial_success_body()))
            .mount(&server)
            .await;

        let error = client(&server)
            .execute(Operation::new(QUERY))
            .await
            .unwrap_err();

        assert!(!error.is_network());
        assert_eq!(error.graphql_errors.len(), 1);
        assert_eq!(error.graphql_errors[0].message, "bad");
    });
}

#[test]
fn ignore_delivers_data_and_swallows_errors() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial_success_body()))
            .mount(&server)
            .await;

        let response = client(&server)
            .execute(Operation::new(QUERY).with_error_policy(ErrorPolicy::Ignore))
            .await
            .unwrap();

        assert!(response.error.is_none());
        insta::assert_json_snapshot!(response.data, @r###"
        {
          "goodField": "x"
        }
        "###);
    });
}

#[test]
fn all_delivers_both_channels() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial_success_body()))
            .mount(&server)
            .await;

        let response = client(&server)
            .execute(Operation::new(QUERY).with_error_policy(ErrorPolicy::All))
            .await
            .unwrap();

        insta::assert_json_snapshot!(response.data, @r###"
        {
          "goodField": "x"
        }
        "###);
        let error = response.error.unwrap();
        assert_eq!(error.graphql_errors.len(), 1);
        assert_eq!(error.graphql_errors[0].message, "bad");
    });
}

#[test]
fn server_failures_without_an_envelope_reject_under_every_policy() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        for policy in [ErrorPolicy::None, ErrorPolicy::Ignore] {
            let error = client(&server)
                .execute(Operation::new(QUERY).with_error_policy(policy))
                .await
                .unwrap_err();
            assert!(error.is_network());
            assert_eq!(
                error.network_error.as_ref().unwrap().status_code(),
                Some(http::StatusCode::BAD_GATEWAY)
            );
        }

        // `all` never rejects; the failure rides along instead.
        let response = client(&server)
            .execute(Operation::new(QUERY).with_error_policy(ErrorPolicy::All))
            .await
            .unwrap();
        assert!(response.data.is_none());
        assert!(response.error.unwrap().is_network());
    });
}

#[test]
fn the_client_default_policy_applies_when_operations_carry_none() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial_success_body()))
            .mount(&server)
            .await;

        let client = Client::builder()
            .endpoint(url::Url::parse(&server.uri()).unwrap())
            .fetcher(NativeFetcher::new().unwrap().into_fetcher())
            .default_error_policy(ErrorPolicy::Ignore)
            .build()
            .unwrap();

        let response = client.execute(Operation::new(QUERY)).await.unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.data.unwrap()["goodField"], "x");
    });
}
