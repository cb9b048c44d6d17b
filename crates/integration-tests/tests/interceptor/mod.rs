use std::sync::atomic::Ordering;

use graphlink::{link::ErrorLink, Client, ErrorPolicy, Fetcher, Operation};
use graphlink_reqwest::NativeFetcher;
use integration_tests::{fetch::ScriptedFetcher, runtime};
use serde_json::json;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

#[test]
fn named_operations_can_suppress_their_errors_under_every_policy() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "ignored downstream" }],
            })))
            .mount(&server)
            .await;

        let client = Client::builder()
            .endpoint(url::Url::parse(&server.uri()).unwrap())
            .fetcher(NativeFetcher::new().unwrap().into_fetcher())
            .link(ErrorLink::new(|context| {
                if context.operation().name() == Some("IgnoreErrorsQuery") {
                    context.suppress_graphql_errors();
                }
            }))
            .build()
            .unwrap();

        for policy in [ErrorPolicy::None, ErrorPolicy::Ignore, ErrorPolicy::All] {
            let response = client
                .execute(
                    Operation::new("query IgnoreErrorsQuery { field }")
                        .with_name("IgnoreErrorsQuery")
                        .with_error_policy(policy),
                )
                .await
                .unwrap();
            assert!(response.error.is_none(), "policy {policy} surfaced an error");
        }

        // Other operations keep their errors.
        let error = client
            .execute(Operation::new("query Other { field }").with_name("Other"))
            .await
            .unwrap_err();
        assert_eq!(error.graphql_errors.len(), 1);
    });
}

#[test]
fn each_requested_retry_is_an_independent_transport_attempt() {
    runtime().block_on(async {
        let fetcher = ScriptedFetcher::new([
            Ok((200, r#"{"errors":[{"message":"flaky"}]}"#)),
            Ok((200, r#"{"errors":[{"message":"flaky"}]}"#)),
            Ok((200, r#"{"data":{"steady":true}}"#)),
        ]);
        let attempts = fetcher.attempts();

        let client = Client::builder()
            .endpoint(url::Url::parse("http://127.0.0.1:1/graphql").unwrap())
            .fetcher(Fetcher::new(fetcher))
            .link(ErrorLink::new(|context| {
                if !context.graphql_errors().is_empty() {
                    context.request_retry();
                }
            }))
            .build()
            .unwrap();

        let response = client.execute(Operation::new("{ steady }")).await.unwrap();

        // Only the last attempt's outcome propagated.
        assert_eq!(response.data.unwrap()["steady"], true);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    });
}

#[test]
fn callbacks_can_rewrite_the_outcome_in_place() {
    runtime().block_on(async {
        let fetcher = ScriptedFetcher::new([Ok((200, r#"{"errors":[{"message":"secret detail"}]}"#))]);

        let client = Client::builder()
            .endpoint(url::Url::parse("http://127.0.0.1:1/graphql").unwrap())
            .fetcher(Fetcher::new(fetcher))
            .link(ErrorLink::new(|context| {
                if let graphlink::Outcome::Response { errors, .. } = context.outcome_mut() {
                    for error in errors {
                        error.message = "redacted".into();
                    }
                }
            }))
            .build()
            .unwrap();

        let error = client.execute(Operation::new("{ field }")).await.unwrap_err();
        assert_eq!(error.graphql_errors[0].message, "redacted");
    });
}
