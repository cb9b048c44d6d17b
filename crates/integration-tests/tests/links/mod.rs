use std::sync::atomic::Ordering;

use graphlink::{
    link::{CacheLink, RetryLink},
    Client, Fetcher, NetworkError, Operation,
};
use graphlink_reqwest::NativeFetcher;
use integration_tests::{fetch::ScriptedFetcher, runtime};
use serde_json::json;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

#[test]
fn a_cache_hit_short_circuits_the_chain() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "me": { "id": "1" } },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder()
            .endpoint(url::Url::parse(&server.uri()).unwrap())
            .fetcher(NativeFetcher::new().unwrap().into_fetcher())
            .link(CacheLink::new())
            .build()
            .unwrap();

        let operation = Operation::new("query Me { me { id } }").with_name("Me");

        let first = client.execute(operation.clone()).await.unwrap();
        let second = client.execute(operation).await.unwrap();

        assert_eq!(first.data, second.data);
        // The mock's expect(1) verifies on drop that no second exchange
        // happened.
    });
}

#[test]
fn operations_with_different_variables_do_not_share_cache_entries() {
    runtime().block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "name": "someone" } },
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = Client::builder()
            .endpoint(url::Url::parse(&server.uri()).unwrap())
            .fetcher(NativeFetcher::new().unwrap().into_fetcher())
            .link(CacheLink::new())
            .build()
            .unwrap();

        let document = "query User($id: ID!) { user(id: $id) { name } }";
        client
            .execute(Operation::new(document).with_variable("id", "1"))
            .await
            .unwrap();
        client
            .execute(Operation::new(document).with_variable("id", "2"))
            .await
            .unwrap();
    });
}

#[test]
fn transport_failures_are_retried_within_budget() {
    runtime().block_on(async {
        let fetcher = ScriptedFetcher::new([
            Err(NetworkError::any("connection reset")),
            Err(NetworkError::any("connection reset")),
            Ok((200, r#"{"data":{"steady":true}}"#)),
        ]);
        let attempts = fetcher.attempts();

        let client = Client::builder()
            .endpoint(url::Url::parse("http://127.0.0.1:1/graphql").unwrap())
            .fetcher(Fetcher::new(fetcher))
            .link(RetryLink::default())
            .build()
            .unwrap();

        let response = client.execute(Operation::new("{ steady }")).await.unwrap();
        assert_eq!(response.data.unwrap()["steady"], true);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    });
}

#[test]
fn protocol_errors_are_not_retried_by_the_retry_link() {
    runtime().block_on(async {
        let fetcher = ScriptedFetcher::new([Ok((200, r#"{"errors":[{"message":"bad"}]}"#))]);
        let attempts = fetcher.attempts();

        let client = Client::builder()
            .endpoint(url::Url::parse("http://127.0.0.1:1/graphql").unwrap())
            .fetcher(Fetcher::new(fetcher))
            .link(RetryLink::default())
            .build()
            .unwrap();

        let error = client.execute(Operation::new("{ field }")).await.unwrap_err();
        assert!(!error.is_network());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    });
}
