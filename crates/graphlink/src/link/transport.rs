use std::time::Duration;

use bytes::Bytes;

use crate::{
    classify,
    fetch::{FetchRequest, Fetcher},
    link::{Link, Next},
    NetworkError, Operation, Outcome,
};

/// The terminal link: serializes the operation into a GraphQL-over-HTTP
/// POST, performs the exchange and classifies whatever comes back. It
/// never forwards; reaching it terminates the attempt.
pub struct TransportLink {
    fetcher: Fetcher,
    url: url::Url,
    default_timeout: Duration,
    default_headers: http::HeaderMap,
}

impl TransportLink {
    pub fn new(fetcher: Fetcher, url: url::Url, default_timeout: Duration) -> Self {
        TransportLink {
            fetcher,
            url,
            default_timeout,
            default_headers: http::HeaderMap::new(),
        }
    }

    /// Headers attached to every exchange; per-operation headers win on
    /// conflict.
    #[must_use]
    pub fn with_default_headers(mut self, headers: http::HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }
}

#[async_trait::async_trait]
impl Link for TransportLink {
    async fn handle(&self, operation: Operation, _next: Next) -> Outcome {
        let body = match serde_json::to_vec(&operation.request_body()) {
            Ok(body) => Bytes::from(body),
            Err(error) => {
                return Outcome::Failure(NetworkError::Request(format!(
                    "could not serialize request body: {error}"
                )))
            }
        };

        let mut headers = self.default_headers.clone();
        for (name, value) in operation.headers() {
            headers.insert(name.clone(), value.clone());
        }
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static(
                "application/graphql-response+json; charset=utf-8, application/json; charset=utf-8",
            ),
        );

        let request = FetchRequest {
            url: &self.url,
            headers,
            body,
            timeout: operation.timeout().unwrap_or(self.default_timeout),
        };

        tracing::debug!(
            operation = operation.name().unwrap_or_default(),
            url = %self.url,
            "dispatching request"
        );

        let result = self.fetcher.fetch(request).await;

        if let Err(error) = &result {
            tracing::error!("request to {} failed with: {error}", self.url);
        }

        classify(result)
    }
}
