use bytes::Bytes;
use error::{GraphqlError, NetworkError};

use crate::Outcome;

/// The GraphQL-over-HTTP response envelope. Only consumed, never
/// produced.
#[derive(serde::Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// Sorts one raw transport exchange into exactly one of the failure
/// channels, or a clean success.
///
/// Classification always produces an `Outcome`; a body that cannot be
/// read as an envelope is normalized into a `NetworkError` so that
/// downstream code only ever handles two failure kinds.
pub fn classify(result: Result<http::Response<Bytes>, NetworkError>) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(error) => return Outcome::Failure(error),
    };

    let status = response.status();
    let body = response.into_body();

    match serde_json::from_slice::<ResponseEnvelope>(&body) {
        Ok(envelope) if envelope.data.is_some() || !envelope.errors.is_empty() => Outcome::Response {
            data: envelope.data,
            errors: envelope.errors,
        },
        Ok(_) if status.is_success() => Outcome::Response {
            data: None,
            errors: Vec::new(),
        },
        // An empty envelope on a failure status carries nothing worth
        // classifying as a protocol response.
        Ok(_) => Outcome::Failure(NetworkError::UnexpectedStatus {
            status,
            body: Some(String::from_utf8_lossy(&body).into_owned()),
        }),
        Err(error) if status.is_success() => Outcome::Failure(NetworkError::MalformedResponse(error.to_string())),
        Err(_) => Outcome::Failure(NetworkError::UnexpectedStatus {
            status,
            body: Some(String::from_utf8_lossy(&body).into_owned()),
        }),
    }
}
