use std::time::Duration;

/// A transport-level failure. At most one per attempt, and mutually
/// exclusive with a protocol-level response: when the exchange itself
/// fails there is no envelope to read errors or data from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The exchange could not be completed at all.
    #[error("{0}")]
    Request(String),
    /// The exchange did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The server answered outside the success range without a usable
    /// GraphQL response body.
    #[error("server returned {status}")]
    UnexpectedStatus {
        status: http::StatusCode,
        body: Option<String>,
    },
    /// The response body could not be read as a GraphQL envelope.
    #[error("could not deserialize response body: {0}")]
    MalformedResponse(String),
}

impl NetworkError {
    pub fn any(error: impl ToString) -> Self {
        NetworkError::Request(error.to_string())
    }

    pub fn status_code(&self) -> Option<http::StatusCode> {
        match self {
            NetworkError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, when the server answered at all.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            NetworkError::UnexpectedStatus { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
