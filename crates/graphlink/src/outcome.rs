use error::{GraphqlError, NetworkError};

/// The result of one transport attempt, as seen by the chain.
///
/// A transport failure precludes a protocol-level response, so a
/// `Failure` can never carry data or protocol errors. Partial success
/// is the other way around: a `Response` may carry both.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The exchange never produced a usable GraphQL response.
    Failure(NetworkError),
    /// The endpoint answered with a response envelope.
    Response {
        data: Option<serde_json::Value>,
        errors: Vec<GraphqlError>,
    },
}

impl Outcome {
    pub fn from_data(data: serde_json::Value) -> Self {
        Outcome::Response {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            Outcome::Failure(_) => None,
            Outcome::Response { data, .. } => data.as_ref(),
        }
    }

    pub fn graphql_errors(&self) -> &[GraphqlError] {
        match self {
            Outcome::Failure(_) => &[],
            Outcome::Response { errors, .. } => errors,
        }
    }

    pub fn network_error(&self) -> Option<&NetworkError> {
        match self {
            Outcome::Failure(error) => Some(error),
            Outcome::Response { .. } => None,
        }
    }

    /// Whether either failure channel is populated.
    pub fn has_errors(&self) -> bool {
        match self {
            Outcome::Failure(_) => true,
            Outcome::Response { errors, .. } => !errors.is_empty(),
        }
    }

    /// A clean response: data without any error on either channel.
    pub fn is_clean(&self) -> bool {
        matches!(self, Outcome::Response { data: Some(_), errors } if errors.is_empty())
    }
}

impl From<NetworkError> for Outcome {
    fn from(error: NetworkError) -> Self {
        Outcome::Failure(error)
    }
}
