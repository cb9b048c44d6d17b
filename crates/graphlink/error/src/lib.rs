mod location;
mod network;
mod path;

use std::borrow::Cow;

pub use location::*;
pub use network::*;
pub use path::*;

/// A protocol-level error returned by the endpoint alongside (possibly
/// partial) data. Produced by the remote side, never synthesized locally.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ErrorPath>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.extend(locations);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<ErrorPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message.fmt(f)
    }
}

/// The caller-facing aggregate: at most one transport failure plus any
/// number of protocol-level errors, whichever channels the attempt
/// produced. Built once per delivered result.
#[derive(Debug, Clone, Default)]
pub struct CombinedError {
    pub network_error: Option<NetworkError>,
    pub graphql_errors: Vec<GraphqlError>,
}

impl CombinedError {
    pub fn from_network(error: NetworkError) -> Self {
        CombinedError {
            network_error: Some(error),
            graphql_errors: Vec::new(),
        }
    }

    pub fn from_graphql(errors: Vec<GraphqlError>) -> Self {
        CombinedError {
            network_error: None,
            graphql_errors: errors,
        }
    }

    pub fn is_network(&self) -> bool {
        self.network_error.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.network_error.is_none() && self.graphql_errors.is_empty()
    }

    /// The most relevant single message, transport failures first.
    pub fn message(&self) -> Cow<'static, str> {
        if let Some(error) = &self.network_error {
            return error.to_string().into();
        }
        self.graphql_errors
            .first()
            .map(|error| error.message.clone())
            .unwrap_or_else(|| "Unknown error".into())
    }
}

impl std::fmt::Display for CombinedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.message().fmt(f)
    }
}

impl std::error::Error for CombinedError {}

impl From<NetworkError> for CombinedError {
    fn from(error: NetworkError) -> Self {
        CombinedError::from_network(error)
    }
}
