use std::{sync::Arc, time::Duration};

use http::HeaderMap;

use crate::ErrorPolicy;

/// One logical GraphQL request with its per-request configuration.
///
/// Cloning is cheap (the document is shared), which is what a retry
/// does: a new attempt carrying the same logical request.
#[derive(Debug, Clone)]
pub struct Operation {
    name: Option<String>,
    document: Arc<str>,
    variables: serde_json::Map<String, serde_json::Value>,
    error_policy: Option<ErrorPolicy>,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl Operation {
    pub fn new(document: impl Into<Arc<str>>) -> Self {
        Operation {
            name: None,
            document: document.into(),
            variables: serde_json::Map::new(),
            error_policy: None,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn variables(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.variables
    }

    /// The per-operation policy override, if any. The client default
    /// applies otherwise.
    pub fn error_policy(&self) -> Option<ErrorPolicy> {
        self.error_policy
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The standard GraphQL-over-HTTP POST body.
    pub(crate) fn request_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("query".into(), self.document.as_ref().into());
        if let Some(name) = &self.name {
            body.insert("operationName".into(), name.as_str().into());
        }
        if !self.variables.is_empty() {
            body.insert("variables".into(), serde_json::Value::Object(self.variables.clone()));
        }
        serde_json::Value::Object(body)
    }
}
