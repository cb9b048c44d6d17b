use dashmap::DashMap;

use crate::{
    link::{Link, Next},
    Operation, Outcome,
};

/// A short-circuiting link: answers previously seen operations from an
/// in-process map without forwarding. Only clean outcomes (data, no
/// error on either channel) are stored, so a cached answer is always a
/// plain success.
#[derive(Default)]
pub struct CacheLink {
    entries: DashMap<String, serde_json::Value>,
}

impl CacheLink {
    pub fn new() -> Self {
        CacheLink::default()
    }

    fn key(operation: &Operation) -> String {
        let mut key = String::new();
        if let Some(name) = operation.name() {
            key.push_str(name);
        }
        key.push('\0');
        key.push_str(operation.document());
        key.push('\0');
        key.push_str(&serde_json::Value::Object(operation.variables().clone()).to_string());
        key
    }
}

#[async_trait::async_trait]
impl Link for CacheLink {
    async fn handle(&self, operation: Operation, next: Next) -> Outcome {
        let key = Self::key(&operation);

        if let Some(data) = self.entries.get(&key) {
            tracing::debug!(
                operation = operation.name().unwrap_or_default(),
                "serving operation from cache"
            );
            return Outcome::from_data(data.clone());
        }

        let outcome = next.forward(operation).await;

        if outcome.is_clean() {
            if let Some(data) = outcome.data() {
                self.entries.insert(key, data.clone());
            }
        }

        outcome
    }
}
