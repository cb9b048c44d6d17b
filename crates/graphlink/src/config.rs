use std::{collections::BTreeMap, time::Duration};

use crate::ErrorPolicy;

/// Client settings, deserializable from the host application's own
/// configuration file.
#[serde_with::serde_as]
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Endpoint the terminal link posts operations to.
    pub endpoint: Option<url::Url>,
    /// Timeout in seconds for operations that don't carry their own.
    #[serde_as(as = "Option<serde_with::DurationSeconds<u64>>")]
    pub timeout: Option<Duration>,
    /// Policy applied when an operation doesn't choose one.
    pub error_policy: ErrorPolicy,
    /// Static headers attached to every operation.
    pub headers: BTreeMap<String, String>,
    /// Transport retry settings.
    pub retry: RetryConfig,
}

#[serde_with::serde_as]
#[derive(Debug, serde::Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Should transport failures be retried at all.
    pub enabled: bool,
    /// How many retries are available per second, at a minimum.
    pub min_per_second: Option<u32>,
    /// For how long the budget remembers successful exchanges, in
    /// seconds.
    #[serde_as(as = "Option<serde_with::DurationSeconds<u64>>")]
    pub ttl: Option<Duration>,
    /// The fraction of the successful-exchange budget that can be spent
    /// on retries.
    pub retry_percent: Option<f32>,
}
