/// Per-operation setting deciding what protocol-level errors do to the
/// delivered result. Transport failures are unaffected: they are never
/// silently dropped.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ErrorPolicy {
    /// Any error rejects the result; data is discarded even when the
    /// endpoint returned some.
    #[default]
    None,
    /// Protocol-level errors are dropped without being surfaced. The
    /// caller must not assume data completeness.
    Ignore,
    /// The result carries both data and errors, letting the caller
    /// inspect partial successes.
    All,
}

impl ErrorPolicy {
    pub fn is_default(&self) -> bool {
        matches!(self, ErrorPolicy::None)
    }
}
