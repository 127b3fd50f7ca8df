//! Configuration types for schema merging.

use serde::{Deserialize, Serialize};

/// How to resolve two different schemas for the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Any field mismatch is an error. Identical columns merge cleanly.
    #[default]
    Strict,
    /// Keep the receiver's column and log a warning.
    PreferExisting,
    /// Replace the receiver's column with the incoming one and log a warning.
    PreferIncoming,
}

/// Top-level configuration for [`Schema::merge_with`](crate::Schema::merge_with).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Resolution applied to every overlapping column.
    #[serde(default)]
    pub policy: MergePolicy,
}

impl MergeConfig {
    #[must_use]
    pub fn with_policy(policy: MergePolicy) -> Self {
        Self { policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_config_defaults_to_strict() {
        let config = MergeConfig::default();
        assert_eq!(config.policy, MergePolicy::Strict);
    }

    #[test]
    fn merge_config_from_json() {
        let config: MergeConfig = serde_json::from_str(r#"{"policy": "prefer_incoming"}"#).unwrap();
        assert_eq!(config.policy, MergePolicy::PreferIncoming);

        let config: MergeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.policy, MergePolicy::Strict);
    }
}
