use serde::{Deserialize, Serialize};

/// Feature flags selecting which backing integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false`, so a missing or incomplete config file runs the service on the
/// in-memory store and blob store with no trace export.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub postgres: bool,
    #[serde(default)]
    pub s3: bool,
    #[serde(default)]
    pub telemetry: bool,
}

/// Tuning for the lawyer candidate suggestion on new disputes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

fn default_candidate_limit() -> usize {
    3
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub matching: MatchingConfig,
}
