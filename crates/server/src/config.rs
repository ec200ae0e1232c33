use shared_types::{AppConfig, FeatureFlags, MatchingConfig, DEFAULT_MAX_UPLOAD_BYTES};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` and store it in the global `OnceLock`. Safe to call
/// multiple times; only the first call has effect.
///
/// Runs before the tracing subscriber exists (the telemetry flag lives in
/// this file), so it reports through stderr.
pub fn load_config() {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config: AppConfig = toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("[config] Failed to parse {CONFIG_PATH}: {e}; using defaults");
                AppConfig::default()
            });
            eprintln!("[config] Feature flags: {:?}", config.features);
            config
        }
        Err(e) => {
            eprintln!("[config] {CONFIG_PATH} not found ({e}); using defaults");
            AppConfig::default()
        }
    });
}

/// Loaded feature flags, or all-false defaults before `load_config()`.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        postgres: false,
        s3: false,
        telemetry: false,
    };
    CONFIG.get().map(|c| &c.features).unwrap_or(&DEFAULT)
}

pub fn matching_config() -> MatchingConfig {
    CONFIG.get().map(|c| c.matching.clone()).unwrap_or_default()
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub upload_max_bytes: usize,
    pub candidate_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            upload_max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            candidate_limit: MatchingConfig::default().candidate_limit,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT").unwrap_or(defaults.port),
            upload_max_bytes: env_parse("UPLOAD_MAX_BYTES").unwrap_or(defaults.upload_max_bytes),
            candidate_limit: matching_config().candidate_limit,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
