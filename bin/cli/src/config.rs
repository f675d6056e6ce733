//! CLI configuration.
//!
//! Loaded via the `config` crate from `FLOWDECK_*` environment variables.
//! Nested keys use `__`, so `FLOWDECK_EDITOR__ALLOW_SELF_LOOPS=true` sets
//! [`EditorSettings::allow_self_loops`].

use flowdeck_workflow::EditorSettings;
use serde::Deserialize;

/// Configuration for the `flowdeck` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Policies for decoding and editing flows.
    #[serde(default)]
    pub editor: EditorSettings,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            editor: EditorSettings::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but has the wrong type.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("FLOWDECK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
