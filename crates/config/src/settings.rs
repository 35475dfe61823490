//! Tool settings
//!
//! Settings are layered with Figment: built-in defaults, then `RUST_LOG`,
//! then `ENVFLAT_`-prefixed environment variables.

use crate::flatten::{CollisionPolicy, Flattener, DEFAULT_SEPARATOR};
use crate::validation::SettingsValidator;
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use types::SettingsError;

/// Prefix of the environment variables read into [`Settings`]
pub const ENV_PREFIX: &str = "ENVFLAT_";

/// Settings taken from the environment as plain strings
const RAW_KEYS: [&str; 3] = ["separator", "log_level", "log_format"];

/// Runtime settings for flattening and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Join string between path segments
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Handling of flattened key collisions
    #[serde(default)]
    pub on_collision: CollisionPolicy,
    /// Log level or tracing filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log format (pretty, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_figment(Self::figment())
    }

    /// Provider stack used by [`Settings::load`]
    ///
    /// String-valued keys are read verbatim so values such as
    /// `ENVFLAT_SEPARATOR=0` are not typed into numbers or booleans.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Ok(filter) = std::env::var("RUST_LOG") {
            figment = figment.merge(Serialized::default("log_level", filter));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&RAW_KEYS));
        for key in RAW_KEYS {
            let var = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// Extract and validate settings from an arbitrary provider stack
    pub fn from_figment(figment: Figment) -> Result<Self, SettingsError> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| SettingsError::Extract(e.to_string()))?;

        let report = SettingsValidator::validate(&settings);
        if let Some(error) = report.errors.into_iter().next() {
            return Err(SettingsError::ValidationError {
                field: error.field.to_string(),
                message: error.message,
            });
        }

        Ok(settings)
    }

    /// Log non-fatal validation findings
    ///
    /// Call once a subscriber is installed; [`Settings::load`] runs before
    /// logging is initialized.
    pub fn log_warnings(&self) {
        for warning in SettingsValidator::validate(self).warnings {
            warn!(field = %warning.field, "{}", warning.message);
        }
    }

    /// Flattener configured from these settings
    pub fn flattener(&self) -> Flattener {
        Flattener::new(self.separator.clone(), self.on_collision)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            on_collision: CollisionPolicy::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
