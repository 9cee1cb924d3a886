use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

use crate::services::variant::Variant;

/// Main configuration for the R-AI assistant
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Which chat variant to run
    pub variant: Variant,

    /// Directory holding the local key/value storage
    pub data_dir: PathBuf,

    /// Directory CSV exports are written to
    pub export_dir: PathBuf,

    /// Artificial latency before a reply is produced, in milliseconds
    #[validate(range(max = 60000))]
    pub mock_delay_ms: u64,

    /// Longest accepted message, in characters
    #[validate(range(min = 1, max = 100000))]
    pub max_message_length: usize,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,

    /// Fixed seed for reproducible replies; random when unset
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            data_dir: default_home().join("data"),
            export_dir: PathBuf::from("."),
            mock_delay_ms: 1500,
            max_message_length: 16000,
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Config::default();
        let settings = config::Config::builder()
            // Core defaults
            .set_default("variant", defaults.variant.to_string())?
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("export_dir", ".")?
            .set_default("mock_delay_ms", defaults.mock_delay_ms)?
            .set_default("max_message_length", defaults.max_message_length as u64)?
            .set_default("log_level", "info")?
            // Load from ~/.rai/config.toml (if present)
            .add_source(
                config::File::with_name(&default_home().join("config").to_string_lossy())
                    .required(false),
            )
            // Environment overrides: RAI__VARIANT, RAI__MOCK_DELAY_MS, etc.
            .add_source(config::Environment::with_prefix("RAI").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    /// `rai_advising=<level>` unless the level already carries directives.
    pub fn log_directive(&self) -> String {
        if self.log_level.contains('=') {
            self.log_level.clone()
        } else {
            format!("rai_advising={}", self.log_level)
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rai")
}
