//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Event lifecycle configuration.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Fan out snapshots to subscribers after each successful write.
    #[serde(default = "default_notify_subscribers")]
    pub notify_subscribers: bool,
}

fn default_notify_subscribers() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notify_subscribers: default_notify_subscribers(),
        }
    }
}

/// One entry of the configured lost-reason list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LostReasonConfig {
    /// Reason code shown to staff (e.g. "Budget").
    pub code: String,
    /// Whether a competitor reference must accompany this reason.
    #[serde(default)]
    pub requires_competitor: bool,
}

impl LostReasonConfig {
    fn new(code: &str, requires_competitor: bool) -> Self {
        Self {
            code: code.to_string(),
            requires_competitor,
        }
    }
}

/// Event lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Reason codes accepted for a transition into `lost`.
    #[serde(default = "default_lost_reasons")]
    pub lost_reasons: Vec<LostReasonConfig>,
}

fn default_lost_reasons() -> Vec<LostReasonConfig> {
    vec![
        LostReasonConfig::new("Budget", false),
        LostReasonConfig::new("Competition", true),
        LostReasonConfig::new("Date Unavailable", false),
        LostReasonConfig::new("Venue Issue", false),
        LostReasonConfig::new("No Response", false),
        LostReasonConfig::new("Other", false),
    ]
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            lost_reasons: default_lost_reasons(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "caterbook=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CATERBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
