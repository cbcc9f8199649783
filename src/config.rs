use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::store::StoreSettings;

/// Application configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub max_files: usize,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Load the demo projects, consultants and messages at startup
    pub seed_demo_data: bool,
    /// Author recorded on feedback notes
    pub note_author: String,
    /// Days between an invitation and the interview it schedules
    pub invitation_lead_days: i64,
    /// Events buffered per subscriber
    pub event_buffer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Prefix for consultant ids minted from intake payloads
    pub consultant_id_prefix: String,
    pub default_project_name: String,
    pub default_company: String,
    pub default_description: String,
    /// Duration used when the payload has no usable `total_time`
    pub default_duration_days: u32,
    pub unspecified_location: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            max_files: 5,
            format: "text".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let settings = StoreSettings::default();
        Self {
            seed_demo_data: false,
            note_author: settings.note_author,
            invitation_lead_days: settings.invitation_lead_days,
            event_buffer: settings.event_buffer,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            consultant_id_prefix: "api-".to_string(),
            default_project_name: "New Project".to_string(),
            default_company: "Company".to_string(),
            default_description: "Project description".to_string(),
            default_duration_days: 30,
            unspecified_location: "Unspecified".to_string(),
        }
    }
}

impl From<&StoreConfig> for StoreSettings {
    fn from(config: &StoreConfig) -> Self {
        Self {
            note_author: config.note_author.clone(),
            invitation_lead_days: config.invitation_lead_days,
            event_buffer: config.event_buffer,
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default`, `config/local` and `staffing` files
    /// when present, then `STAFFING_*` environment variables
    /// (`STAFFING_STORE__NOTE_AUTHOR=...`).
    pub fn load() -> Result<Self> {
        let builder = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("staffing").required(false))
            .add_source(Self::environment());
        Self::finish(builder)
    }

    /// Load configuration from an explicit file on top of the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let builder = Self::builder()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment());
        Self::finish(builder)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Config::try_from(&Self::default()).context("Failed to encode default configuration")?;
        Ok(Config::builder().add_source(defaults))
    }

    fn environment() -> Environment {
        Environment::with_prefix("STAFFING")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let app_config: Self = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if self.logging.max_files == 0 {
            return Err(anyhow::anyhow!("max_files must be greater than 0"));
        }

        // Validate store config
        if self.store.note_author.trim().is_empty() {
            return Err(anyhow::anyhow!("note_author cannot be empty"));
        }
        if self.store.invitation_lead_days < 0 {
            return Err(anyhow::anyhow!("invitation_lead_days cannot be negative"));
        }
        if self.store.event_buffer == 0 {
            return Err(anyhow::anyhow!("event_buffer must be greater than 0"));
        }

        // Validate intake config
        if self.intake.consultant_id_prefix.trim().is_empty() {
            return Err(anyhow::anyhow!("consultant_id_prefix cannot be empty"));
        }
        if self.intake.default_duration_days == 0 {
            return Err(anyhow::anyhow!("default_duration_days must be greater than 0"));
        }

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Store settings derived from the `store` section
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings::from(&self.store)
    }
}
