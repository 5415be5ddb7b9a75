use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use mealdeck_mealplan::{CommandOptions, LayoutOptions};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_move_retries")]
    pub move_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            move_retries: default_move_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl PersistenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn command_options(&self) -> CommandOptions {
        CommandOptions {
            timeout: self.timeout(),
            move_retries: self.move_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_move_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_page_height")]
    pub page_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_height: default_page_height(),
        }
    }
}

impl ExportConfig {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            page_height: self.page_height,
        }
    }
}

fn default_page_height() -> u32 {
    LayoutOptions::default().page_height
}

/// Lines restart at this height on a fresh page.
const PAGE_TOP: u32 = 20;

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy DATABASE_URL
    /// 2. Environment variables (MEALDECK__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("database.url", "sqlite:mealdeck.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MEALDECK")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.persistence.timeout_ms == 0 {
            return Err("Persistence timeout_ms must be greater than 0".to_string());
        }
        if self.export.page_height <= PAGE_TOP {
            return Err(format!(
                "Export page_height must be greater than {PAGE_TOP}"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            persistence: PersistenceConfig::default(),
            observability: ObservabilityConfig::default(),
            export: ExportConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = valid();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = valid();
        config.persistence.timeout_ms = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_page_height() {
        let mut config = valid();
        config.export.page_height = 20;
        assert!(config.validate().is_err());

        config.export.page_height = 21;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_command_options_from_persistence() {
        let options = PersistenceConfig {
            timeout_ms: 1500,
            move_retries: 4,
            retry_backoff_ms: 50,
        }
        .command_options();

        assert_eq!(options.timeout, Duration::from_millis(1500));
        assert_eq!(options.move_retries, 4);
        assert_eq!(options.retry_backoff, Duration::from_millis(50));
    }

    #[test]
    fn test_load_from_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("mealdeck.toml");
        std::fs::write(
            &path,
            "[persistence]\ntimeout_ms = 3000\n\n[export]\npage_height = 400\n",
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap().to_owned())).unwrap();

        assert_eq!(config.persistence.timeout_ms, 3000);
        assert_eq!(config.persistence.move_retries, 2);
        assert_eq!(config.export.page_height, 400);
        assert!(config.database.max_connections >= 1);
    }
}
