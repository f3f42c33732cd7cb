//! Server configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Listener and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Frontend origin used for payment redirects.
    pub frontend_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Seconds between rollovers; 0 disables the schedule.
    pub rollover_interval_secs: u64,
    /// Compare-and-swap snapshot updates.
    pub conditional_updates: bool,
    /// Attempts per signal when `conditional_updates` is on.
    pub max_update_attempts: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            rollover_interval_secs: 30 * 24 * 60 * 60, // 30 days
            conditional_updates: false,
            max_update_attempts: 5,
        }
    }
}

/// Payment gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Public key id handed to the checkout widget.
    pub key_id: String,
    /// Secret used to verify payment signatures.
    pub key_secret: String,
    /// Plan new subscriptions are created for.
    pub plan_id: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            key_id: "rzp_test_key".to_string(),
            key_secret: "change-me-in-production".to_string(),
            plan_id: "plan_monthly".to_string(),
        }
    }
}

/// Outbound mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Address contact messages go to.
    pub inbox: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            inbox: "contact@coursebundler.local".to_string(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub stats: StatsConfig,
    pub payments: PaymentsConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    /// Parses configuration from TOML text. Missing sections use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    AppConfig::from_toml(&content)
}

/// Loads configuration, falling back to defaults when the file is absent.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_config(path)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.stats.rollover_interval_secs, 30 * 24 * 60 * 60);
        assert!(!config.stats.conditional_updates);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [stats]
            conditional_updates = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.stats.conditional_updates);
        assert_eq!(config.stats.max_update_attempts, 5);
        assert_eq!(config.mail.inbox, "contact@coursebundler.local");
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::from_toml("[server]\nport = \"not a number\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = load_config_or_default("/nonexistent/coursebundler.toml").unwrap();
        assert_eq!(config.payments.plan_id, "plan_monthly");

        assert!(matches!(
            load_config("/nonexistent/coursebundler.toml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
