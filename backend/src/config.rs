//! Configuration management for the Plant Scheduling service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PSCHED_ prefix
//!
//! Database credentials are optional. When any of them is missing the
//! service starts in mock mode backed by fixture data.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Shared secret expected in the `x-api-key` header. Gating is off when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQL Server host name
    #[serde(default)]
    pub host: Option<String>,

    /// SQL Server port
    pub port: u16,

    /// Database name
    #[serde(default)]
    pub name: Option<String>,

    /// SQL login
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Require TLS encryption
    pub encrypt: bool,

    /// Accept the server certificate without validation
    pub trust_server_certificate: bool,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connection_timeout_secs: u64,
}

/// Complete set of SQL Server credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    /// Credentials if all of them are configured, `None` means mock mode
    pub fn credentials(&self) -> Option<DatabaseCredentials> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Some(DatabaseCredentials {
            host: present(&self.host)?,
            database: present(&self.name)?,
            user: present(&self.user)?,
            password: self.password.clone().filter(|p| !p.is_empty())?,
        })
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment_overrides())
    }

    fn load_with(overrides: Environment) -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PSCHED_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.port", 1433)?
            .set_default("database.encrypt", true)?
            .set_default("database.trust_server_certificate", false)?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PSCHED__ prefix)
            .add_source(overrides)
            .build()?;

        config.try_deserialize()
    }

    /// API key with blank values treated as unset
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// `PSCHED__SECTION__KEY` variables. Values stay strings until they are
/// deserialized, so secrets such as `0123` keep their leading zeros.
fn environment_overrides() -> Environment {
    Environment::with_prefix("PSCHED").separator("__")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 1433,
            name: None,
            user: None,
            password: None,
            encrypt: true,
            trust_server_certificate: false,
            max_connections: 10,
            connection_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_database() -> DatabaseConfig {
        DatabaseConfig {
            host: Some("sql.plant.local".to_string()),
            name: Some("Produccion".to_string()),
            user: Some("scale".to_string()),
            password: Some("s3cret".to_string()),
            ..DatabaseConfig::default()
        }
    }

    #[test]
    fn test_credentials_present() {
        let creds = full_database().credentials().unwrap();
        assert_eq!(creds.host, "sql.plant.local");
        assert_eq!(creds.database, "Produccion");
    }

    #[test]
    fn test_missing_credentials_select_mock_mode() {
        assert!(DatabaseConfig::default().credentials().is_none());

        let mut no_password = full_database();
        no_password.password = None;
        assert!(no_password.credentials().is_none());

        let mut blank_host = full_database();
        blank_host.host = Some("   ".to_string());
        assert!(blank_host.credentials().is_none());
    }

    #[test]
    fn test_numeric_looking_secrets_keep_their_text() {
        let vars: std::collections::HashMap<String, String> = [
            ("PSCHED__DATABASE__PASSWORD", "0123"),
            ("PSCHED__API_KEY", "000042"),
            ("PSCHED__SERVER__PORT", "8080"),
            ("PSCHED__DATABASE__ENCRYPT", "false"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::load_with(environment_overrides().source(Some(vars))).unwrap();
        assert_eq!(config.database.password.as_deref(), Some("0123"));
        assert_eq!(config.api_key(), Some("000042"));
        assert_eq!(config.server.port, 8080);
        assert!(!config.database.encrypt);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let mut config = Config::default();
        assert_eq!(config.api_key(), None);
        config.api_key = Some("  ".to_string());
        assert_eq!(config.api_key(), None);
        config.api_key = Some("k-123".to_string());
        assert_eq!(config.api_key(), Some("k-123"));
    }
}
