//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `RECIPES_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`,
//!   then to `sqlite://recipes.db?mode=rwc`)
//! - `RECIPES_HOST` - Bind address (default: 127.0.0.1)
//! - `RECIPES_PORT` - Listen port (default: 5000)
//! - `RECIPES_CORS_ORIGINS` - Comma-separated allowed origins (default: any origin)
//! - `RECIPES_SEED_ON_STARTUP` - Seed sample recipes into an empty store (default: true)
//! - `RECIPES_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 0.1)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://recipes.db?mode=rwc";
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 5000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Server application configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Store connection URL (may carry credentials for remote stores)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// Seed sample recipes at startup when the recipe table is empty
    pub seed_on_startup: bool,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("seed_on_startup", &self.seed_on_startup)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = database_url_from(&lookup);
        let host = parse_or("RECIPES_HOST", &lookup, DEFAULT_HOST)?;
        let port = parse_or("RECIPES_PORT", &lookup, DEFAULT_PORT)?;
        let cors_origins = lookup("RECIPES_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let seed_on_startup = parse_or("RECIPES_SEED_ON_STARTUP", &lookup, true)?;
        let log_format = parse_or("RECIPES_LOG_FORMAT", &lookup, LogFormat::Text)?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = sample_rate("SENTRY_SAMPLE_RATE", &lookup, 1.0)?;
        let sentry_traces_sample_rate = sample_rate("SENTRY_TRACES_SAMPLE_RATE", &lookup, 0.1)?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            seed_on_startup,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Database URL with fallback to the generic `DATABASE_URL`.
fn database_url_from<F>(lookup: &F) -> SecretString
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("RECIPES_DATABASE_URL")
        .or_else(|| lookup("DATABASE_URL"))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
    SecretString::from(url)
}

/// Parse a variable if set, otherwise use the default.
fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse a Sentry sample rate, which must lie in `0.0..=1.0`.
fn sample_rate<F>(key: &str, lookup: &F, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let rate: f32 = parse_or(key, lookup, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url.expose_secret(), DEFAULT_DATABASE_URL);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(config.cors_origins.is_empty());
        assert!(config.seed_on_startup);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_url_fallback() {
        let config = config_from(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite::memory:");

        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("RECIPES_DATABASE_URL", "sqlite://other.db"),
        ])
        .unwrap();
        assert_eq!(config.database_url.expose_secret(), "sqlite://other.db");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RECIPES_HOST", "0.0.0.0"),
            ("RECIPES_PORT", "8080"),
            ("RECIPES_CORS_ORIGINS", "http://localhost:3000, https://recipes.example ,"),
            ("RECIPES_SEED_ON_STARTUP", "false"),
            ("RECIPES_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://recipes.example"]
        );
        assert!(!config.seed_on_startup);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("RECIPES_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("RECIPES_PORT"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let err = config_from(&[("SENTRY_SAMPLE_RATE", "1.5")]).unwrap_err();
        assert!(err.to_string().contains("SENTRY_SAMPLE_RATE"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[
            ("RECIPES_DATABASE_URL", "sqlite://secret-path.db"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-path"));
        assert!(!debug.contains("key@sentry"));
        assert!(debug.contains("[REDACTED]"));
    }
}
