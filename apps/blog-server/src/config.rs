//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_infra::DatabaseConfig;

/// Largest url-encoded form body accepted, in bytes (2.5 MiB).
pub const DEFAULT_MAX_FORM_BYTES: usize = 2_621_440;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub auto_migrate: bool,
    /// Upper bound on a submitted post form body.
    pub max_form_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let defaults = DatabaseConfig::new(url);
                DatabaseConfig {
                    max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS")
                        .unwrap_or(defaults.max_connections),
                    min_connections: parsed(&lookup, "DB_MIN_CONNECTIONS")
                        .unwrap_or(defaults.min_connections),
                    connect_timeout: parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS")
                        .map(Duration::from_secs)
                        .unwrap_or(defaults.connect_timeout),
                    ..defaults
                }
            });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            database,
            auto_migrate: lookup("DB_AUTO_MIGRATE")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            max_form_bytes: parsed(&lookup, "MAX_FORM_BYTES")
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_MAX_FORM_BYTES),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
