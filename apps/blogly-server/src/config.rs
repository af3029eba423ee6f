//! Application configuration loaded from environment variables.

use std::env;

use blogly_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the app on the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Apply pending schema migrations once connected.
    pub auto_migrate: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
                min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
                log_sql: flag(env::var("DB_LOG_SQL").ok().as_deref(), defaults.log_sql),
                ..defaults
            }
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            auto_migrate: flag(env::var("DB_AUTO_MIGRATE").ok().as_deref(), true),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// An on/off variable; unset falls back to `default`.
fn flag(value: Option<&str>, default: bool) -> bool {
    value.map(is_truthy).unwrap_or(default)
}

pub(crate) fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("true"));
        assert!(is_truthy(" 1 "));
        assert!(is_truthy("YES"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_flag_falls_back_when_unset() {
        // DB_AUTO_MIGRATE is on unless turned off explicitly.
        assert!(flag(None, true));
        assert!(!flag(Some("false"), true));
        assert!(!flag(Some("0"), true));
        assert!(flag(Some("1"), false));
        assert!(!flag(None, false));
    }
}
