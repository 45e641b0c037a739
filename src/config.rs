use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::middleware::rate_limiter::RateLimiter;
use crate::services::scraper_service::PhotoSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub auto_migrate: bool,
    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
    pub trust_proxy_headers: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub photo_source: Arc<dyn PhotoSource>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let defaults = Config::with_defaults(database_url, jwt_secret);

        Ok(Config {
            server_host: env::var("HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("PORT", defaults.server_port)?,
            jwt_expires_in: parse_var("JWT_EXPIRATION_MINUTES", defaults.jwt_expires_in)?,
            auto_migrate: parse_var("AUTO_MIGRATE", defaults.auto_migrate)?,
            rate_limit_max: parse_var("RATE_LIMIT_MAX", defaults.rate_limit_max)?,
            rate_limit_window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", defaults.rate_limit_window_secs)?,
            trust_proxy_headers: parse_var("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers)?,
            ..defaults
        })
    }

    /// Configuration with every optional setting at its default.
    pub fn with_defaults(database_url: String, jwt_secret: String) -> Config {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            database_url,
            jwt_secret,
            jwt_expires_in: 24 * 60,
            auto_migrate: true,
            rate_limit_max: 30,
            rate_limit_window_secs: 60,
            trust_proxy_headers: false,
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_settings() {
        let cfg = Config::with_defaults("sqlite::memory:".into(), "secret".into());
        assert_eq!(cfg.server_port, 3000);
        assert_eq!(cfg.jwt_expires_in, 1440);
        assert!(cfg.auto_migrate);
        assert!(!cfg.trust_proxy_headers);
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let port: u16 = parse_var("FLICKGRAM_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }
}
