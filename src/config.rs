//! Service configuration read from the environment (and `.env`).

use std::time::Duration;

use thiserror::Error;

use crate::conversation::templates::Storefront;
use crate::conversation::EngineSettings;
use crate::notify::DEFAULT_SUBJECT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// PostgreSQL URL; without it sessions and orders are kept in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub nats_url: Option<String>,
    pub nats_subject: String,
    pub order_persist_timeout: Duration,
    pub session_idle_timeout: Duration,
    pub storefront: Storefront,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Storefront::default();

        Ok(Self {
            port: parse(&get, "PORT", 8083)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            nats_url: get("NATS_URL"),
            nats_subject: get("NATS_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            order_persist_timeout: Duration::from_millis(parse(&get, "ORDER_PERSIST_TIMEOUT_MS", 5_000)?),
            session_idle_timeout: Duration::from_secs(parse(&get, "SESSION_IDLE_TIMEOUT_SECS", 86_400)?),
            storefront: Storefront {
                support_phone: get("SUPPORT_PHONE").unwrap_or(defaults.support_phone),
                support_email: get("SUPPORT_EMAIL").unwrap_or(defaults.support_email),
            },
        })
    }

    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        let idle_timeout = chrono::Duration::from_std(self.session_idle_timeout).map_err(|e| ConfigError::InvalidValue {
            key: "SESSION_IDLE_TIMEOUT_SECS".to_string(),
            message: e.to_string(),
        })?;
        Ok(EngineSettings { persist_timeout: self.order_persist_timeout, idle_timeout })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 8083);
        assert!(c.database_url.is_none());
        assert!(c.nats_url.is_none());
        assert_eq!(c.nats_subject, "oxiva.orders.placed");
        assert_eq!(c.order_persist_timeout, Duration::from_secs(5));
        assert_eq!(c.engine_settings().unwrap().idle_timeout, chrono::Duration::hours(24));
    }

    #[test]
    fn test_overrides() {
        let c = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/oxiva"),
            ("ORDER_PERSIST_TIMEOUT_MS", "250"),
            ("SUPPORT_PHONE", "0212 111 22 33"),
            ("NATS_URL", "  "),
        ]).unwrap();
        assert_eq!(c.port, 9000);
        assert_eq!(c.database_url.as_deref(), Some("postgres://localhost/oxiva"));
        assert_eq!(c.order_persist_timeout, Duration::from_millis(250));
        assert_eq!(c.storefront.support_phone, "0212 111 22 33");
        assert!(c.nats_url.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
