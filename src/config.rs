use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_POOL_MAX_OPEN: u32 = 16;
const DEFAULT_CACHE_POOL_MIN_IDLE: u32 = 8;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub bind_address: String,
    pub port: u16,
    pub cache_pool_max_open: u32,
    pub cache_pool_min_idle: u32,
    pub cache_ttl: Duration,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cache_pool_max_open = parse_or(&lookup, "CACHE_POOL_MAX_OPEN", DEFAULT_CACHE_POOL_MAX_OPEN)?;
        let cache_pool_min_idle = parse_or(&lookup, "CACHE_POOL_MIN_IDLE", DEFAULT_CACHE_POOL_MIN_IDLE)?;
        if cache_pool_max_open == 0 || cache_pool_min_idle > cache_pool_max_open {
            return Err(ConfigError::Invalid {
                name: "CACHE_POOL_MIN_IDLE",
                value: cache_pool_min_idle.to_string(),
            });
        }

        let cache_ttl_seconds: u64 = parse_or(&lookup, "CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?;
        if cache_ttl_seconds == 0 {
            return Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECONDS",
                value: cache_ttl_seconds.to_string(),
            });
        }

        Ok(Config {
            database_url,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            cache_pool_max_open,
            cache_pool_min_idle,
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("DATABASE_URL", "mysql://root@localhost/nutrition")]).unwrap();
        assert_eq!(config.database_url, "mysql://root@localhost/nutrition");
        assert_eq!(config.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_pool_max_open, 16);
        assert_eq!(config.cache_pool_min_idle, 8);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(config_from(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            config_from(&[("DATABASE_URL", "")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("DATABASE_URL", "mysql://db/nutrition"),
            ("REDIS_URL", "redis://cache:6379"),
            ("PORT", "9000"),
            ("CACHE_TTL_SECONDS", " 5 "),
        ])
        .unwrap();
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.port, 9000);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            config_from(&[("DATABASE_URL", "mysql://db/x"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            })
        );
        assert!(config_from(&[
            ("DATABASE_URL", "mysql://db/x"),
            ("CACHE_POOL_MAX_OPEN", "4"),
            ("CACHE_POOL_MIN_IDLE", "8"),
        ])
        .is_err());
    }

    #[test]
    fn zero_cache_ttl_is_rejected() {
        assert_eq!(
            config_from(&[("DATABASE_URL", "mysql://db/x"), ("CACHE_TTL_SECONDS", "0")]),
            Err(ConfigError::Invalid {
                name: "CACHE_TTL_SECONDS",
                value: "0".to_string()
            })
        );
    }
}
