use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} not set. Terminating application...")]
    MissingVar(&'static str),

    #[error("Environment variable {0} has an invalid value: {1}")]
    InvalidVar(&'static str, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let host = match lookup("HOST") {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidVar("HOST", host))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar("PORT", port))?,
            None => 8000,
        };

        Ok(Self {
            database_url,
            addr: SocketAddr::new(host, port),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));
        assert_eq!(
            err.to_string(),
            "Environment variable DATABASE_URL not set. Terminating application..."
        );
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "sqlite://todo.db?mode=rwc")]).unwrap();
        assert_eq!(config.database_url, "sqlite://todo.db?mode=rwc");
        assert_eq!(config.addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_host_and_port() {
        let config = load(&[
            ("DATABASE_URL", "sqlite://todo.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("DATABASE_URL", "sqlite://todo.db"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar("PORT", _)));
    }
}
