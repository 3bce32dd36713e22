//! Validated server configuration.
//!
//! # Invariants
//! - A `ServerConfig` that passed [`ServerConfig::validate`] has a non-empty
//!   signing secret, a positive token lifetime and a positive pool size.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use wordcards_core::DEFAULT_TOKEN_TTL;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_HTTP_WORKERS: usize = 4;
pub const DEFAULT_DB_POOL_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptySecret,
    ZeroTokenTtl,
    ZeroPoolSize,
    ZeroWorkers,
    EmptyBindAddr,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "JWT secret must not be empty"),
            Self::ZeroTokenTtl => write!(f, "token lifetime must be positive"),
            Self::ZeroPoolSize => write!(f, "database pool size must be positive"),
            Self::ZeroWorkers => write!(f, "HTTP worker count must be positive"),
            Self::EmptyBindAddr => write!(f, "bind address must not be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Everything `run` needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub http_workers: usize,
    pub db_pool_size: usize,
}

impl ServerConfig {
    pub fn new(database_path: impl Into<PathBuf>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_path: database_path.into(),
            jwt_secret: jwt_secret.into(),
            token_ttl: DEFAULT_TOKEN_TTL,
            http_workers: DEFAULT_HTTP_WORKERS,
            db_pool_size: DEFAULT_DB_POOL_SIZE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::EmptyBindAddr);
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::ZeroTokenTtl);
        }
        if self.db_pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.http_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        ServerConfig::new("/tmp/wordcards.db", "secret")
            .validate()
            .expect("defaults should validate");
    }

    #[test]
    fn rejects_empty_secret_and_zero_limits() {
        let mut config = ServerConfig::new("/tmp/wordcards.db", "");
        assert_eq!(config.validate(), Err(ConfigError::EmptySecret));

        config.jwt_secret = "secret".to_string();
        config.token_ttl = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTokenTtl));

        config.token_ttl = Duration::from_secs(60);
        config.db_pool_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPoolSize));
    }
}
