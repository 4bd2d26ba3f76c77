//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.
//! Command-line values win over environment variables, which win over defaults.

use std::{
    fmt::Display,
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
};

use card_brawl::hub::DEFAULT_MAILBOX_CAPACITY;

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Largest accepted per-client mailbox
pub const MAX_MAILBOX_CAPACITY: usize = 1024;

/// Complete server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Directory holding `cards/` and `static/`
    pub assets_dir: PathBuf,
    /// Frames a streaming client may lag behind before eviction
    pub mailbox_capacity: usize,
    /// Prometheus exporter address, disabled when `None`
    pub metrics_bind: Option<SocketAddr>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<SocketAddr>,
    pub assets_dir: Option<PathBuf>,
    pub mailbox_capacity: Option<usize>,
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => match parse_var(&lookup, "SERVER_BIND")? {
                Some(bind) => bind,
                None => parse_value("SERVER_BIND", DEFAULT_BIND)?,
            },
        };

        let assets_dir = overrides
            .assets_dir
            .or_else(|| lookup("ASSETS_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let mailbox_capacity = match overrides.mailbox_capacity {
            Some(capacity) => capacity,
            None => parse_var(&lookup, "MAILBOX_CAPACITY")?.unwrap_or(DEFAULT_MAILBOX_CAPACITY),
        };

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_var(&lookup, "METRICS_BIND")?,
        };

        Ok(ServerConfig {
            bind,
            assets_dir,
            mailbox_capacity,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 || self.mailbox_capacity > MAX_MAILBOX_CAPACITY {
            return Err(ConfigError::Invalid {
                var: "MAILBOX_CAPACITY".to_string(),
                reason: format!("Must be between 1 and {MAX_MAILBOX_CAPACITY}"),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server address ({})", self.bind),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn cards_dir(&self) -> PathBuf {
        self.assets_dir.join("cards")
    }

    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.assets_dir.join("static")
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| parse_value(key, &value))
        .transpose()
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("{e} (got {value:?})"),
    })
}
