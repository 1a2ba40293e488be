use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Audit-trail sheet the dashboard reads from.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api.sheety.co/3f8ed38ec6cb4d5131024c60be0f9f80/antibioticDeEscalationAuditTrail/sheet1";

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),

    #[error("Invalid bind address {0}")]
    InvalidAddress(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream_url: String,
    pub poll_interval_secs: u64,
    pub upstream_timeout_secs: u64,
    pub recent_limit: usize,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            poll_interval_secs: 30,
            upstream_timeout_secs: 10,
            recent_limit: 10,
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            upstream_url: var_or("UPSTREAM_URL", defaults.upstream_url)?,
            poll_interval_secs: parse_or("POLL_INTERVAL_SECS", defaults.poll_interval_secs)?
                .max(1),
            upstream_timeout_secs: parse_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs)?
                .max(1),
            recent_limit: parse_or("RECENT_LIMIT", defaults.recent_limit)?,
            host: var_or("BACKEND_HOST", defaults.host)?,
            port: parse_or("BACKEND_PORT", defaults.port)?,
            frontend_url: var_or("FRONTEND_URL", defaults.frontend_url)?,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs.max(1))
    }

    /// Socket address the API server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn var_or(key: &str, default: String) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key.to_string())),
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(value.trim().parse().unwrap_or(default)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key.to_string())),
    }
}
