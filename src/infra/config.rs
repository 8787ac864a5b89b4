//! Centralized configuration (environment variables + defaults).
//!
//! Values are read once at process start and handed to the rest of the crate by
//! reference. Nothing below the binaries touches the process environment.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const POTATO_TABLE: &str = "POTATO_TABLE";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const STORE_TIMEOUT_SECS: &str = "STORE_TIMEOUT_SECS";

pub const DEFAULT_TABLE: &str = "potatoes";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the remote data-API.
///
/// Missing values are kept as `None` instead of failing at startup: the server still
/// comes up, and every operation that needs the store fails closed with a
/// configuration error (see [`StoreConfig::credentials`]).
#[derive(Clone)]
pub struct StoreConfig {
    base_url: Option<String>,
    service_key: Option<String>,
    table: String,
}

/// Borrowed, validated view of a complete [`StoreConfig`].
#[derive(Clone, Copy)]
pub struct StoreCredentials<'a> {
    pub base_url: &'a str,
    pub service_key: &'a str,
    pub table: &'a str,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            base_url: non_blank(base_url.into()).map(|u| u.trim_end_matches('/').to_string()),
            service_key: non_blank(service_key.into()),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// A config with no store behind it. Every store-bound operation answers 500.
    pub fn unconfigured() -> Self {
        Self {
            base_url: None,
            service_key: None,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(SUPABASE_URL).unwrap_or_default();
        let service_key = lookup(SUPABASE_SERVICE_ROLE_KEY).unwrap_or_default();
        let mut config = Self::new(base_url, service_key);
        if let Some(table) = lookup(POTATO_TABLE).and_then(non_blank) {
            config.table = table;
        }
        config
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Returns the complete set of values needed to talk to the store, or the first
    /// missing/invalid one.
    pub fn credentials(&self) -> Result<StoreCredentials<'_>, ConfigError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ConfigError::Missing(SUPABASE_URL))?;
        let service_key = self
            .service_key
            .as_deref()
            .ok_or(ConfigError::Missing(SUPABASE_SERVICE_ROLE_KEY))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: SUPABASE_URL,
                reason: "expected an http(s) URL".to_string(),
            });
        }
        if !validate_ident(&self.table) {
            return Err(ConfigError::Invalid {
                name: POTATO_TABLE,
                reason: format!("'{}' is not a valid table name", self.table),
            });
        }
        Ok(StoreCredentials {
            base_url,
            service_key,
            table: &self.table,
        })
    }
}

// The service key must never end up in logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &self.service_key.as_ref().map(|_| "<redacted>"))
            .field("table", &self.table)
            .finish()
    }
}

/// Settings for the HTTP server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Upper bound on a single remote call. `None` means wait indefinitely.
    pub store_timeout: Option<Duration>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR)
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let store_timeout = match lookup(STORE_TIMEOUT_SECS).and_then(non_blank) {
            None => None,
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: STORE_TIMEOUT_SECS,
                    reason: format!("'{}' is not a whole number of seconds", raw),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: STORE_TIMEOUT_SECS,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            bind_addr,
            store_timeout,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
