// crates/kisan-check-core/src/config/mod.rs
// ============================================================================
// Module: Checker Configuration
// Description: Layered configuration for the conformance checker.
// Purpose: Resolve the target base URL and request timeout with strict validation.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is resolved in layers: built-in defaults, an optional TOML
//! file, environment variables, then explicit overrides (CLI flags). Each
//! layer only replaces the values it sets.
//! Invariants:
//! - The base URL is `http` or `https` and carries a host.
//! - The timeout is a positive whole number of seconds.
//! - Invalid inputs fail closed before any request is sent.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::CheckerEnv;
pub use env::EnvConfig;
pub use env::read_env_strict;
pub use file::ConfigFile;
pub use file::MAX_CONFIG_FILE_BYTES;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Registry deployment probed when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://jaivikkheti.preview.emergentagent.com";

/// Per-request timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds invalid UTF-8.
    #[error("{name} must be valid UTF-8")]
    InvalidUtf8 {
        /// Environment variable name.
        name: &'static str,
    },
    /// A value is set but empty.
    #[error("{name} must not be empty")]
    Empty {
        /// Source of the value (environment variable or config key).
        name: String,
    },
    /// A timeout is not a positive whole number of seconds.
    #[error("{name} must be a positive integer number of seconds")]
    InvalidTimeout {
        /// Source of the value (environment variable, config key, or flag).
        name: String,
    },
    /// The base URL cannot be used as a registry root.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// Rejected URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The config file exceeds [`MAX_CONFIG_FILE_BYTES`].
    #[error("config file {} is {size} bytes (limit {limit})", path.display())]
    TooLarge {
        /// Config file path.
        path: PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Allowed size in bytes.
        limit: usize,
    },
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file {}: {error}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        error: String,
    },
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Highest-precedence configuration values, typically from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
    /// Explicit registry base URL.
    pub base_url: Option<String>,
    /// Explicit timeout in seconds.
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// SECTION: Resolved Config
// ============================================================================

/// Validated checker configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Registry base URL (the API lives under `/api`).
    base_url: Url,
    /// Timeout applied to every request.
    timeout: Duration,
}

impl CheckerConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is unusable or the timeout is zero.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                name: "timeout".to_string(),
            });
        }
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout,
        })
    }

    /// Resolves configuration from the process environment and `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any layer holds an invalid value.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, EnvConfig::load()?)
    }

    /// Resolves configuration from explicit layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any layer holds an invalid value.
    pub fn resolve(overrides: &ConfigOverrides, env: EnvConfig) -> Result<Self, ConfigError> {
        let path = overrides.config_path.clone().or(env.config_path);
        let file = match path {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };

        let base_url = overrides
            .base_url
            .clone()
            .or(env.base_url)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = if let Some(secs) = overrides.timeout_secs {
            timeout_from_secs("--timeout-secs", secs)?
        } else if let Some(timeout) = env.timeout {
            timeout
        } else if let Some(secs) = file.timeout_secs {
            timeout_from_secs("timeout_secs", secs)?
        } else {
            DEFAULT_TIMEOUT
        };

        Self::new(&base_url, timeout)
    }

    /// Returns the registry base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the API root (`<base_url>/api`) without a trailing slash.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.as_str().trim_end_matches('/'))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates a registry base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("must not be empty"));
    }
    let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }
    Ok(url)
}

/// Converts a whole-second timeout, rejecting zero.
fn timeout_from_secs(name: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            name: name.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
