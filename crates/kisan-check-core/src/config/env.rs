// crates/kisan-check-core/src/config/env.rs
// ============================================================================
// Module: Checker Environment
// Description: Environment-backed configuration layer.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerEnv {
    /// Registry base URL override.
    BaseUrl,
    /// Timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Config file path.
    ConfigPath,
}

impl CheckerEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 3] = [Self::BaseUrl, Self::TimeoutSeconds, Self::ConfigPath];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "KISAN_CHECK_BASE_URL",
            Self::TimeoutSeconds => "KISAN_CHECK_TIMEOUT_SEC",
            Self::ConfigPath => "KISAN_CHECK_CONFIG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Values supplied through environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Registry base URL override.
    pub base_url: Option<String>,
    /// Timeout override.
    pub timeout: Option<Duration>,
    /// Config file path.
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let base_url = read_env_nonempty(CheckerEnv::BaseUrl.as_str())?;
        let timeout = read_env_nonempty(CheckerEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(CheckerEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let config_path = read_env_nonempty(CheckerEnv::ConfigPath.as_str())?.map(PathBuf::from);
        Ok(Self {
            base_url,
            timeout,
            config_path,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &'static str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::InvalidUtf8 {
            name,
        })
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &'static str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty {
            name: name.to_string(),
        }),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidTimeout {
        name: name.to_string(),
    };
    let secs: u64 = raw.trim().parse().map_err(|_| invalid())?;
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}
