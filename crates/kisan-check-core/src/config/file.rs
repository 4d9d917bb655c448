// crates/kisan-check-core/src/config/file.rs
// ============================================================================
// Module: Checker Config File
// Description: Optional TOML configuration file.
// Purpose: Persist a target registry and timeout between runs.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! The config file is a small TOML document:
//!
//! ```toml
//! base_url = "http://localhost:3000"
//! timeout_secs = 10
//! ```
//!
//! Unknown keys are rejected and reads are bounded by [`MAX_CONFIG_FILE_BYTES`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted config file size.
pub const MAX_CONFIG_FILE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: File Schema
// ============================================================================

/// Values supplied through the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Registry base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized, or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = read_text_with_limit(path)?;
        Self::parse(path, &text)
    }

    /// Parses config text attributed to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid for this schema.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            error: err.to_string(),
        })?;
        if file.base_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(ConfigError::Empty {
                name: "base_url".to_string(),
            });
        }
        Ok(file)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a UTF-8 file while enforcing [`MAX_CONFIG_FILE_BYTES`].
fn read_text_with_limit(path: &Path) -> Result<String, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(MAX_CONFIG_FILE_BYTES).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_CONFIG_FILE_BYTES,
        });
    }
    let mut text = String::new();
    file.take(limit.saturating_add(1)).read_to_string(&mut text).map_err(io_error)?;
    if text.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: u64::try_from(text.len()).unwrap_or(u64::MAX),
            limit: MAX_CONFIG_FILE_BYTES,
        });
    }
    Ok(text)
}
