//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use gplib_types::TypeMismatch;
use thiserror::Error;

/// Errors that can occur while loading, reading or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not a flat JSON object of strings, or a value failed to
    /// decode as the kind its default declares. Never partially applied.
    #[error("invalid config file {}{}: {message}", path.display(), key_suffix(key))]
    InvalidConfig {
        path: PathBuf,
        /// The offending key, when a single value failed to decode.
        key: Option<String>,
        message: String,
    },

    /// The backing file could not be read or written.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Encoding the map as JSON failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No value is stored under the key.
    #[error("missing config key: {0}")]
    MissingKey(String),

    /// A typed getter asked for the wrong kind.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
}

impl ConfigError {
    /// Returns `true` for the invalid-config kind.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" (key {k:?})"))
        .unwrap_or_default()
}

/// Convenience alias used throughout the config crate.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
