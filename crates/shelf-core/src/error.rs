//! Error types shared across Shelf crates

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by `SignalDebouncer::start`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DebounceError {
    /// `start` was called while a subscription is still live.
    ///
    /// Programming error: stop the existing handle first.
    #[error("signal debouncer already started; stop the current subscription first")]
    AlreadyStarted,

    /// The raw signal source cannot register listeners on this platform.
    ///
    /// Not retried; the caller decides whether to disable the feature.
    #[error("signal source '{source_name}' unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// No tokio runtime is available to drive the settle timer.
    #[error("no tokio runtime available to drive the debounce task")]
    NoRuntime,
}

impl DebounceError {
    /// Shorthand for [`DebounceError::SourceUnavailable`]
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
