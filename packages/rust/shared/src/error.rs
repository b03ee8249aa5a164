//! Error types for stackbff.
//!
//! Library crates use [`BffError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all stackbff operations.
///
/// The first four variants are the failures a caller of the content core can
/// see. None of them carry partial results.
#[derive(Debug, thiserror::Error)]
pub enum BffError {
    /// A required identifier was missing or blank.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Network failure or non-2xx response from the delivery API.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status, when the server answered at all.
        status: Option<u16>,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A selection that needs exactly one entry got none.
    #[error("no entries found in response for {context}")]
    EmptyResult { context: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BffError>;

impl BffError {
    /// Create an invalid-argument error from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    /// Create a transport error with no HTTP status (connect, timeout, body read).
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            status: None,
        }
    }

    /// Create a transport error for a non-2xx HTTP status.
    pub fn http_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            message: msg.into(),
            status: Some(status),
        }
    }

    /// Create a decode error from any displayable message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Create an empty-result error naming what was being selected.
    pub fn empty_result(context: impl Into<String>) -> Self {
        Self::EmptyResult {
            context: context.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status reported by the upstream, if this is a status failure.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
