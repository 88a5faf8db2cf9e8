//! Error types for vnodectl-core

use std::path::PathBuf;
use thiserror::Error;

/// Controller error type
///
/// Every variant is terminal to the call that produced it. Nothing in this
/// crate retries.
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration is missing or unusable
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The resolved utility path does not exist or is not executable
    #[error("executable not found: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    /// The console process could not be started
    #[error("session start failed: {0}")]
    SessionStart(String),

    /// Invalid or missing argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Structured read issued without a matching show
    #[error("protocol sequence error: {0}")]
    ProtocolSequence(&'static str),

    /// No prompt observed within the bound
    #[error("session timed out after {0}ms")]
    SessionTimeout(u64),

    /// The console exited while a command was in flight
    #[error("session closed")]
    SessionClosed,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether the controller is still usable after this error
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::ProtocolSequence(_) | Self::SessionTimeout(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
