//! Error types for ntverify.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! the specific failure. At the dispatcher boundary every kind is folded
//! into a failed outcome; none of them terminates the exercising process.

use std::path::PathBuf;

use thiserror::Error;

/// Local field addressing errors.
///
/// These always indicate a mismatch between the client and the served
/// schema and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    #[error("Field '{path}' does not exist")]
    NotFound {
        path: String,
    },

    #[error("Field '{path}' is {actual}, expected {expected}")]
    KindMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Union at '{path}' has no value selected")]
    EmptyUnion {
        path: String,
    },

    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath {
        path: String,
        reason: String,
    },
}

impl FieldAccessError {
    /// Rewrites the path this error refers to.
    ///
    /// Leaf values report errors relative to themselves; the accessor that
    /// resolved the leaf calls this to attach the full dotted path.
    #[must_use]
    pub fn at(self, full_path: &str) -> Self {
        let path = full_path.to_string();
        match self {
            Self::NotFound { .. } => Self::NotFound { path },
            Self::KindMismatch {
                expected, actual, ..
            } => Self::KindMismatch {
                path,
                expected,
                actual,
            },
            Self::EmptyUnion { .. } => Self::EmptyUnion { path },
            Self::InvalidPath { reason, .. } => Self::InvalidPath { path, reason },
        }
    }

    /// Returns the path this error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::KindMismatch { path, .. }
            | Self::EmptyUnion { path }
            | Self::InvalidPath { path, .. } => path,
        }
    }
}

/// A named record could not be bound to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Channel '{name}' unavailable: {reason}")]
pub struct ChannelUnavailableError {
    pub name: String,
    pub reason: String,
}

impl ChannelUnavailableError {
    /// Creates a new unavailable-channel error.
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while a request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection to '{channel}' lost: {message}")]
    ConnectionLost {
        channel: String,
        message: String,
    },

    #[error("Put to '{channel}' rejected: {reason}")]
    Rejected {
        channel: String,
        reason: String,
    },

    #[error("Failed to serialize request: {message}")]
    SerializationFailed {
        message: String,
    },

    #[error("Server error (code {code}): {message}")]
    ServerError {
        code: u32,
        message: String,
    },
}

/// The dispatcher has no verifier registered under the requested name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Channel '{name}' not recognised")]
pub struct UnrecognizedChannelError {
    pub name: String,
}

/// Errors loading a [`crate::config::DemoConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {reason}")]
    Invalid {
        reason: String,
    },
}

/// Top-level error type for ntverify.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Field access error: {0}")]
    FieldAccess(#[from] FieldAccessError),

    #[error("{0}")]
    ChannelUnavailable(#[from] ChannelUnavailableError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    UnrecognizedChannel(#[from] UnrecognizedChannelError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl DemoError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a field access error.
    #[must_use]
    pub const fn is_field_access(&self) -> bool {
        matches!(self, Self::FieldAccess(_))
    }

    /// Returns true if the channel could not be bound.
    #[must_use]
    pub const fn is_channel_unavailable(&self) -> bool {
        matches!(self, Self::ChannelUnavailable(_))
    }

    /// Returns true if this is a transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if the dispatcher did not recognise the channel.
    #[must_use]
    pub const fn is_unrecognized_channel(&self) -> bool {
        matches!(self, Self::UnrecognizedChannel(_))
    }

    /// Returns true if this error might go away on a later attempt.
    ///
    /// Retrying is the transport collaborator's business; this only
    /// classifies.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::FieldAccess(_) | Self::UnrecognizedChannel(_) | Self::Internal { .. } => false,
            Self::ChannelUnavailable(_) => true,
            Self::Transport(e) => match e {
                TransportError::ConnectionLost { .. } => true,
                TransportError::ServerError { code, .. } => *code >= 500,
                TransportError::Rejected { .. } | TransportError::SerializationFailed { .. } => {
                    false
                }
            },
        }
    }
}

/// Result type alias for ntverify operations.
pub type DemoResult<T> = Result<T, DemoError>;
