//! Error types for rewindrs.

use std::{fmt, io};

/// Errors that can occur while reading from or managing a rewindable reader.
#[derive(Debug)]
pub enum RewindError {
    /// The reader (or its source) has been closed.
    ClosedChannel,

    /// The requested operation is not valid in the current state.
    ///
    /// Rewind failures carry a message starting with `"cannot rewind"`.
    IllegalState(&'static str),

    /// Retaining more bytes would exceed the configured limit.
    RetainLimitExceeded {
        /// The configured maximum number of retained bytes.
        limit: usize,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// An I/O error reported by the underlying source.
    Io(io::Error),
}

impl fmt::Display for RewindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewindError::ClosedChannel => write!(f, "channel closed"),
            RewindError::IllegalState(message) => write!(f, "illegal state: {}", message),
            RewindError::RetainLimitExceeded { limit } => {
                write!(f, "retain limit exceeded: {} bytes", limit)
            }
            RewindError::InvalidConfig { message } => write!(f, "invalid config: {}", message),
            RewindError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for RewindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RewindError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RewindError {
    fn from(e: io::Error) -> Self {
        RewindError::Io(e)
    }
}

impl From<RewindError> for io::Error {
    fn from(e: RewindError) -> Self {
        match e {
            RewindError::Io(e) => e,
            RewindError::ClosedChannel => io::Error::new(io::ErrorKind::NotConnected, e),
            RewindError::RetainLimitExceeded { .. } => io::Error::new(io::ErrorKind::OutOfMemory, e),
            RewindError::InvalidConfig { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            RewindError::IllegalState(_) => io::Error::other(e),
        }
    }
}
