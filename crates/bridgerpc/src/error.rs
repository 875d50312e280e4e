//! # Error Definitions
//!
//! Failures while building or reading protocol frames.

use bridgepack::Error as PackError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The underlying bridgepack serialization failed.
    Codec(PackError),
    /// The envelope was structurally valid bridgepack but not a valid envelope
    /// (e.g. missing `operation`).
    ProtocolViolation(String),
    /// An operation identifier that is not in the operation table.
    UnknownOperation(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "Codec error: {}", e),
            Self::ProtocolViolation(msg) => write!(f, "Protocol violation: {}", msg),
            Self::UnknownOperation(op) => write!(f, "Unknown operation: {}", op),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PackError> for Error {
    fn from(e: PackError) -> Self { Self::Codec(e) }
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, Error>;
