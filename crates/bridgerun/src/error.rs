//! # Caller-side Errors
//!
//! Every failure a facade method can return. Callers branch on [`ErrorKind`]
//! rather than on message text.

use http::StatusCode;

use crate::transport;

#[derive(Debug)]
pub enum Error {
    /// The request never produced a response.
    Transport(transport::Error),
    /// The remote answered with a non-success status. `message` is the body
    /// text verbatim.
    Remote {
        status: StatusCode,
        message: String,
        body: Vec<u8>,
    },
    /// The envelope could not be encoded, or a structured result could not be decoded.
    Codec(bridgepack::Error),
    /// The outbound request could not be assembled.
    Request(http::Error),
}

/// Discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    RemoteOperation,
    Codec,
    Request,
}

impl Error {
    pub(crate) fn remote(status: StatusCode, body: Vec<u8>) -> Self {
        let message = String::from_utf8_lossy(&body).into_owned();
        Self::Remote { status, message, body }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Remote { .. } => ErrorKind::RemoteOperation,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Request(_) => ErrorKind::Request,
        }
    }

    /// The status of a remote failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The untouched response body of a remote failure.
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::Remote { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Remote { message, .. } => f.write_str(message),
            Self::Codec(e) => write!(f, "Codec error: {}", e),
            Self::Request(e) => write!(f, "Request error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Request(e) => Some(e),
            Self::Remote { .. } => None,
        }
    }
}

impl From<transport::Error> for Error {
    fn from(e: transport::Error) -> Self {
        Self::Transport(e)
    }
}

impl From<bridgepack::Error> for Error {
    fn from(e: bridgepack::Error) -> Self {
        Self::Codec(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Self::Request(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
