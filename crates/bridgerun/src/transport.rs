//! # Transport Abstraction
//!
//! The HTTP boundary the bridge dispatches through.
//!
//! ## Philosophy
//!
//! - **Supplied, not owned**: The surrounding application decides how requests
//!   reach the origin (a real client, a test double, or an in-process
//!   [`Router`](crate::remote::Router)). The bridge never builds a client.
//! - **Request-Response**: One request in, one response out. Retries, timeouts
//!   and cancellation belong to the implementation, not the bridge.

use std::fmt;

use http::Request;
use http::Response;

/// Errors that occur before a response could be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The origin is unreachable or the connection was dropped.
    ConnectionLost(String),
    /// The transport gave up waiting for a response.
    Timeout,
    /// Generic I/O error or internal transport failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost(msg) => write!(f, "Connection lost: {}", msg),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Issues one HTTP request and returns the response, whatever its status.
///
/// This trait is designed to be object-safe (`Arc<dyn Fetch>`).
#[async_trait::async_trait]
pub trait Fetch: Send + Sync + 'static {
    /// # invariants
    /// - Must return `Ok(response)` for every response received, including
    ///   non-success statuses.
    /// - Must return `Err` only when no response was obtained.
    async fn fetch(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}
