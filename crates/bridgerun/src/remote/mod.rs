//! # Remote Dispatch
//!
//! The half of the bridge that runs next to the real bindings. A [`Router`]
//! receives the POST, picks the live binding named by the routing headers, and
//! a [`Handler`] executes the envelope's operation against it.
//!
//! Live bindings are tagged with their [`BindingKind`] when registered; the
//! kind is checked against the module header, never inferred.

pub mod handler;
pub mod params;
pub mod router;

use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::BindingKind;
use bridgerpc::Operation;
use http::Method;
use http::StatusCode;

use crate::statement::PreparedStatement;

pub use handler::Handler;
pub use router::Router;

/// The real database, as seen from inside the runtime.
///
/// Results are passed back to the caller as-is.
#[async_trait::async_trait]
pub trait DatabaseBinding: Send + Sync + 'static {
    async fn dump(&self) -> anyhow::Result<Vec<u8>>;
    async fn exec(&self, query: &str) -> anyhow::Result<Value>;
    /// Must execute `statements` in order, as one unit.
    async fn batch(&self, statements: Vec<PreparedStatement>) -> anyhow::Result<Value>;
    async fn first(&self, statement: PreparedStatement, column: Option<String>) -> anyhow::Result<Value>;
    async fn all(&self, statement: PreparedStatement) -> anyhow::Result<Value>;
    async fn run(&self, statement: PreparedStatement) -> anyhow::Result<Value>;
    async fn raw(&self, statement: PreparedStatement) -> anyhow::Result<Value>;
}

/// The real queue producer, as seen from inside the runtime.
///
/// `options` and each message are passed through untouched.
#[async_trait::async_trait]
pub trait QueueBinding: Send + Sync + 'static {
    async fn send(&self, body: Value, options: Value) -> anyhow::Result<()>;
    async fn send_batch(&self, messages: Vec<Value>) -> anyhow::Result<()>;
}

/// A live binding and its kind tag.
#[derive(Clone)]
pub enum LiveBinding {
    Database(Arc<dyn DatabaseBinding>),
    Queue(Arc<dyn QueueBinding>),
}

impl LiveBinding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Database(_) => BindingKind::Database,
            Self::Queue(_) => BindingKind::Queue,
        }
    }
}

/// Failures while serving one bridge request.
///
/// Each maps to an HTTP status; the response body is the `Display` text.
#[derive(Debug)]
pub enum Error {
    /// The body is not a valid envelope.
    Protocol(bridgerpc::Error),
    /// The operation is not in the table for this binding's kind.
    Unsupported { operation: String },
    /// A parameter is missing or has the wrong shape.
    BadParameter {
        operation: Operation,
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// The live binding itself failed.
    Binding(anyhow::Error),
    /// The result could not be encoded.
    Codec(bridgepack::Error),
    MethodNotAllowed(Method),
    MissingHeader(&'static str),
    UnknownKind(String),
    BindingNotFound(String),
    KindMismatch {
        name: String,
        requested: BindingKind,
        registered: BindingKind,
    },
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Protocol(_)
            | Self::BadParameter { .. }
            | Self::MissingHeader(_)
            | Self::UnknownKind(_)
            | Self::KindMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::BindingNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unsupported { .. } | Self::Binding(_) | Self::Codec(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "Malformed envelope: {}", e),
            Self::Unsupported { operation } => write!(f, "{}() is not supported.", operation),
            Self::BadParameter { operation, index, expected, found } => write!(
                f,
                "{}(): parameter {} must be {}, found {}",
                operation, index, expected, found
            ),
            Self::Binding(e) => write!(f, "{:#}", e),
            Self::Codec(e) => write!(f, "Failed to encode result: {}", e),
            Self::MethodNotAllowed(method) => write!(f, "Method {} not allowed, expected POST", method),
            Self::MissingHeader(name) => write!(f, "Missing header {}", name),
            Self::UnknownKind(kind) => write!(f, "Unknown binding module {:?}", kind),
            Self::BindingNotFound(name) => write!(f, "No binding named {:?}", name),
            Self::KindMismatch { name, requested, registered } => write!(
                f,
                "Binding {:?} is a {} binding, request was for a {} binding",
                name, registered, requested
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(e) => Some(e),
            Self::Binding(e) => Some(e.as_ref()),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bridgerpc::Error> for Error {
    fn from(e: bridgerpc::Error) -> Self {
        Self::Protocol(e)
    }
}

impl From<bridgepack::Error> for Error {
    fn from(e: bridgepack::Error) -> Self {
        Self::Codec(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
