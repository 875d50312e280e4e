//! # Binding Configuration
//!
//! The immutable record a facade is built from: where to send requests, and
//! which binding they address.

use bridgerpc::BindingKind;
use http::HeaderValue;
use http::Uri;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The origin is not an absolute `http`/`https` URI.
    InvalidOrigin(String),
    /// The binding name is empty or cannot be sent as a header value.
    InvalidName(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrigin(msg) => write!(f, "Invalid origin: {}", msg),
            Self::InvalidName(name) => write!(f, "Invalid binding name: {:?}", name),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// `{ origin, kind, name }`, validated once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConfig {
    origin: Uri,
    kind: BindingKind,
    name: String,
}

impl BindingConfig {
    pub fn new(origin: &str, kind: BindingKind, name: impl Into<String>) -> Result<Self> {
        let origin: Uri = origin
            .parse()
            .map_err(|e| Error::InvalidOrigin(format!("{}: {}", origin, e)))?;

        match origin.scheme_str() {
            Some("http") | Some("https") => {}
            _ => return Err(Error::InvalidOrigin(format!("{}: expected an http or https URI", origin))),
        }
        if origin.authority().is_none() {
            return Err(Error::InvalidOrigin(format!("{}: missing host", origin)));
        }

        let name = name.into();
        if name.is_empty() || HeaderValue::from_str(&name).is_err() {
            return Err(Error::InvalidName(name));
        }

        Ok(Self { origin, kind, name })
    }

    pub fn database(origin: &str, name: impl Into<String>) -> Result<Self> {
        Self::new(origin, BindingKind::Database, name)
    }

    pub fn queue(origin: &str, name: impl Into<String>) -> Result<Self> {
        Self::new(origin, BindingKind::Queue, name)
    }

    pub fn origin(&self) -> &Uri {
        &self.origin
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
