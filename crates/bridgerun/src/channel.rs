//! # Dispatch Channel
//!
//! Turns an operation and its parameters into exactly one POST to the bridge
//! origin, and hands back the raw response for the facade to interpret.
//!
//! The channel is stateless: it holds only the immutable [`BindingConfig`] and
//! the transport, so clones are cheap and concurrent dispatches are independent.
//!
//! ## Invariants
//!
//! - One call, one request. No retry, no timeout, no backoff.
//! - Both routing headers are present on every request.
//! - A non-success status is always an `Error::Remote`; there is no partial success.

use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::Envelope;
use bridgerpc::Operation;
use http::Method;
use http::Request;
use http::StatusCode;
use http::header::CONTENT_TYPE;

use crate::config::BindingConfig;
use crate::error::Error;
use crate::error::Result;
use crate::transport::Fetch;

/// A successful response, not yet interpreted.
///
/// The wire format does not describe its own encoding, so the caller picks
/// `bytes()` or `value()` according to the operation it dispatched.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Decodes the body as one bridgepack value.
    pub fn value(&self) -> Result<Value> {
        Ok(bridgepack::decode(&self.body)?)
    }
}

/// Stateless dispatcher bound to one binding.
#[derive(Clone)]
pub struct Channel {
    config: Arc<BindingConfig>,
    fetch: Arc<dyn Fetch>,
}

impl Channel {
    pub fn new(config: BindingConfig, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            config: Arc::new(config),
            fetch,
        }
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Dispatches one operation.
    ///
    /// Returns `Transport` if no response was obtained, `Codec` if the
    /// parameters cannot be encoded, or `Remote` carrying the body text when
    /// the status is not a success.
    pub async fn dispatch(&self, operation: Operation, parameters: Vec<Value>) -> Result<RawResponse> {
        let body = Envelope::new(operation, parameters).to_bytes()?;

        tracing::debug!(
            %operation,
            binding = self.config.name(),
            kind = %self.config.kind(),
            bytes = body.len(),
            "dispatching"
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.config.origin().clone())
            .header(bridgerpc::MODULE_HEADER, self.config.kind().header_value())
            .header(bridgerpc::NAME_HEADER, self.config.name())
            .header(CONTENT_TYPE, bridgerpc::ENVELOPE_CONTENT_TYPE)
            .body(body)?;

        let (parts, body) = self.fetch.fetch(request).await?.into_parts();

        if !parts.status.is_success() {
            let error = Error::remote(parts.status, body);
            tracing::warn!(
                %operation,
                binding = self.config.name(),
                status = %parts.status,
                error = %error,
                "remote operation failed"
            );
            return Err(error);
        }

        Ok(RawResponse { status: parts.status, body })
    }
}
