use std::sync::Arc;

use bridgerpc::BindingKind;
use dashmap::DashMap;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Request;
use http::Response;
use http::header::CONTENT_TYPE;

use crate::remote::DatabaseBinding;
use crate::remote::Error;
use crate::remote::Handler;
use crate::remote::LiveBinding;
use crate::remote::QueueBinding;
use crate::remote::Result;
use crate::transport;
use crate::transport::Fetch;

/// Serves bridge requests for every registered binding.
///
/// Registration is concurrent and can happen while requests are in flight.
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct Router {
    bindings: Arc<DashMap<String, Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `binding` under `name`, replacing any previous one.
    pub fn register(&self, name: impl Into<String>, binding: LiveBinding) {
        let name = name.into();
        tracing::debug!(name = %name, kind = %binding.kind(), "registering binding");
        self.bindings.insert(name, Handler::new(binding));
    }

    pub fn register_database(&self, name: impl Into<String>, binding: Arc<dyn DatabaseBinding>) {
        self.register(name, LiveBinding::Database(binding));
    }

    pub fn register_queue(&self, name: impl Into<String>, binding: Arc<dyn QueueBinding>) {
        self.register(name, LiveBinding::Queue(binding));
    }

    /// Removes the binding registered under `name`.
    pub fn unregister(&self, name: &str) -> Result<()> {
        self.bindings
            .remove(name)
            .ok_or_else(|| Error::BindingNotFound(name.to_string()))?;
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Serves one request. Failures become a plain-text body with the
    /// status from [`Error::status`].
    pub async fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        match self.try_handle(request).await {
            Ok(res) => res,
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!(%status, error = %e, "bridge request failed");
                } else {
                    tracing::warn!(%status, error = %e, "bridge request rejected");
                }
                let mut res = Response::new(e.to_string().into_bytes());
                *res.status_mut() = status;
                res.headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
                res
            }
        }
    }

    /// Serves one request, returning the failure instead of rendering it.
    pub async fn try_handle(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let (parts, body) = request.into_parts();
        if parts.method != Method::POST {
            return Err(Error::MethodNotAllowed(parts.method));
        }

        let module = header(&parts.headers, bridgerpc::MODULE_HEADER)?;
        let requested = BindingKind::from_header(module).ok_or_else(|| Error::UnknownKind(module.to_string()))?;
        let name = header(&parts.headers, bridgerpc::NAME_HEADER)?;

        let handler = self
            .bindings
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::BindingNotFound(name.to_string()))?;

        if handler.kind() != requested {
            return Err(Error::KindMismatch {
                name: name.to_string(),
                requested,
                registered: handler.kind(),
            });
        }

        handler.handle(&body).await
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::MissingHeader(name))
}

/// Serves requests in-process, so facades can talk to a router directly.
#[async_trait::async_trait]
impl Fetch for Router {
    async fn fetch(&self, request: Request<Vec<u8>>) -> transport::Result<Response<Vec<u8>>> {
        Ok(self.handle(request).await)
    }
}
