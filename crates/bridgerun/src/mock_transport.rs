//! Mock transports for testing.
//!
//! These are used internally by the test suite and are not part of the public API.

use std::sync::Arc;

use bridgerpc::Envelope;
use http::HeaderMap;
use http::Method;
use http::Request;
use http::Response;
use http::StatusCode;
use http::Uri;
use tokio::sync::Mutex;

use crate::transport;
use crate::transport::Fetch;

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub envelope: Envelope,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Records every request and answers each with the same canned outcome.
pub struct RecordingFetch {
    outcome: transport::Result<(StatusCode, Vec<u8>)>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingFetch {
    /// Answers `200` with `body`.
    pub fn ok(body: Vec<u8>) -> Self {
        Self::status(StatusCode::OK, body)
    }

    pub fn status(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            outcome: Ok((status, body)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every request without a response.
    pub fn failing(error: transport::Error) -> Self {
        Self {
            outcome: Err(error),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().await.clone()
    }

    pub async fn last(&self) -> Recorded {
        self.requests.lock().await.last().cloned().expect("no request recorded")
    }
}

#[async_trait::async_trait]
impl Fetch for RecordingFetch {
    async fn fetch(&self, request: Request<Vec<u8>>) -> transport::Result<Response<Vec<u8>>> {
        let (parts, body) = request.into_parts();
        let envelope = Envelope::from_bytes(&body)
            .map_err(|e| transport::Error::Io(format!("Failed to decode envelope: {}", e)))?;

        self.requests.lock().await.push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            envelope,
        });

        let (status, body) = self.outcome.clone()?;
        let mut res = Response::new(body);
        *res.status_mut() = status;
        Ok(res)
    }
}
