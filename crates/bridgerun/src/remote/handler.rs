use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::BindingKind;
use bridgerpc::Envelope;
use bridgerpc::Operation;
use http::HeaderValue;
use http::Response;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use tracing::Instrument;

use crate::remote::DatabaseBinding;
use crate::remote::Error;
use crate::remote::LiveBinding;
use crate::remote::QueueBinding;
use crate::remote::Result;
use crate::remote::params::Params;

/// What an operation produced, before it becomes a response body.
enum Reply {
    Binary(Vec<u8>),
    Structured(Value),
    Empty,
}

/// Executes envelopes against one live binding.
///
/// Every call runs one operation to completion; there is no state between calls.
#[derive(Clone)]
pub struct Handler {
    binding: LiveBinding,
}

impl Handler {
    pub fn new(binding: LiveBinding) -> Self {
        Self { binding }
    }

    pub fn kind(&self) -> BindingKind {
        self.binding.kind()
    }

    /// Decodes `body` as an envelope and runs it.
    ///
    /// Operations outside this binding's table fail with
    /// [`Error::Unsupported`] and never reach the binding.
    pub async fn handle(&self, body: &[u8]) -> Result<Response<Vec<u8>>> {
        let envelope = Envelope::from_bytes(body)?;
        let operation = match envelope.resolve() {
            Ok(operation) if operation.kind() == self.kind() => operation,
            _ => return Err(Error::Unsupported { operation: envelope.operation }),
        };

        let span = tracing::debug_span!("execute", %operation, parameters = envelope.parameters.len());
        let params = Params::new(operation, envelope.parameters);
        let reply = async {
            tracing::debug!("executing");
            match &self.binding {
                LiveBinding::Database(db) => database(db, operation, params).await,
                LiveBinding::Queue(producer) => queue(producer, operation, params).await,
            }
        }
        .instrument(span)
        .await?;
        reply.into_response()
    }
}

async fn database(db: &Arc<dyn DatabaseBinding>, operation: Operation, mut params: Params) -> Result<Reply> {
    let reply = match operation {
        Operation::DatabaseDump => Reply::Binary(db.dump().await.map_err(Error::Binding)?),
        Operation::DatabaseExec => {
            let query = params.string(0)?;
            Reply::Structured(db.exec(&query).await.map_err(Error::Binding)?)
        }
        Operation::DatabaseBatch => {
            let statements = params.statements()?;
            Reply::Structured(db.batch(statements).await.map_err(Error::Binding)?)
        }
        Operation::DatabaseFirst => {
            let statement = params.statement(0)?;
            let column = params.optional_string(2)?;
            Reply::Structured(db.first(statement, column).await.map_err(Error::Binding)?)
        }
        Operation::DatabaseAll => Reply::Structured(db.all(params.statement(0)?).await.map_err(Error::Binding)?),
        Operation::DatabaseRun => Reply::Structured(db.run(params.statement(0)?).await.map_err(Error::Binding)?),
        Operation::DatabaseRaw => Reply::Structured(db.raw(params.statement(0)?).await.map_err(Error::Binding)?),
        other => {
            return Err(Error::Unsupported {
                operation: other.to_string(),
            });
        }
    };
    Ok(reply)
}

async fn queue(queue: &Arc<dyn QueueBinding>, operation: Operation, mut params: Params) -> Result<Reply> {
    match operation {
        Operation::QueueSend => {
            let body = params.take(0);
            let options = params.take(1);
            queue.send(body, options).await.map_err(Error::Binding)?;
        }
        Operation::QueueSendBatch => {
            let messages = params.list(0)?;
            queue.send_batch(messages).await.map_err(Error::Binding)?;
        }
        other => {
            return Err(Error::Unsupported {
                operation: other.to_string(),
            });
        }
    }
    Ok(Reply::Empty)
}

impl Reply {
    fn into_response(self) -> Result<Response<Vec<u8>>> {
        let (body, content_type) = match self {
            Self::Binary(bytes) => (bytes, Some(bridgerpc::ENVELOPE_CONTENT_TYPE)),
            Self::Structured(value) => (bridgepack::encode(&value)?, Some(bridgerpc::ENVELOPE_CONTENT_TYPE)),
            Self::Empty => (Vec::new(), None),
        };
        let mut res = Response::new(body);
        *res.status_mut() = StatusCode::OK;
        if let Some(content_type) = content_type {
            res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Ok(res)
    }
}
