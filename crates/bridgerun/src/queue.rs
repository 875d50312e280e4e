//! # Queue Facade
//!
//! Caller-side handle for a queue producer binding. Success means the remote
//! accepted the call; delivery is the queue's business.

use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::Operation;

use crate::channel::Channel;
use crate::config;
use crate::config::BindingConfig;
use crate::error::Result;
use crate::transport::Fetch;

/// How the queue should serialize a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Bytes,
    Json,
    V8,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Json => "json",
            Self::V8 => "v8",
        }
    }
}

/// Options for a single `send`. Unset fields are left out of the wire map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub content_type: Option<ContentType>,
    pub delay_seconds: Option<u32>,
}

impl SendOptions {
    fn to_value(self) -> Value {
        Value::Map(self.entries())
    }

    fn entries(self) -> Vec<(String, Value)> {
        let mut entries: Vec<(String, Value)> = Vec::new();
        if let Some(content_type) = self.content_type {
            entries.push(("contentType".to_string(), content_type.as_str().into()));
        }
        if let Some(delay) = self.delay_seconds {
            entries.push(("delaySeconds".to_string(), delay.into()));
        }
        entries
    }
}

/// One message of a `send_batch`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSendRequest {
    pub body: Value,
    pub options: SendOptions,
}

impl MessageSendRequest {
    pub fn new(body: impl Into<Value>) -> Self {
        Self {
            body: body.into(),
            options: SendOptions::default(),
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.options.content_type = Some(content_type);
        self
    }

    pub fn with_delay_seconds(mut self, delay: u32) -> Self {
        self.options.delay_seconds = Some(delay);
        self
    }

    fn into_value(self) -> Value {
        let mut entries = vec![("body".to_string(), self.body)];
        entries.extend(self.options.entries());
        Value::Map(entries)
    }
}

#[derive(Clone)]
pub struct Queue {
    channel: Channel,
}

impl Queue {
    /// Binds a facade to the queue named `name` behind `origin`.
    pub fn new(origin: &str, name: impl Into<String>, fetch: Arc<dyn Fetch>) -> config::Result<Self> {
        let config = BindingConfig::queue(origin, name)?;
        Ok(Self {
            channel: Channel::new(config, fetch),
        })
    }

    pub fn name(&self) -> &str {
        self.channel.config().name()
    }

    /// Sends one message. Absent options travel as `undefined`.
    pub async fn send(&self, body: impl Into<Value>, options: Option<SendOptions>) -> Result<()> {
        let options = options.map_or(Value::Undefined, SendOptions::to_value);
        self.channel.dispatch(Operation::QueueSend, vec![body.into(), options]).await?;
        Ok(())
    }

    /// Sends `messages` as one call, in order.
    pub async fn send_batch(&self, messages: impl IntoIterator<Item = MessageSendRequest>) -> Result<()> {
        let messages = Value::List(messages.into_iter().map(MessageSendRequest::into_value).collect());
        self.channel.dispatch(Operation::QueueSendBatch, vec![messages]).await?;
        Ok(())
    }
}
