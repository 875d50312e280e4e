//! # BridgeRun
//!
//! Facades that let code outside the runtime use its database and queue
//! bindings as if they were local, plus the remote half that executes the
//! tunnelled calls against the live bindings.
//!
//! ```text
//! Database / Queue ──► Channel ──► Fetch ──► Router ──► Handler ──► live binding
//! ```

pub mod channel;
pub mod config;
pub mod database;
pub mod error;
pub mod queue;
pub mod remote;
pub mod statement;
pub mod transport;

#[cfg(test)]
mod mock_transport;
#[cfg(test)]
mod tests;

pub use channel::Channel;
pub use channel::RawResponse;
pub use config::BindingConfig;
pub use database::Database;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;
pub use queue::ContentType;
pub use queue::MessageSendRequest;
pub use queue::Queue;
pub use queue::SendOptions;
pub use remote::DatabaseBinding;
pub use remote::LiveBinding;
pub use remote::QueueBinding;
pub use remote::Router;
pub use statement::PreparedStatement;
pub use transport::Fetch;
