//! # BridgeRPC
//!
//! The wire protocol spoken between a binding facade and the remote dispatch
//! handler.
//!
//! Every call is one HTTP POST. Two headers select the live binding on the
//! remote side ([`MODULE_HEADER`], [`NAME_HEADER`]), and the body is a single
//! bridgepack-encoded [`Envelope`] naming the [`Operation`] and its positional
//! parameters.

pub mod envelope;
pub mod error;
pub mod operation;


pub use envelope::Envelope;
pub use error::Error;
pub use error::Result;
pub use operation::BindingKind;
pub use operation::Operation;

/// Header carrying the binding kind marker (see [`BindingKind::header_value`]).
pub const MODULE_HEADER: &str = "X-BRIDGE-BINDING-MODULE";

/// Header carrying the logical binding name.
pub const NAME_HEADER: &str = "X-BRIDGE-BINDING-NAME";

/// Content type of an encoded envelope.
pub const ENVELOPE_CONTENT_TYPE: &str = "application/octet-stream";
