//! # Bridgepack
//!
//! A small, self-describing serialization format for values crossing the
//! binding bridge.
//!
//! ## Philosophy
//!
//! - **Schema-free**: Every item carries its own tag, so a receiver can decode an
//!   envelope without knowing the signature of the operation inside it.
//! - **Lossless**: Byte buffers, `undefined`, dates and non-finite floats survive
//!   the round trip. Float payloads are stored as raw bits.
//! - **Bounded**: Encoders track scope explicitly. Decoders are zero-copy,
//!   bounds-checked views. Value recursion stops at [`MAX_DEPTH`].
//!
//! ## Format
//!
//! - **Scalars**: `[Tag: 1b][Data: N]`
//! - **Blobs**: `[Tag: 1b][Len: 4b][Data: Len]`
//! - **Containers**: `[Tag: 1b][Len: 4b][Body: Len]`
//!
//! A map body is a flat run of `String` keys, each followed by exactly one value.
//! All integers are Little-Endian.

mod decoder;
mod encoder;
mod value;


pub use decoder::Decoder;
pub use decoder::ListIter;
pub use decoder::MapIter;
pub use encoder::Encoder;
pub use value::Value;

/// The maximum nesting depth of a `Value` before encoding or decoding fails.
pub const MAX_DEPTH: usize = 64;

/// Bridgepack serialization and deserialization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Byte does not correspond to a valid `Tag`, or the tag was not the one expected.
    InvalidTag(u8),
    /// String data is not valid UTF-8.
    InvalidUtf8,
    /// Closing a scope that does not match the active scope stack.
    ScopeMismatch { expected: Scope, actual: Scope },
    /// Attempted to close a scope when only the Root remains.
    ScopeUnderflow,
    /// Attempted to finalize the buffer with open scopes.
    ScopeStillOpen,
    /// Buffer exhausted while reading.
    UnexpectedEnd,
    /// Blob or container length exceeds `u32::MAX`.
    BlobTooLarge(usize),
    /// Structural Violation: a map key must be a `String`.
    InvalidMapKey,
    /// Structural Violation: a map was closed after a key with no value.
    DanglingKey,
    /// A complete value was decoded but bytes remain in the buffer.
    TrailingBytes(usize),
    /// The nested depth of the value exceeded [`MAX_DEPTH`].
    RecursionLimitExceeded,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidTag(b) => write!(f, "Invalid Tag byte: {:#04x}", b),
            Error::ScopeMismatch { expected, actual } => {
                write!(f, "Scope Mismatch: expected {:?}, found {:?}", expected, actual)
            }
            Error::TrailingBytes(n) => write!(f, "{} trailing bytes after value", n),
            Error::RecursionLimitExceeded => write!(f, "Value nested deeper than {} levels", MAX_DEPTH),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for Bridgepack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifies the type of the encoded value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    // Fixed-width scalars
    Undefined = 0x01,
    Null = 0x02,
    BoolTrue = 0x03,
    BoolFalse = 0x04,
    Int = 0x05,
    Float = 0x06,
    Date = 0x07,

    // Blobs (Tag + u32 Len + Bytes)
    String = 0x10,
    Bytes = 0x11,

    // Containers (Tag + u32 Len + Body)
    List = 0x20,
    Map = 0x21,
}

impl Tag {
    /// Returns the Tag variant for a given byte, or `None` if invalid.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Tag::Undefined),
            0x02 => Some(Tag::Null),
            0x03 => Some(Tag::BoolTrue),
            0x04 => Some(Tag::BoolFalse),
            0x05 => Some(Tag::Int),
            0x06 => Some(Tag::Float),
            0x07 => Some(Tag::Date),
            0x10 => Some(Tag::String),
            0x11 => Some(Tag::Bytes),
            0x20 => Some(Tag::List),
            0x21 => Some(Tag::Map),
            _ => None,
        }
    }
}

/// Internal state tracking for the `Encoder` stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The virtual root; allows any item.
    Root,
    /// Ordered sequence; allows any number of items.
    List,
    /// Key-Value container; items alternate between `String` key and value.
    Map,
}

/// Encodes a single value into a fresh buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut enc = Encoder::new();
    enc.value(value)?;
    enc.into_bytes()
}

/// Decodes exactly one value from `bytes`.
///
/// # Errors
/// Returns `Error::TrailingBytes` if anything follows the value.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut dec = Decoder::new(bytes);
    let value = dec.value()?;
    if !dec.is_empty() {
        return Err(Error::TrailingBytes(dec.remaining()));
    }
    Ok(value)
}
