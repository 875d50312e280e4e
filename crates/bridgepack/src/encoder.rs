use crate::Error;
use crate::MAX_DEPTH;
use crate::Result;
use crate::Scope;
use crate::Tag;
use crate::Value;

/// An active container scope on the `Encoder` stack.
struct Frame {
    start: usize,
    scope: Scope,
    count: usize,
}

/// A bounded, state-machine driven encoder.
///
/// The Encoder maintains a stack of open scopes to enforce structure and
/// back-patch length headers when a container closes.
///
/// # Structural Invariants
///
/// 1.  **Map Scopes**: Items alternate key/value, and every key is a `String`.
///     Closing a map with a key but no value fails with `Error::DanglingKey`.
/// 2.  **Root Scope**: The encoder must end in the Root scope to finalize bytes.
pub struct Encoder {
    buf: Vec<u8>,
    /// Bottom is always `Scope::Root`.
    stack: Vec<Frame>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Creates a new encoder with default capacity.
    pub fn new() -> Self {
        let mut enc = Self {
            buf: Vec::with_capacity(256),
            stack: Vec::with_capacity(8),
        };
        enc.stack.push(Frame { start: 0, scope: Scope::Root, count: 0 });
        enc
    }

    /// Consumes the encoder and returns the final byte vector.
    ///
    /// # Errors
    /// Returns `Error::ScopeStillOpen` if any container is still open.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if self.stack.len() > 1 {
            return Err(Error::ScopeStillOpen);
        }
        Ok(self.buf)
    }

    fn current_frame(&mut self) -> &mut Frame {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    fn check_write(&mut self, tag: Tag) -> Result<()> {
        let frame = self.current_frame();
        match frame.scope {
            Scope::Root | Scope::List => Ok(()),
            Scope::Map if frame.count % 2 == 0 && tag != Tag::String => Err(Error::InvalidMapKey),
            Scope::Map => Ok(()),
        }
    }

    fn on_item_written(&mut self) {
        self.current_frame().count += 1;
    }

    fn scalar(&mut self, tag: Tag, data: &[u8]) -> Result<()> {
        self.check_write(tag)?;
        self.buf.push(tag as u8);
        self.buf.extend_from_slice(data);
        self.on_item_written();
        Ok(())
    }

    fn blob(&mut self, tag: Tag, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| Error::BlobTooLarge(data.len()))?;
        self.check_write(tag)?;
        self.buf.push(tag as u8);
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(data);
        self.on_item_written();
        Ok(())
    }

    fn begin_scope(&mut self, tag: Tag, scope: Scope) -> Result<()> {
        self.check_write(tag)?;

        self.buf.push(tag as u8);
        self.buf.extend_from_slice(&[0, 0, 0, 0]); // Length placeholder

        self.stack.push(Frame {
            start: self.buf.len(),
            scope,
            count: 0,
        });
        Ok(())
    }

    fn end_scope(&mut self, expected: Scope) -> Result<()> {
        if self.stack.len() <= 1 {
            return Err(Error::ScopeUnderflow);
        }

        {
            let frame = self.current_frame();
            if frame.scope != expected {
                return Err(Error::ScopeMismatch { expected, actual: frame.scope });
            }
            if frame.scope == Scope::Map && frame.count % 2 == 1 {
                return Err(Error::DanglingKey);
            }
        }

        let Some(frame) = self.stack.pop() else {
            return Err(Error::ScopeUnderflow);
        };
        let body_len = self.buf.len() - frame.start;
        let len = u32::try_from(body_len).map_err(|_| Error::BlobTooLarge(body_len))?;
        self.buf[frame.start - 4..frame.start].copy_from_slice(&len.to_le_bytes());

        self.on_item_written();
        Ok(())
    }

    /// Encodes `undefined`, the marker for an absent optional argument.
    pub fn undefined(&mut self) -> Result<()> { self.scalar(Tag::Undefined, &[]) }
    /// Encodes `null`.
    pub fn null(&mut self) -> Result<()> { self.scalar(Tag::Null, &[]) }

    /// Encodes a boolean value.
    pub fn bool(&mut self, v: bool) -> Result<()> {
        self.scalar(if v { Tag::BoolTrue } else { Tag::BoolFalse }, &[])
    }

    /// Encodes a signed 64-bit integer (LE).
    pub fn int(&mut self, v: i64) -> Result<()> { self.scalar(Tag::Int, &v.to_le_bytes()) }
    /// Encodes a 64-bit float as its raw bits (LE).
    pub fn float(&mut self, v: f64) -> Result<()> { self.scalar(Tag::Float, &v.to_bits().to_le_bytes()) }
    /// Encodes a timestamp in milliseconds since the Unix epoch (LE).
    pub fn date(&mut self, millis: i64) -> Result<()> { self.scalar(Tag::Date, &millis.to_le_bytes()) }

    /// Encodes a UTF-8 string blob.
    pub fn str(&mut self, v: &str) -> Result<()> { self.blob(Tag::String, v.as_bytes()) }
    /// Encodes a raw byte blob.
    pub fn bytes(&mut self, v: &[u8]) -> Result<()> { self.blob(Tag::Bytes, v) }

    /// Begins a List container. Must be closed via `list_end()`.
    pub fn list_begin(&mut self) -> Result<()> { self.begin_scope(Tag::List, Scope::List) }
    /// Ends a List container.
    pub fn list_end(&mut self) -> Result<()> { self.end_scope(Scope::List) }

    /// Begins a Map container. Must be closed via `map_end()`.
    ///
    /// Write each entry as `key()` followed by exactly one value.
    pub fn map_begin(&mut self) -> Result<()> { self.begin_scope(Tag::Map, Scope::Map) }
    /// Ends a Map container.
    pub fn map_end(&mut self) -> Result<()> { self.end_scope(Scope::Map) }

    /// Writes a map key.
    pub fn key(&mut self, name: &str) -> Result<()> {
        let frame = self.current_frame();
        if frame.scope != Scope::Map {
            return Err(Error::ScopeMismatch { expected: Scope::Map, actual: frame.scope });
        }
        if frame.count % 2 == 1 {
            return Err(Error::DanglingKey);
        }
        self.str(name)
    }

    /// Encodes a full `Value` tree.
    ///
    /// # Errors
    /// Returns `Error::RecursionLimitExceeded` if the value is too deeply nested.
    pub fn value(&mut self, value: &Value) -> Result<()> {
        self.value_impl(value, 0)
    }

    fn value_impl(&mut self, value: &Value, depth: usize) -> Result<()> {
        if depth > MAX_DEPTH {
            return Err(Error::RecursionLimitExceeded);
        }

        match value {
            Value::Undefined => self.undefined()?,
            Value::Null => self.null()?,
            Value::Bool(b) => self.bool(*b)?,
            Value::Int(v) => self.int(*v)?,
            Value::Float(v) => self.float(*v)?,
            Value::Date(ms) => self.date(*ms)?,
            Value::String(s) => self.str(s)?,
            Value::Bytes(b) => self.bytes(b)?,
            Value::List(items) => {
                self.list_begin()?;
                for item in items {
                    self.value_impl(item, depth + 1)?;
                }
                self.list_end()?;
            }
            Value::Map(entries) => {
                self.map_begin()?;
                for (key, item) in entries {
                    self.key(key)?;
                    self.value_impl(item, depth + 1)?;
                }
                self.map_end()?;
            }
        }
        Ok(())
    }
}
