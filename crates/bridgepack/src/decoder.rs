use crate::Error;
use crate::MAX_DEPTH;
use crate::Result;
use crate::Tag;
use crate::Value;

/// A zero-copy, bounds-checked cursor over a byte slice.
///
/// Reading advances the internal cursor. Container reads return iterators whose
/// decoders are restricted to the container's body.
///
/// # Errors
/// All read operations return `Error::UnexpectedEnd` if the buffer is exhausted.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over the slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns the remaining bytes in the view.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Peeks the next Tag without advancing.
    pub fn peek_tag(&self) -> Result<Tag> {
        let Some(&b) = self.buf.first() else {
            return Err(Error::UnexpectedEnd);
        };
        Tag::from_u8(b).ok_or(Error::InvalidTag(b))
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::UnexpectedEnd);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    fn read_len(&mut self) -> Result<usize> {
        Ok(u32::from_le_bytes(self.read_array()?) as usize)
    }

    fn check_tag(&mut self, expected: Tag) -> Result<()> {
        let tag = self.peek_tag()?;
        if tag != expected {
            return Err(Error::InvalidTag(tag as u8));
        }
        self.read_bytes(1)?;
        Ok(())
    }

    fn enter_container(&mut self, expected: Tag) -> Result<Decoder<'a>> {
        self.check_tag(expected)?;
        let len = self.read_len()?;
        Ok(Decoder::new(self.read_bytes(len)?))
    }

    /// Skips the next item and its nested children.
    pub fn skip(&mut self) -> Result<()> {
        let tag = self.peek_tag()?;
        self.read_bytes(1)?;

        match tag {
            Tag::Undefined | Tag::Null | Tag::BoolTrue | Tag::BoolFalse => {}
            Tag::Int | Tag::Float | Tag::Date => {
                self.read_bytes(8)?;
            }
            Tag::String | Tag::Bytes | Tag::List | Tag::Map => {
                let len = self.read_len()?;
                self.read_bytes(len)?;
            }
        }
        Ok(())
    }

    /// Decodes `undefined`.
    pub fn undefined(&mut self) -> Result<()> { self.check_tag(Tag::Undefined) }
    /// Decodes `null`.
    pub fn null(&mut self) -> Result<()> { self.check_tag(Tag::Null) }

    /// Decodes a bool.
    pub fn bool(&mut self) -> Result<bool> {
        match self.peek_tag()? {
            Tag::BoolTrue => { self.read_bytes(1)?; Ok(true) }
            Tag::BoolFalse => { self.read_bytes(1)?; Ok(false) }
            tag => Err(Error::InvalidTag(tag as u8)),
        }
    }

    /// Decodes a signed 64-bit integer (LE).
    pub fn int(&mut self) -> Result<i64> { self.check_tag(Tag::Int)?; Ok(i64::from_le_bytes(self.read_array()?)) }
    /// Decodes a 64-bit float from its raw bits (LE).
    pub fn float(&mut self) -> Result<f64> { self.check_tag(Tag::Float)?; Ok(f64::from_bits(u64::from_le_bytes(self.read_array()?))) }
    /// Decodes a timestamp in milliseconds since the Unix epoch (LE).
    pub fn date(&mut self) -> Result<i64> { self.check_tag(Tag::Date)?; Ok(i64::from_le_bytes(self.read_array()?)) }

    /// Decodes a string slice (UTF-8).
    pub fn str(&mut self) -> Result<&'a str> {
        self.check_tag(Tag::String)?;
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes a byte slice.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        self.check_tag(Tag::Bytes)?;
        let len = self.read_len()?;
        self.read_bytes(len)
    }

    /// Decodes a List into an iterator.
    pub fn list(&mut self) -> Result<ListIter<'a>> {
        Ok(ListIter { dec: self.enter_container(Tag::List)? })
    }

    /// Decodes a Map into an iterator.
    pub fn map(&mut self) -> Result<MapIter<'a>> {
        Ok(MapIter { dec: self.enter_container(Tag::Map)? })
    }

    /// Decodes the next item as a full `Value` tree.
    ///
    /// # Errors
    /// Returns `Error::RecursionLimitExceeded` past [`MAX_DEPTH`] levels of nesting.
    pub fn value(&mut self) -> Result<Value> {
        self.value_impl(0)
    }

    fn value_impl(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::RecursionLimitExceeded);
        }

        let value = match self.peek_tag()? {
            Tag::Undefined => { self.undefined()?; Value::Undefined }
            Tag::Null => { self.null()?; Value::Null }
            Tag::BoolTrue | Tag::BoolFalse => Value::Bool(self.bool()?),
            Tag::Int => Value::Int(self.int()?),
            Tag::Float => Value::Float(self.float()?),
            Tag::Date => Value::Date(self.date()?),
            Tag::String => Value::String(self.str()?.to_string()),
            Tag::Bytes => Value::Bytes(self.bytes()?.to_vec()),
            Tag::List => {
                let mut iter = self.list()?;
                let mut items = Vec::new();
                while let Some(mut item) = iter.next()? {
                    items.push(item.value_impl(depth + 1)?);
                }
                Value::List(items)
            }
            Tag::Map => {
                let mut iter = self.map()?;
                let mut entries = Vec::new();
                while let Some((key, mut item)) = iter.next()? {
                    entries.push((key.to_string(), item.value_impl(depth + 1)?));
                }
                Value::Map(entries)
            }
        };
        Ok(value)
    }
}

/// Iterator for items within a List.
#[derive(Debug)]
pub struct ListIter<'a> {
    dec: Decoder<'a>,
}

impl<'a> ListIter<'a> {
    /// Returns a Decoder scoped to the next item, or `None` at the end.
    pub fn next(&mut self) -> Result<Option<Decoder<'a>>> {
        if self.dec.is_empty() {
            return Ok(None);
        }
        let mut probe = self.dec.clone();
        probe.skip()?;
        let len = self.dec.remaining() - probe.remaining();
        Ok(Some(Decoder::new(self.dec.read_bytes(len)?)))
    }
}

/// Iterator for Key-Value pairs within a Map.
#[derive(Debug)]
pub struct MapIter<'a> {
    dec: Decoder<'a>,
}

impl<'a> MapIter<'a> {
    /// Returns `(Key, ValueDecoder)` for the next entry, or `None` at the end.
    pub fn next(&mut self) -> Result<Option<(&'a str, Decoder<'a>)>> {
        if self.dec.is_empty() {
            return Ok(None);
        }
        let key = self.dec.str()?;
        if self.dec.is_empty() {
            return Err(Error::DanglingKey);
        }
        let mut probe = self.dec.clone();
        probe.skip()?;
        let len = self.dec.remaining() - probe.remaining();
        Ok(Some((key, Decoder::new(self.dec.read_bytes(len)?))))
    }
}
