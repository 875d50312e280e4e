//! # Dispatch Envelope
//!
//! The single wire unit of a call: `{ operation, parameters }`.
//!
//! ## Invariants
//! - **Both Fields Present**: Decoding fails if either field is missing; the
//!   parameter list may be empty.
//! - **Opaque Operation**: The operation is kept as a string so an identifier
//!   the receiver does not know still decodes and can be rejected by name.
//! - **Forward Compatibility**: Unknown envelope fields are skipped.

use bridgepack::Decoder;
use bridgepack::Encoder;
use bridgepack::Value;

use crate::error::Error;
use crate::error::Result;
use crate::operation::Operation;

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub operation: String,
    pub parameters: Vec<Value>,
}

impl Envelope {
    pub fn new(operation: Operation, parameters: Vec<Value>) -> Self {
        Self {
            operation: operation.as_str().to_string(),
            parameters,
        }
    }

    /// Encode this envelope into the encoder. Only the codec can fail here.
    pub fn encode(&self, enc: &mut Encoder) -> bridgepack::Result<()> {
        enc.map_begin()?;

        enc.key("operation")?;
        enc.str(&self.operation)?;

        enc.key("parameters")?;
        enc.list_begin()?;
        for param in &self.parameters {
            enc.value(param)?;
        }
        enc.list_end()?;

        enc.map_end()?;
        Ok(())
    }

    /// Encodes the envelope as a request body.
    pub fn to_bytes(&self) -> bridgepack::Result<Vec<u8>> {
        let mut enc = Encoder::new();
        self.encode(&mut enc)?;
        enc.into_bytes()
    }

    /// Decode an envelope from the decoder.
    pub fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let mut map = dec.map()?;
        let mut operation = None;
        let mut parameters = None;

        while let Some((key, mut val)) = map.next()? {
            match key {
                "operation" => operation = Some(val.str()?.to_string()),
                "parameters" => {
                    let mut items = val.list()?;
                    let mut params = Vec::new();
                    while let Some(mut item) = items.next()? {
                        params.push(item.value()?);
                    }
                    parameters = Some(params);
                }
                _ => val.skip()?,
            }
        }

        Ok(Envelope {
            operation: operation.ok_or(Error::ProtocolViolation("Missing operation".into()))?,
            parameters: parameters.ok_or(Error::ProtocolViolation("Missing parameters".into()))?,
        })
    }

    /// Decodes a request body, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut dec = Decoder::new(bytes);
        let envelope = Self::decode(&mut dec)?;
        if !dec.is_empty() {
            return Err(Error::Codec(bridgepack::Error::TrailingBytes(dec.remaining())));
        }
        Ok(envelope)
    }

    /// Resolves the operation against the operation table.
    pub fn resolve(&self) -> Result<Operation> {
        self.operation.parse()
    }
}
