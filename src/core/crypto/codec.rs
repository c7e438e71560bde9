//! Binary layout of the signed token body.
//!
//! ```text
//! expiry    0x00                     never
//!           0x01 i64 (8 bytes)       expires at, ms since epoch
//! subject   u16 len, utf-8 bytes
//! count     u16
//! attribute u16 len, key bytes, u16 len, value bytes   (ascending key order)
//! ```
//!
//! All integers are big-endian. Every variable-length field carries its own
//! length, so no byte value inside a field can be mistaken for structure.

use std::collections::BTreeMap;

use super::{Expiry, FixedByteRepr, MalformedReason, MintError, MsSinceEpoch, Payload};

const EXPIRY_NEVER: u8 = 0x00;
const EXPIRY_AT: u8 = 0x01;

const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Serializes a payload and expiry into the body that gets signed.
pub fn encode(payload: &Payload, expiry: Expiry) -> Result<Vec<u8>, MintError> {
    let mut buffer = Vec::with_capacity(encoded_len(payload));

    match expiry {
        Expiry::Never => buffer.push(EXPIRY_NEVER),
        Expiry::At(at) => {
            buffer.push(EXPIRY_AT);
            buffer.extend_from_slice(&at.to_fixed_repr());
        }
    }

    put_field(&mut buffer, "subject", &payload.subject)?;

    let count = u16::try_from(payload.attributes.len())
        .map_err(|_| MintError::TooManyAttributes(payload.attributes.len()))?;
    buffer.extend_from_slice(&count.to_be_bytes());

    // BTreeMap iterates in ascending key order.
    for (key, value) in &payload.attributes {
        put_field(&mut buffer, "attribute key", key)?;
        put_field(&mut buffer, "attribute value", value)?;
    }

    Ok(buffer)
}

/// Parses a body produced by [encode]. Accepts nothing else.
pub fn decode(body: &[u8]) -> Result<(Payload, Expiry), MalformedReason> {
    let mut reader = Reader { remaining: body };

    let expiry = match reader.byte()? {
        EXPIRY_NEVER => Expiry::Never,
        EXPIRY_AT => Expiry::At(MsSinceEpoch::from_fixed_repr(reader.array()?)),
        _ => return Err(MalformedReason::UnknownExpiryTag),
    };

    let subject = reader.field()?;

    let count = u16::from_be_bytes(reader.array()?);
    let mut attributes = BTreeMap::new();
    let mut previous: Option<String> = None;
    for _ in 0..count {
        let key = reader.field()?;
        let value = reader.field()?;
        if previous.as_ref().is_some_and(|p| *p >= key) {
            return Err(MalformedReason::NonCanonicalAttributes);
        }
        previous = Some(key.clone());
        attributes.insert(key, value);
    }

    if !reader.remaining.is_empty() {
        return Err(MalformedReason::TrailingBytes);
    }

    Ok((Payload { subject, attributes }, expiry))
}

fn encoded_len(payload: &Payload) -> usize {
    let attributes: usize = payload
        .attributes
        .iter()
        .map(|(k, v)| 4 + k.len() + v.len())
        .sum();
    9 + 2 + payload.subject.len() + 2 + attributes
}

fn put_field(buffer: &mut Vec<u8>, name: &'static str, value: &str) -> Result<(), MintError> {
    if value.len() > MAX_FIELD_LEN {
        return Err(MintError::PayloadTooLarge {
            field: name,
            len: value.len(),
        });
    }
    buffer.extend_from_slice(&(value.len() as u16).to_be_bytes());
    buffer.extend_from_slice(value.as_bytes());
    Ok(())
}

struct Reader<'a> {
    remaining: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], MalformedReason> {
        if self.remaining.len() < len {
            return Err(MalformedReason::Truncated);
        }
        let (head, tail) = self.remaining.split_at(len);
        self.remaining = tail;
        Ok(head)
    }

    fn byte(&mut self) -> Result<u8, MalformedReason> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], MalformedReason> {
        self.take(N)?
            .try_into()
            .map_err(|_| MalformedReason::Truncated)
    }

    fn field(&mut self) -> Result<String, MalformedReason> {
        let len = u16::from_be_bytes(self.array()?) as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| MalformedReason::InvalidUtf8)
    }
}
