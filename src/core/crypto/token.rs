//! Cookie-safe framing of a signed body.
//!
//! A token is `base64url(version || body || tag)` without padding. The tag
//! length is fixed by the MAC algorithm, so the frame is split by position.

use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};

use super::MalformedReason;

/// A decoded but not yet verified token.
#[derive(Debug, PartialEq, Eq)]
pub struct SealedToken<'a> {
    pub key_version: u8,
    pub body: &'a [u8],
    pub tag: &'a [u8],
}

impl<'a> SealedToken<'a> {
    /// The bytes covered by the tag.
    pub fn signed_parts(&self) -> [&[u8]; 2] {
        [std::slice::from_ref(&self.key_version), self.body]
    }

    /// Splits a decoded frame, taking the last `tag_len` bytes as the tag.
    pub fn split(raw: &'a [u8], tag_len: usize) -> Result<Self, MalformedReason> {
        let Some((&key_version, rest)) = raw.split_first() else {
            return Err(MalformedReason::TooShort);
        };
        let Some(body_len) = rest.len().checked_sub(tag_len) else {
            return Err(MalformedReason::TooShort);
        };
        let (body, tag) = rest.split_at(body_len);
        Ok(Self { key_version, body, tag })
    }
}

/// Frames and encodes a signed body.
pub fn seal(key_version: u8, body: &[u8], tag: &[u8]) -> String {
    let mut frame = Vec::with_capacity(1 + body.len() + tag.len());
    frame.push(key_version);
    frame.extend_from_slice(body);
    frame.extend_from_slice(tag);
    BASE64_URL_SAFE_NO_PAD.encode(frame)
}

/// Length of the string [seal] produces for a body and tag of these sizes.
pub fn sealed_len(body_len: usize, tag_len: usize) -> usize {
    body_len
        .checked_add(tag_len)
        .and_then(|len| len.checked_add(1))
        .and_then(|frame_len| base64::encoded_len(frame_len, false))
        .unwrap_or(usize::MAX)
}

/// Decodes the transport form back into frame bytes.
pub fn unseal(token: &str) -> Result<Vec<u8>, MalformedReason> {
    BASE64_URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| MalformedReason::Encoding)
}
