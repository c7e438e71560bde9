pub mod codec;
pub mod keyring;
pub mod mem;
pub mod payload;
pub mod time;
pub mod token;
mod error;

pub use error::*;
pub use keyring::Keyring;
pub use mem::Secret;
pub use payload::Payload;
pub use time::*;

use hmac::digest::InvalidLength;
use subtle::ConstantTimeEq;

/// A keyed integrity function.
///
/// Implementations are keyed once, when the keyring is built, and then
/// cloned for every tag so the key schedule is not recomputed per request.
pub trait MacAlgorithm: Clone {
    /// Length in bytes of every tag this algorithm produces.
    const TAG_LEN: usize;
    const NAME: &'static str;

    fn with_key(key: &[u8]) -> Result<Self, InvalidLength>;

    fn tag(&self, message: &[u8]) -> Vec<u8> {
        self.tag_sequence(&[message])
    }

    /// Tags the concatenation of `parts` without building it.
    fn tag_sequence(&self, parts: &[&[u8]]) -> Vec<u8>;
}

pub trait FixedByteRepr<const N: usize> {
    fn to_fixed_repr(&self) -> [u8; N];
    fn from_fixed_repr(val: [u8; N]) -> Self;
}

/// Compares two tags without branching on their contents.
///
/// Only the lengths are compared in variable time; they are public.
pub fn tags_match(expected: &[u8], received: &[u8]) -> bool {
    bool::from(expected.ct_eq(received))
}
