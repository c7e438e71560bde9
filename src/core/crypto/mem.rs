use std::fmt::Debug;

use base64::{prelude::BASE64_URL_SAFE_NO_PAD, DecodeError, Engine};
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// The shortest secret a keyring will accept.
pub const MIN_SECRET_LEN: usize = 32;

/// Key material for the token MAC.
///
/// The bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// 32 bytes from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0u8; MIN_SECRET_LEN]);
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parses the unpadded url-safe base64 form used in configuration.
    pub fn from_base64(encoded: &str) -> Result<Self, DecodeError> {
        BASE64_URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map(Self::new)
    }

    pub fn to_base64(&self) -> String {
        BASE64_URL_SAFE_NO_PAD.encode(self.expose())
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compares in constant time.
impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.expose().ct_eq(other.expose()))
    }
}

impl Eq for Secret {}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED; {}])", self.0.len())
    }
}

impl From<&[u8]> for Secret {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Secret {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Secret, MIN_SECRET_LEN};

    #[test]
    pub fn test_debug_does_not_leak() {
        let secret = Secret::new(b"anotsosecuresecret".to_vec());
        let printed = format!("{secret:?}");
        assert!(!printed.contains("anotsosecure"));
        assert_eq!(printed, "Secret([REDACTED; 18])");
    }

    #[test]
    pub fn test_generated_secrets_differ() {
        let a = Secret::generate();
        let b = Secret::generate();
        assert_eq!(a.len(), MIN_SECRET_LEN);
        assert_ne!(a, b);
    }

    #[test]
    pub fn test_equality() {
        let secret = Secret::new(vec![7u8; 32]);
        assert_eq!(secret, Secret::new(vec![7u8; 32]));
        assert_ne!(secret, Secret::new(vec![7u8; 31]));
        let mut flipped = vec![7u8; 32];
        flipped[31] = 6;
        assert_ne!(secret, Secret::new(flipped));
    }

    #[test]
    pub fn test_base64_form() {
        let secret = Secret::generate();
        let encoded = secret.to_base64();
        assert!(!encoded.contains('='));
        assert_eq!(Secret::from_base64(&encoded).unwrap(), secret);
        assert_eq!(Secret::from_base64(&format!("  {encoded}\n")).unwrap(), secret);
        assert!(Secret::from_base64("not base64!").is_err());
    }
}
