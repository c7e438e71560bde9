use super::MsSinceEpoch;

/// Why a token could not be parsed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("token exceeds the maximum accepted length")]
    TooLong,
    #[error("token is not valid url-safe base64")]
    Encoding,
    #[error("token is too short to carry a key version and tag")]
    TooShort,
    #[error("token body ended before all fields were read")]
    Truncated,
    #[error("token body has an unknown expiry marker")]
    UnknownExpiryTag,
    #[error("token body contains a field that is not utf-8")]
    InvalidUtf8,
    #[error("token attributes are not in strictly ascending key order")]
    NonCanonicalAttributes,
    #[error("token body has bytes after the last field")]
    TrailingBytes,
}

/// The outcome of a rejected token.
///
/// Callers should treat every variant as "not authenticated". The variants
/// exist for logging and metrics, not for telling the client what went wrong.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed token: {0}")]
    MalformedToken(MalformedReason),
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired at {}ms", expired_at.0)]
    ExpiredToken { expired_at: MsSinceEpoch },
}

impl ValidationError {
    /// A stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::ExpiredToken { .. } => "expired_token",
        }
    }

    /// Always true. Every rejection means the request is unauthenticated.
    pub fn is_unauthenticated(&self) -> bool {
        true
    }
}

impl From<MalformedReason> for ValidationError {
    fn from(value: MalformedReason) -> Self {
        Self::MalformedToken(value)
    }
}

/// A payload that the codec cannot represent. This is a caller bug.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("payload field `{field}` is {len} bytes, the limit is 65535")]
    PayloadTooLarge { field: &'static str, len: usize },
    #[error("payload has {0} attributes, the limit is 65535")]
    TooManyAttributes(usize),
    #[error("expiry does not fit in a millisecond timestamp")]
    ExpiryOutOfRange,
    #[error("token would be {len} characters, the limit is {max}")]
    TokenTooLong { len: usize, max: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    #[error("secret for key version {version} is {len} bytes, at least {min} are required")]
    SecretTooShort { version: u8, len: usize, min: usize },
    #[error("key version {0} appears more than once")]
    DuplicateVersion(u8),
    #[error("primary key version {0} is not in the keyring")]
    UnknownPrimary(u8),
    #[error("the keyring has no keys")]
    Empty,
    #[error("the mac algorithm rejected the key for version {0}")]
    UnsupportedKey(u8),
}
