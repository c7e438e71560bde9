use std::time::Duration;

use crate::{
    config::AuthConfig,
    core::crypto::{
        codec, tags_match,
        token::{self, SealedToken},
        Clock, Expiry, Keyring, MacAlgorithm, MalformedReason, MintError, Payload, SystemClock,
        ValidationError,
    },
};

/// Default lifetime for [Authenticator::mint_default].
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Longest token string [Authenticator::validate] will look at.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 4096;

#[derive(Debug, Clone)]
pub struct AuthenticatorOptions {
    pub default_ttl: Duration,
    pub max_token_len: usize,
}

impl Default for AuthenticatorOptions {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

/// Mints and validates cookie authenticators.
///
/// The keyring and clock are fixed at construction. All operations take
/// `&self` and hold no locks, so one instance can serve every request.
///
/// ```
/// use std::time::Duration;
/// use cookieseal::{algos::sha2::HmacSha256, Authenticator, Keyring, Payload, Secret};
///
/// let keyring = Keyring::<HmacSha256>::single(&Secret::generate()).unwrap();
/// let auth = Authenticator::with_system_clock(keyring);
///
/// let token = auth.mint(&Payload::new("mrf"), Duration::from_secs(600)).unwrap();
/// assert_eq!(auth.validate(&token).unwrap().subject(), "mrf");
/// ```
pub struct Authenticator<M, C = SystemClock> {
    keyring: Keyring<M>,
    clock: C,
    options: AuthenticatorOptions,
}

impl<M: MacAlgorithm> Authenticator<M, SystemClock> {
    pub fn with_system_clock(keyring: Keyring<M>) -> Self {
        Self::new(keyring, SystemClock)
    }

    /// Builds the keyring and options described by `config`.
    pub fn from_config(config: &AuthConfig) -> Result<Self, crate::config::ConfigError> {
        let keyring = config.keyring::<M>()?;
        tracing::info!(
            algorithm = M::NAME,
            keys = keyring.len(),
            primary_version = keyring.primary_version(),
            "loaded cookie authenticator keyring"
        );
        Ok(Self::new(keyring, SystemClock).with_options(config.options()))
    }
}

impl<M, C> Authenticator<M, C>
where
    M: MacAlgorithm,
    C: Clock,
{
    pub fn new(keyring: Keyring<M>, clock: C) -> Self {
        Self {
            keyring,
            clock,
            options: AuthenticatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AuthenticatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AuthenticatorOptions {
        &self.options
    }

    pub fn keyring(&self) -> &Keyring<M> {
        &self.keyring
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mints a token for `payload` that expires `ttl` from now.
    pub fn mint(&self, payload: &Payload, ttl: Duration) -> Result<String, MintError> {
        let expires_at = self
            .clock
            .now()
            .checked_add(ttl)
            .ok_or(MintError::ExpiryOutOfRange)?;
        self.seal(payload, Expiry::At(expires_at))
    }

    /// [Authenticator::mint] with the configured default lifetime.
    pub fn mint_default(&self, payload: &Payload) -> Result<String, MintError> {
        self.mint(payload, self.options.default_ttl)
    }

    /// Mints a token with no expiry. It stays valid until its key version
    /// is removed from the keyring.
    pub fn mint_persistent(&self, payload: &Payload) -> Result<String, MintError> {
        self.seal(payload, Expiry::Never)
    }

    fn seal(&self, payload: &Payload, expiry: Expiry) -> Result<String, MintError> {
        let body = codec::encode(payload, expiry)?;

        // Never hand out a token that validate would refuse on length.
        let len = token::sealed_len(body.len(), M::TAG_LEN);
        if len > self.options.max_token_len {
            return Err(MintError::TokenTooLong { len, max: self.options.max_token_len });
        }

        let (version, mac) = self.keyring.primary();
        let tag = mac.tag_sequence(&[&[version][..], &body[..]]);

        tracing::trace!(key_version = version, ?expiry, "minted token");
        Ok(token::seal(version, &body, &tag))
    }

    /// Checks a token exactly as received and returns the payload it carries.
    ///
    /// The tag is verified before any part of the body is interpreted.
    pub fn validate(&self, token: &str) -> Result<Payload, ValidationError> {
        self.validate_inner(token).inspect_err(|error| {
            tracing::debug!(reason = error.kind(), "rejected token");
        })
    }

    fn validate_inner(&self, token: &str) -> Result<Payload, ValidationError> {
        if token.len() > self.options.max_token_len {
            return Err(MalformedReason::TooLong.into());
        }

        let raw = token::unseal(token)?;
        let sealed = SealedToken::split(&raw, M::TAG_LEN)?;

        let mac = self
            .keyring
            .get(sealed.key_version)
            .ok_or(ValidationError::InvalidSignature)?;
        let expected = mac.tag_sequence(&sealed.signed_parts());
        if !tags_match(&expected, sealed.tag) {
            return Err(ValidationError::InvalidSignature);
        }

        let (payload, expiry) = codec::decode(sealed.body)?;

        if let Expiry::At(expired_at) = expiry {
            if expiry.has_passed(self.clock.now()) {
                return Err(ValidationError::ExpiredToken { expired_at });
            }
        }

        Ok(payload)
    }
}
