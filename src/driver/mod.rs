mod authenticator;

pub use authenticator::*;

#[cfg(feature = "sha2")]
pub type DefaultAuthenticator<C = crate::core::crypto::SystemClock> =
    Authenticator<crate::algos::sha2::HmacSha256, C>;
