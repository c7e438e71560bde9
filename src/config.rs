//! Secret provisioning and authenticator settings.
//!
//! Configuration is read once at process start, either deserialized from a
//! config file or collected from `COOKIESEAL_*` environment variables.

use std::time::Duration;

use crate::{
    core::crypto::{Keyring, KeyringError, MacAlgorithm, Secret},
    driver::{AuthenticatorOptions, DEFAULT_MAX_TOKEN_LEN, DEFAULT_TTL},
};

pub const ENV_SECRET: &str = "COOKIESEAL_SECRET";
pub const ENV_KEY_VERSION: &str = "COOKIESEAL_KEY_VERSION";
pub const ENV_RETIRED_KEYS: &str = "COOKIESEAL_RETIRED_KEYS";
pub const ENV_TTL_SECS: &str = "COOKIESEAL_TTL_SECS";
pub const ENV_MAX_TOKEN_LEN: &str = "COOKIESEAL_MAX_TOKEN_LEN";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("{var} does not hold a valid url-safe base64 secret")]
    InvalidSecret { var: &'static str },
    #[error("{var} must be a non-negative integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
    #[error("entry {index} of {var} is not of the form `version:secret`")]
    InvalidKeyEntry { var: &'static str, index: usize },
    #[error(transparent)]
    Keyring(#[from] KeyringError),
}

/// One versioned secret.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyConfig {
    pub version: u8,
    pub secret: Secret,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuthConfig {
    /// Version new tokens are minted under.
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary_key: u8,

    pub keys: Vec<KeyConfig>,

    #[cfg_attr(feature = "serde", serde(default = "default_ttl_secs"))]
    pub default_ttl_secs: u64,

    #[cfg_attr(feature = "serde", serde(default = "default_max_token_len"))]
    pub max_token_len: usize,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_max_token_len() -> usize {
    DEFAULT_MAX_TOKEN_LEN
}

impl AuthConfig {
    /// A config with a single key, version 0, and default settings.
    pub fn with_secret(secret: Secret) -> Self {
        Self {
            primary_key: 0,
            keys: vec![KeyConfig { version: 0, secret }],
            default_ttl_secs: default_ttl_secs(),
            max_token_len: default_max_token_len(),
        }
    }

    /// Reads the `COOKIESEAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [AuthConfig::from_env], with variables supplied by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(ENV_SECRET).ok_or(ConfigError::MissingVar(ENV_SECRET))?;
        let secret = Secret::from_base64(&secret)
            .map_err(|_| ConfigError::InvalidSecret { var: ENV_SECRET })?;

        let primary_key = parse_number(&lookup, ENV_KEY_VERSION)?.unwrap_or(0);

        let mut keys = vec![KeyConfig { version: primary_key, secret }];
        if let Some(retired) = lookup(ENV_RETIRED_KEYS) {
            keys.extend(parse_retired(&retired)?);
        }

        Ok(Self {
            primary_key,
            keys,
            default_ttl_secs: parse_number(&lookup, ENV_TTL_SECS)?.unwrap_or_else(default_ttl_secs),
            max_token_len: parse_number(&lookup, ENV_MAX_TOKEN_LEN)?.unwrap_or_else(default_max_token_len),
        })
    }

    pub fn keyring<M: MacAlgorithm>(&self) -> Result<Keyring<M>, KeyringError> {
        Keyring::from_entries(
            self.primary_key,
            self.keys.iter().map(|key| (key.version, &key.secret)),
        )
    }

    pub fn options(&self) -> AuthenticatorOptions {
        AuthenticatorOptions {
            default_ttl: Duration::from_secs(self.default_ttl_secs),
            max_token_len: self.max_token_len,
        }
    }
}

fn parse_number<F, N>(lookup: &F, var: &'static str) -> Result<Option<N>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

fn parse_retired(list: &str) -> Result<Vec<KeyConfig>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(index, entry)| {
            let invalid = || ConfigError::InvalidKeyEntry { var: ENV_RETIRED_KEYS, index };
            let (version, secret) = entry.split_once(':').ok_or_else(invalid)?;
            let version = version.trim().parse().map_err(|_| invalid())?;
            let secret = Secret::from_base64(secret).map_err(|_| invalid())?;
            Ok(KeyConfig { version, secret })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use assert_matches::assert_matches;

    use crate::core::crypto::{KeyringError, Secret};

    use super::{AuthConfig, ConfigError, ENV_RETIRED_KEYS, ENV_SECRET};

    fn lookup(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    pub fn test_env_defaults() {
        let secret = Secret::generate();
        let config = AuthConfig::from_lookup(lookup(&[(ENV_SECRET, secret.to_base64())])).unwrap();
        assert_eq!(config.primary_key, 0);
        assert_eq!(config.keys.len(), 1);
        assert_eq!(config.keys[0].secret, secret);
        assert_eq!(config.options().default_ttl, Duration::from_secs(3600));
        assert_eq!(config.options().max_token_len, 4096);
    }

    #[test]
    pub fn test_env_full() {
        let primary = Secret::generate();
        let retired_a = Secret::generate();
        let retired_b = Secret::generate();
        let config = AuthConfig::from_lookup(lookup(&[
            (ENV_SECRET, primary.to_base64()),
            ("COOKIESEAL_KEY_VERSION", "3".into()),
            (ENV_RETIRED_KEYS, format!("2:{}, 1:{},", retired_a.to_base64(), retired_b.to_base64())),
            ("COOKIESEAL_TTL_SECS", " 600 ".into()),
            ("COOKIESEAL_MAX_TOKEN_LEN", "1024".into()),
        ]))
        .unwrap();

        assert_eq!(config.primary_key, 3);
        assert_eq!(config.keys.iter().map(|k| k.version).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(config.keys[2].secret, retired_b);
        assert_eq!(config.options().default_ttl, Duration::from_secs(600));
        assert_eq!(config.max_token_len, 1024);
    }

    #[test]
    pub fn test_env_errors() {
        assert_matches!(AuthConfig::from_lookup(lookup(&[])), Err(ConfigError::MissingVar(ENV_SECRET)));
        assert_matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_SECRET, "not base64!".into())])),
            Err(ConfigError::InvalidSecret { .. })
        );

        let secret = Secret::generate().to_base64();
        assert_matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_SECRET, secret.clone()), ("COOKIESEAL_TTL_SECS", "-1".into())])),
            Err(ConfigError::InvalidNumber { value, .. }) if value == "-1"
        );
        assert_matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_SECRET, secret.clone()), (ENV_RETIRED_KEYS, "nocolon".into())])),
            Err(ConfigError::InvalidKeyEntry { index: 0, .. })
        );
        assert_matches!(
            AuthConfig::from_lookup(lookup(&[(ENV_SECRET, secret), (ENV_RETIRED_KEYS, "300:abcd".into())])),
            Err(ConfigError::InvalidKeyEntry { index: 0, .. })
        );
    }

    #[test]
    pub fn test_error_does_not_echo_secret() {
        let error = AuthConfig::from_lookup(lookup(&[
            (ENV_SECRET, Secret::generate().to_base64()),
            (ENV_RETIRED_KEYS, "1:topsecret!".into()),
        ]))
        .unwrap_err();
        assert!(!error.to_string().contains("topsecret"));
    }

    #[cfg(feature = "sha2")]
    #[test]
    pub fn test_keyring_from_config() {
        use crate::algos::sha2::HmacSha256;

        let config = AuthConfig::with_secret(Secret::generate());
        let ring = config.keyring::<HmacSha256>().unwrap();
        assert_eq!(ring.primary_version(), 0);

        let short = AuthConfig::with_secret(Secret::new(b"short".to_vec()));
        assert_matches!(short.keyring::<HmacSha256>(), Err(KeyringError::SecretTooShort { .. }));

        let mut duplicate = AuthConfig::with_secret(Secret::generate());
        duplicate.keys.push(duplicate.keys[0].clone());
        assert_matches!(duplicate.keyring::<HmacSha256>(), Err(KeyringError::DuplicateVersion(0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    pub fn test_json_config() {
        let secret = Secret::generate();
        let json = format!(r#"{{ "keys": [ {{ "version": 4, "secret": "{}" }} ], "primary_key": 4 }}"#, secret.to_base64());
        let config: AuthConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.primary_key, 4);
        assert_eq!(config.keys[0].secret, secret);
        assert_eq!(config.default_ttl_secs, 3600);
        assert_eq!(config.max_token_len, 4096);

        assert!(serde_json::from_str::<AuthConfig>(r#"{ "primary_key": 0 }"#).is_err());
    }
}
