use super::{mem::MIN_SECRET_LEN, KeyringError, MacAlgorithm, Secret};

/// The versioned keys an authenticator signs and verifies with.
///
/// New tokens are always minted under the primary version. Retired versions
/// stay verifiable until they are removed, at which point every token minted
/// under them stops validating.
#[derive(Clone)]
pub struct Keyring<M> {
    primary: u8,
    keys: Vec<(u8, M)>,
}

impl<M: MacAlgorithm> Keyring<M> {
    /// A keyring holding one key, version 0.
    pub fn single(secret: &Secret) -> Result<Self, KeyringError> {
        Self::new(0, secret)
    }

    pub fn new(primary: u8, secret: &Secret) -> Result<Self, KeyringError> {
        Ok(Self {
            primary,
            keys: vec![(primary, keyed::<M>(primary, secret)?)],
        })
    }

    /// Adds a key that is accepted for validation but never minted with.
    pub fn with_retired(mut self, version: u8, secret: &Secret) -> Result<Self, KeyringError> {
        if self.get(version).is_some() {
            return Err(KeyringError::DuplicateVersion(version));
        }
        self.keys.push((version, keyed::<M>(version, secret)?));
        Ok(self)
    }

    /// Builds a keyring from `(version, secret)` pairs, minting with `primary`.
    pub fn from_entries<'a, I>(primary: u8, entries: I) -> Result<Self, KeyringError>
    where
        I: IntoIterator<Item = (u8, &'a Secret)>,
    {
        let mut keys: Vec<(u8, M)> = Vec::new();
        for (version, secret) in entries {
            if keys.iter().any(|(v, _)| *v == version) {
                return Err(KeyringError::DuplicateVersion(version));
            }
            keys.push((version, keyed::<M>(version, secret)?));
        }
        if keys.is_empty() {
            return Err(KeyringError::Empty);
        }
        if !keys.iter().any(|(v, _)| *v == primary) {
            return Err(KeyringError::UnknownPrimary(primary));
        }
        Ok(Self { primary, keys })
    }

    pub fn primary_version(&self) -> u8 {
        self.primary
    }

    pub fn primary(&self) -> (u8, &M) {
        // The constructors guarantee the primary is present.
        let position = self
            .keys
            .iter()
            .position(|(v, _)| *v == self.primary)
            .unwrap_or(0);
        let (version, mac) = &self.keys[position];
        (*version, mac)
    }

    pub fn get(&self, version: u8) -> Option<&M> {
        self.keys
            .iter()
            .find(|(v, _)| *v == version)
            .map(|(_, mac)| mac)
    }

    pub fn versions(&self) -> impl Iterator<Item = u8> + '_ {
        self.keys.iter().map(|(v, _)| *v)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<M> std::fmt::Debug for Keyring<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let versions: Vec<u8> = self.keys.iter().map(|(v, _)| *v).collect();
        f.debug_struct("Keyring")
            .field("primary", &self.primary)
            .field("versions", &versions)
            .finish()
    }
}

fn keyed<M: MacAlgorithm>(version: u8, secret: &Secret) -> Result<M, KeyringError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(KeyringError::SecretTooShort {
            version,
            len: secret.len(),
            min: MIN_SECRET_LEN,
        });
    }
    M::with_key(secret.expose()).map_err(|_| KeyringError::UnsupportedKey(version))
}
