use serde::{de::Visitor, Deserialize, Serialize};

use crate::core::crypto::{MsSinceEpoch, Secret};

/* SECRET SERDE */

/// Secrets travel through configuration as unpadded url-safe base64.
impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base64())
        } else {
            serializer.serialize_bytes(self.expose())
        }
    }
}

struct SecretVisitor;

impl<'de> Visitor<'de> for SecretVisitor {
    type Value = Secret;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an unpadded url-safe b64 encoded secret")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error, {
        // The decode error names the offending byte, so it is not passed on.
        Secret::from_base64(v).map_err(|_| E::custom("secret is not valid url-safe base64"))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
        where
            E: serde::de::Error, {
        Ok(Secret::new(v))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
        where
            E: serde::de::Error, {
        Ok(Secret::new(v))
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>
        {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(SecretVisitor)
        } else {
            deserializer.deserialize_byte_buf(SecretVisitor)
        }
    }
}

/* Milliseconds Since Epoch */
impl Serialize for MsSinceEpoch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for MsSinceEpoch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {
        Ok(Self(i64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::crypto::{MsSinceEpoch, Secret};

    #[test]
    pub fn test_secret_json_form() {
        let secret = Secret::generate();
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", secret.to_base64()));

        let decoded: Secret = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, secret);

        assert!(serde_json::from_str::<Secret>("\"***\"").is_err());
        assert!(serde_json::from_str::<Secret>("12").is_err());
    }

    #[test]
    pub fn test_ms_since_epoch_is_a_bare_integer() {
        assert_eq!(serde_json::to_string(&MsSinceEpoch(-7)).unwrap(), "-7");
        assert_eq!(serde_json::from_str::<MsSinceEpoch>("1500").unwrap(), MsSinceEpoch(1500));
    }
}
