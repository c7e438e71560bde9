/// Implements [MacAlgorithm](crate::core::crypto::MacAlgorithm) as HMAC over
/// the given digest.
macro_rules! new_hmac_spec {
    (
        $name:ident,
        $digest:ty,
        $tag_len:expr,
        $label:literal
    ) => {
        #[derive(Clone)]
        pub struct $name(hmac::Hmac<$digest>);

        impl crate::core::crypto::MacAlgorithm for $name {
            const TAG_LEN: usize = $tag_len;
            const NAME: &'static str = $label;

            fn with_key(key: &[u8]) -> Result<Self, hmac::digest::InvalidLength> {
                <hmac::Hmac<$digest> as hmac::Mac>::new_from_slice(key).map(Self)
            }

            fn tag_sequence(&self, parts: &[&[u8]]) -> Vec<u8> {
                use hmac::Mac;

                let mut mac = self.0.clone();
                for part in parts {
                    mac.update(part);
                }
                mac.finalize().into_bytes().to_vec()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($label)
            }
        }
    };
}

pub(crate) use new_hmac_spec;

#[cfg(feature="sha2")]
pub mod sha2;

#[cfg(feature="sha3")]
pub mod sha3;
