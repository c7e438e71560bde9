use std::{collections::BTreeMap, time::Duration};

use arbitrary::{Arbitrary, Unstructured};

use crate::core::crypto::{MacAlgorithm, Payload, Secret};

pub const ARBTEST_DURATION: Duration = Duration::from_secs(2);

const MAX_ARBITRARY_FIELD: usize = 64;
const MAX_ARBITRARY_ATTRIBUTES: usize = 8;

/// A payload small enough to always fit under the default token length.
#[derive(Debug, Clone)]
pub struct ArbitraryPayload(pub Payload);

impl<'a> Arbitrary<'a> for ArbitraryPayload {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let subject = bounded_string(u)?;
        let count = u.int_in_range(0..=MAX_ARBITRARY_ATTRIBUTES)?;
        let mut attributes = BTreeMap::new();
        for _ in 0..count {
            attributes.insert(bounded_string(u)?, bounded_string(u)?);
        }
        Ok(Self(Payload { subject, attributes }))
    }
}

/// Cuts an arbitrary string down to at most [MAX_ARBITRARY_FIELD] bytes on a
/// char boundary.
fn bounded_string(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    let mut value = String::arbitrary(u)?;
    let mut end = value.len().min(MAX_ARBITRARY_FIELD);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
    Ok(value)
}

#[cfg(feature = "sha2")]
pub fn manual_authenticator(
    start: crate::core::crypto::MsSinceEpoch,
) -> (
    crate::Authenticator<crate::algos::sha2::HmacSha256, crate::core::crypto::ManualClock>,
    crate::core::crypto::ManualClock,
) {
    let clock = crate::core::crypto::ManualClock::new(start);
    let keyring = crate::Keyring::single(&Secret::generate()).unwrap();
    (crate::Authenticator::new(keyring, clock.clone()), clock)
}

/// Checks that a MAC is deterministic, key-dependent and message-dependent.
pub fn run_mac_harness<M>()
where
    M: MacAlgorithm,
{
    arbtest::arbtest(|u| {
        let message: Vec<u8> = Vec::arbitrary(u)?;
        test_mac_harness::<M>(&message);
        Ok(())
    })
    .budget(ARBTEST_DURATION);
}

pub fn test_mac_harness<M>(message: &[u8])
where
    M: MacAlgorithm,
{
    let secret = Secret::generate();
    let mac = M::with_key(secret.expose()).unwrap();
    let tag = mac.tag(message);
    assert_eq!(tag.len(), M::TAG_LEN);
    assert_eq!(tag, M::with_key(secret.expose()).unwrap().tag(message));

    // Split input is the same as joined input.
    let (head, tail) = message.split_at(message.len() / 2);
    assert_eq!(mac.tag_sequence(&[head, tail]), tag);

    let other = M::with_key(Secret::generate().expose()).unwrap();
    assert_ne!(other.tag(message), tag);

    let mut extended = message.to_vec();
    extended.push(0);
    assert_ne!(mac.tag(&extended), tag);
}

#[cfg(test)]
mod tests {
    use arbitrary::{Arbitrary, Unstructured};

    use super::{ArbitraryPayload, MAX_ARBITRARY_ATTRIBUTES, MAX_ARBITRARY_FIELD};

    #[test]
    pub fn test_arbitrary_payload_is_bounded() {
        arbtest::arbtest(|u| {
            let ArbitraryPayload(payload) = ArbitraryPayload::arbitrary(u)?;
            assert!(payload.subject.len() <= MAX_ARBITRARY_FIELD);
            assert!(payload.attributes.len() <= MAX_ARBITRARY_ATTRIBUTES);
            Ok(())
        });

        let bytes = [0xffu8; 512];
        let mut u = Unstructured::new(&bytes);
        assert!(ArbitraryPayload::arbitrary(&mut u).is_ok());
    }
}
