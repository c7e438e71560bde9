use std::{
    sync::{atomic::{AtomicI64, Ordering}, Arc},
    time::Duration,
};

use chrono::Utc;

use super::FixedByteRepr;

/// An absolute point in time, in milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Eq, Ord, Hash)]
pub struct MsSinceEpoch(pub i64);

impl MsSinceEpoch {
    pub const ZERO: MsSinceEpoch = MsSinceEpoch(0);

    pub fn milliseconds_since_epoch(&self) -> i64 {
        self.0
    }

    pub fn seconds_since_epoch(&self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Adds a duration, returning `None` if the result does not fit in an `i64`.
    pub fn checked_add(self, rhs: Duration) -> Option<Self> {
        let millis = i64::try_from(rhs.as_millis()).ok()?;
        self.0.checked_add(millis).map(Self)
    }
}

impl FixedByteRepr<8> for MsSinceEpoch {
    fn to_fixed_repr(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
    fn from_fixed_repr(val: [u8; 8]) -> Self {
        Self(i64::from_be_bytes(val))
    }
}

/// When a token stops being accepted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Expiry {
    /// Valid until the signing key is retired.
    Never,
    /// Valid up to and including this instant.
    At(MsSinceEpoch),
}

impl Expiry {
    /// Has this expiry passed at `now`? The boundary itself is still valid.
    pub fn has_passed(&self, now: MsSinceEpoch) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => now > *at,
        }
    }
}

/// Source of "now" for both minting and validation.
pub trait Clock {
    fn now(&self) -> MsSinceEpoch;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> MsSinceEpoch {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> MsSinceEpoch {
        (**self).now()
    }
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> MsSinceEpoch {
        Utc::now().into()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hold one handle
/// while an authenticator holds another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    current: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: MsSinceEpoch) -> Self {
        Self {
            current: Arc::new(AtomicI64::new(start.0)),
        }
    }
    pub fn set(&self, time: MsSinceEpoch) {
        self.current.store(time.0, Ordering::SeqCst);
    }
    pub fn advance(&self, by: Duration) {
        let by = by.as_millis().min(i64::MAX as u128) as i64;
        // fetch_add wraps, the clock must saturate instead.
        let _ = self.current.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
            Some(t.saturating_add(by))
        });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> MsSinceEpoch {
        MsSinceEpoch(self.current.load(Ordering::SeqCst))
    }
}
