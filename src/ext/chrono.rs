use chrono::{DateTime, Utc};

use crate::core::crypto::{Expiry, MsSinceEpoch};

impl<T: chrono::TimeZone> From<DateTime<T>> for MsSinceEpoch {
    fn from(value: DateTime<T>) -> Self {
        Self(value.timestamp_millis())
    }
}

impl MsSinceEpoch {
    /// `None` if the timestamp is outside chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl Expiry {
    /// For setting a matching `Expires` attribute on the cookie.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Never => None,
            Self::At(at) => at.to_datetime(),
        }
    }
}
