//! Wall-clock instants used for `iat` and `exp`.
//!
//! Token lifetimes are configured in milliseconds, so a [`Timestamp`] keeps
//! millisecond precision internally. On the wire JWTs carry *NumericDate*
//! values, which are seconds since the Unix epoch and may be fractional.
//! The [`numeric_date`] serde module bridges the two: whole seconds are
//! written as plain integers (what every verifier expects), and sub-second
//! instants as fractional seconds so nothing is lost on a round-trip.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// Unlike `Instant` this is a wall-clock value: tokens are verified by
/// other processes and other machines, so the only thing everyone agrees
/// on is UTC time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The current system time.
    ///
    /// A clock set before 1970 is clamped to the epoch rather than
    /// treated as an error; every token issued then is simply expired.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Creates a timestamp from milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a timestamp from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Adds a duration, saturating at the far future instead of wrapping.
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Subtracts a duration, saturating at the epoch.
    pub fn saturating_sub(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_sub(millis))
    }

    /// Time from `self` until `later`, or zero if `later` is not after `self`.
    pub fn until(self, later: Timestamp) -> Duration {
        Duration::from_millis(later.0.saturating_sub(self.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1000, self.0 % 1000)
    }
}

/// Serde adapter between [`Timestamp`] and a JWT NumericDate.
///
/// Use with `#[serde(with = "numeric_date")]`.
pub(crate) mod numeric_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use super::Timestamp;

    pub(crate) fn serialize<S: Serializer>(
        ts: &Timestamp,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let millis = ts.as_millis();
        if millis % 1000 == 0 {
            serializer.serialize_u64(millis / 1000)
        } else {
            serializer.serialize_f64(millis as f64 / 1000.0)
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Timestamp, D::Error> {
        // `f64` accepts both integer and fractional JSON numbers.
        // Epoch seconds stay far below 2^53, so integers convert exactly.
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(D::Error::custom(format!(
                "NumericDate out of range: {secs}"
            )));
        }
        let millis = (secs * 1000.0).round();
        if millis >= u64::MAX as f64 {
            return Err(D::Error::custom("NumericDate out of range"));
        }
        Ok(Timestamp::from_millis(millis as u64))
    }
}
