//! Wire timestamp handling
//!
//! The upstream biller exchanges every instant as milliseconds since the
//! Unix epoch. This module provides:
//! - `EpochMillis`: a `DateTime<Utc>` wrapper with the epoch-millis wire form
//! - The small date arithmetic the due-date rules need (day offsets,
//!   ordering against a reference instant)

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("timestamp {0}ms is outside the representable range")]
    OutOfRange(i64),
}

/// An instant exchanged with the upstream biller
///
/// Serializes as epoch milliseconds (the upstream wire form) while behaving
/// as a plain UTC instant in the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpochMillis(DateTime<Utc>);

impl EpochMillis {
    /// Creates a timestamp from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Result<Self, TemporalError> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Self)
            .ok_or(TemporalError::OutOfRange(millis))
    }

    /// Returns the wrapped UTC instant
    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the instant as milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns this instant shifted forward by whole days
    pub fn plus_days(&self, days: u32) -> Self {
        Self(self.0 + Duration::days(i64::from(days)))
    }

    /// Returns true if this instant lies strictly after the reference
    pub fn is_after(&self, reference: DateTime<Utc>) -> bool {
        self.0 > reference
    }
}

impl From<DateTime<Utc>> for EpochMillis {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<EpochMillis> for DateTime<Utc> {
    fn from(ts: EpochMillis) -> DateTime<Utc> {
        ts.0
    }
}

impl fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for EpochMillis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.timestamp_millis())
    }
}

impl<'de> Deserialize<'de> for EpochMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        EpochMillis::from_millis(millis).map_err(serde::de::Error::custom)
    }
}
