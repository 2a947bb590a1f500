use core::fmt;
use core::ops::Add;
use core::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FxError;

/// Bucket-identifying timestamp of a bar, in canonical (reference-zone) time.
///
/// The wire form is `yyyy-MM-dd HH:mm:ss`, zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixTime(NaiveDateTime);

const LAYOUT: &[u8; 19] = b"0000-00-00 00:00:00";

impl FixTime {
    /// `chrono` format string of the wire form.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Wrap a canonical timestamp.
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Parse the wire form.
    ///
    /// # Errors
    /// Returns `InvalidFixTime` when the text is not exactly `yyyy-MM-dd HH:mm:ss`
    /// or names a non-existent calendar instant.
    pub fn parse(value: &str) -> Result<Self, FxError> {
        let err = || FxError::InvalidFixTime {
            value: value.to_string(),
        };
        let bytes = value.as_bytes();
        if bytes.len() != LAYOUT.len() {
            return Err(err());
        }
        let shape_ok = bytes.iter().zip(LAYOUT).all(|(b, l)| match l {
            b'0' => b.is_ascii_digit(),
            other => b == other,
        });
        if !shape_ok {
            return Err(err());
        }
        NaiveDateTime::parse_from_str(value, Self::FORMAT)
            .map(Self)
            .map_err(|_| err())
    }

    /// The underlying timestamp.
    #[must_use]
    pub const fn naive(self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for FixTime {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl Add<TimeDelta> for FixTime {
    type Output = Self;

    fn add(self, rhs: TimeDelta) -> Self {
        Self(self.0 + rhs)
    }
}

impl fmt::Display for FixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for FixTime {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FixTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
