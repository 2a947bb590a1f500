use core::fmt;
use core::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FxError;

/// Fixed bar duration of a candle series.
///
/// `Unknown` is the marker produced by [`Granularity::lookup`] for unrecognized
/// names. It is never a valid stored value: every operation that needs a
/// duration rejects it with `InvalidGranularity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    /// One minute.
    M1,
    /// Five minutes.
    M5,
    /// Fifteen minutes.
    M15,
    /// Thirty minutes.
    M30,
    /// One hour.
    H1,
    /// Four hours.
    H4,
    /// One day.
    Daily,
    /// Seven days.
    Weekly,
    /// Validation-failure marker.
    Unknown,
}

impl Granularity {
    /// All valid granularities, in ordinal order.
    pub const ALL: [Self; 8] = [
        Self::M1,
        Self::M5,
        Self::M15,
        Self::M30,
        Self::H1,
        Self::H4,
        Self::Daily,
        Self::Weekly,
    ];

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a name to a granularity, case-sensitively. Unmatched or empty input
    /// yields `Unknown`.
    #[must_use]
    pub fn lookup(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == name)
            .unwrap_or(Self::Unknown)
    }

    /// Stable ordinal (0 for `M1` up to 7 for `Weekly`); `None` for `Unknown`.
    #[must_use]
    pub const fn ordinal(self) -> Option<u8> {
        match self {
            Self::M1 => Some(0),
            Self::M5 => Some(1),
            Self::M15 => Some(2),
            Self::M30 => Some(3),
            Self::H1 => Some(4),
            Self::H4 => Some(5),
            Self::Daily => Some(6),
            Self::Weekly => Some(7),
            Self::Unknown => None,
        }
    }

    /// Whether this is one of the eight valid granularities.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Length of one bar.
    ///
    /// # Errors
    /// Returns `InvalidGranularity` for `Unknown`.
    pub fn duration(self) -> Result<TimeDelta, FxError> {
        let minutes = match self {
            Self::M1 => 1,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H4 => 4 * 60,
            Self::Daily => 24 * 60,
            Self::Weekly => 7 * 24 * 60,
            Self::Unknown => return Err(FxError::invalid_granularity(self.as_str())),
        };
        Ok(TimeDelta::minutes(minutes))
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::lookup(s) {
            Self::Unknown => Err(FxError::invalid_granularity(s)),
            g => Ok(g),
        }
    }
}

impl Serialize for Granularity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Granularity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
