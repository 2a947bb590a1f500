use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FxError;

/// Currency pair identifier such as `EURUSD`: exactly six ASCII letters `A`-`Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(String);

impl PairId {
    /// Required identifier length.
    pub const LEN: usize = 6;

    /// Validate and wrap a pair identifier.
    ///
    /// # Errors
    /// Returns `InvalidPairIdentifier` unless `value` is exactly six uppercase
    /// ASCII letters.
    pub fn new(value: &str) -> Result<Self, FxError> {
        if value.len() == Self::LEN && value.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(value.to_string()))
        } else {
            Err(FxError::InvalidPairIdentifier {
                value: value.to_string(),
            })
        }
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PairId {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PairId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for PairId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PairId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
