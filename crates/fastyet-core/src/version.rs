//! Compiler release identifiers.
//!
//! Result files spell versions either as full release strings (`"1.43.0"`) or
//! in the older underscored form (`"1_42"`). A [`Version`] keeps the raw
//! spelling for display and orders by its numeric components, so `1.9` sorts
//! before `1.10`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::key::MalformedKeyError;

/// A compiler release, e.g. `1.43.0` or `1_42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    components: Vec<u32>,
}

impl Version {
    /// The version exactly as it appeared in the result file.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components, in order (`"1.43.0"` → `[1, 43, 0]`).
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// The minor release number, i.e. the component after the first separator.
    pub fn minor(&self) -> Option<u32> {
        self.components.get(1).copied()
    }
}

impl FromStr for Version {
    type Err = MalformedKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MalformedKeyError::InvalidVersion {
            version: s.to_owned(),
        };
        if s.is_empty() {
            return Err(invalid());
        }
        let components = s
            .split(['.', '_'])
            .map(|part| {
                // `u32::from_str` also takes a leading `+`.
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                part.parse::<u32>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Version {
            raw: s.to_owned(),
            components,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Trailing zeros are not significant: 1_42 and 1.42.0 compare equal
        // numerically and fall back to the raw spelling.
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).copied().unwrap_or(0);
                let b = other.components.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Compare two raw version strings numerically.
///
/// Strings that do not parse as versions sort after every valid version and
/// among themselves lexicographically, so presentation code can sort any
/// `version` column without failing.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.parse::<Version>(), b.parse::<Version>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
