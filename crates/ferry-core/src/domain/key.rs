//! Correlation key: the stable identifier that links queue messages to
//! stored records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Stable external identifier carried by a record and by the messages that
/// refer to it.
///
/// The textual form (26-character Crockford base32) is what travels on the
/// wire as the correlation header. Keys are assigned once, at record
/// creation, and never change. ULIDs sort by creation time, which keeps
/// scans and logs readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorrelationKey(Ulid);

impl CorrelationKey {
    /// Generate a fresh key.
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CorrelationKey {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}
