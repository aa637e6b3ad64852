//! Shared primitive types used across the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A phone identifier as it appears in the export (MSISDN, short code, ...).
pub type PhoneId = String;

/// The canonical analysis run identifier.
pub type RunId = String;

/// Canonical key for an undirected pair of phones.
///
/// The two identifiers are always stored sorted, so (A, B) and (B, A)
/// produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low:  PhoneId,
    high: PhoneId,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self { low: a.to_string(), high: b.to_string() }
        } else {
            Self { low: b.to_string(), high: a.to_string() }
        }
    }

    pub fn low(&self) -> &str  { &self.low  }
    pub fn high(&self) -> &str { &self.high }

    /// True if `phone` is one of the two endpoints.
    pub fn touches(&self, phone: &str) -> bool {
        self.low == phone || self.high == phone
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        assert_eq!(PairKey::new("9876", "1234"), PairKey::new("1234", "9876"));
        let key = PairKey::new("b", "a");
        assert_eq!(key.low(), "a");
        assert_eq!(key.high(), "b");
        assert_eq!(key.to_string(), "a-b");
    }
}
