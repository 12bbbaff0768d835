//! # Native Value Amounts
//!
//! `Wei` is an amount of the platform's native value in its smallest unit.
//! Arithmetic is checked: there is no operator overloading that could wrap
//! or saturate silently.
//!
//! Amounts serialize as decimal strings. `u128` exceeds what every JSON
//! consumer can represent as a number, and floats are never acceptable for
//! money.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SregError;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// An amount of native value, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Wei(u128);

impl Wei {
    /// Zero value.
    pub const ZERO: Wei = Wei(0);

    /// One whole ether.
    pub const ONE_ETHER: Wei = Wei(WEI_PER_ETHER);

    /// Construct from a raw wei count.
    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    /// Construct from whole ether. `None` on overflow.
    pub fn from_ether(ether: u64) -> Option<Self> {
        (ether as u128).checked_mul(WEI_PER_ETHER).map(Self)
    }

    /// The raw wei count.
    pub fn as_u128(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Wei) -> Option<Wei> {
        self.0.checked_add(other.0).map(Wei)
    }

    pub fn checked_sub(self, other: Wei) -> Option<Wei> {
        self.0.checked_sub(other.0).map(Wei)
    }

    /// Parse `"<n>"` / `"<n>wei"` as wei, or `"<n>eth"` as whole ether.
    pub fn parse(input: &str) -> Result<Self, SregError> {
        let reject = |reason: String| SregError::InvalidAmount {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let (digits, multiplier) = if let Some(n) = trimmed.strip_suffix("eth") {
            (n.trim_end(), WEI_PER_ETHER)
        } else if let Some(n) = trimmed.strip_suffix("wei") {
            (n.trim_end(), 1)
        } else {
            (trimmed, 1)
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(reject("expected a non-negative integer".to_string()));
        }
        let n: u128 = digits
            .parse()
            .map_err(|e| reject(format!("{e}")))?;
        n.checked_mul(multiplier)
            .map(Wei)
            .ok_or_else(|| reject("amount overflows 128 bits".to_string()))
    }
}

impl std::str::FromStr for Wei {
    type Err = SregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Wei {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl Serialize for Wei {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Wei {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Wei::parse(&s).map_err(serde::de::Error::custom)
    }
}
