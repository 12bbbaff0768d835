//! # Caller Identity
//!
//! `Address` is the 20-byte principal that identifies a caller and keys its
//! registry record. The all-zero address is reserved as the "no such record"
//! sentinel: lookups of unknown identities report it, and it can never become
//! the registry owner.
//!
//! Textual form is `0x` followed by 40 lowercase hex digits. Parsing accepts
//! either case and an optional `0x` prefix. The serde representation is the
//! textual form, so addresses can key JSON objects.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SregError;

/// Number of bytes in an address.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The zero identity. Never a valid owner or record key.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// An address with every byte set to `byte`. Handy for fixtures.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(2 + ADDRESS_LEN * 2);
        s.push_str("0x");
        for b in &self.0 {
            s.push_str(&format!("{b:02x}"));
        }
        s
    }

    /// Parse from hex, with or without the `0x` prefix.
    pub fn parse(input: &str) -> Result<Self, SregError> {
        let reject = |reason: &str| SregError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let hex = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if hex.len() != ADDRESS_LEN * 2 {
            return Err(reject(&format!(
                "expected {} hex digits, got {}",
                ADDRESS_LEN * 2,
                hex.len()
            )));
        }

        let digits = hex.as_bytes();
        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_value(digits[2 * i]).ok_or_else(|| reject("non-hex digit"))?;
            let lo = hex_value(digits[2 * i + 1]).ok_or_else(|| reject("non-hex digit"))?;
            *byte = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl std::str::FromStr for Address {
    type Err = SregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
