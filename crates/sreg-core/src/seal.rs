//! # Sealed State
//!
//! Persisted state travels inside a [`SealedState`] envelope that records the
//! SHA-256 digest of the state's canonical bytes. Unsealing recomputes the
//! digest and refuses content that no longer matches, so a hand-edited or
//! truncated state file is caught before it is used.
//!
//! Structural invariants of the state itself are the state type's concern:
//! its `Deserialize` impl runs when the envelope is parsed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::SregError;

/// A value paired with the digest of its canonical serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedState<T> {
    pub digest: ContentDigest,
    pub state: T,
}

impl<T: Serialize + DeserializeOwned> SealedState<T> {
    /// Seal a value by digesting its canonical bytes.
    pub fn seal(state: T) -> Result<Self, SregError> {
        let digest = sha256_digest(&CanonicalBytes::new(&state)?);
        Ok(Self { digest, state })
    }

    /// Verify the digest and release the value.
    ///
    /// # Errors
    ///
    /// `SregError::Integrity` when the recomputed digest differs from the
    /// recorded one.
    pub fn unseal(self) -> Result<T, SregError> {
        let actual = sha256_digest(&CanonicalBytes::new(&self.state)?);
        if actual != self.digest {
            return Err(SregError::Integrity(format!(
                "state digest mismatch: recorded {}, computed {}",
                self.digest, actual
            )));
        }
        Ok(self.state)
    }

    pub fn to_json(&self) -> Result<String, SregError> {
        serde_json::to_string_pretty(self).map_err(|e| SregError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SregError> {
        serde_json::from_str(json).map_err(|e| SregError::Serialization(e.to_string()))
    }
}
