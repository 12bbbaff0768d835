//! # Registry Configuration
//!
//! Deployment-time parameters. They are fixed for the life of a registry and
//! persisted with its state.

use serde::{Deserialize, Serialize};
use sreg_core::Wei;

use crate::error::RegistryError;

/// Default minimum registration age.
pub const DEFAULT_MIN_AGE: u8 = 18;

/// Parameters fixed at deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// The exact value `pay_fee` must attach.
    pub fee: Wei,
    /// Minimum age accepted by `register`.
    pub min_age: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fee: Wei::ONE_ETHER,
            min_age: DEFAULT_MIN_AGE,
        }
    }
}

impl RegistryConfig {
    /// Reject configurations that would open the payment gate for free.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.fee.is_zero() {
            return Err(RegistryError::InvalidConfig(
                "fee must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
