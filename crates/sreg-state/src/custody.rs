//! # Fee Custody
//!
//! Value leaves registry custody only through the [`Payout`] seam. A payout
//! may fail (the recipient refuses value, or its balance would overflow);
//! the registry treats any failure as a full revert of the calling operation.
//!
//! [`Accounts`] is the in-memory book of external balances used by the
//! [`Ledger`](crate::Ledger). It can mark identities as value-rejecting,
//! which models recipients with no way to accept a transfer.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sreg_core::{Address, Wei};
use thiserror::Error;

/// Why a payout could not be delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("recipient {0} does not accept value")]
    Rejected(Address),

    #[error("balance of {0} would overflow")]
    Overflow(Address),
}

/// Delivers value out of registry custody.
///
/// Implementations must be all-or-nothing: on `Err`, no value has moved.
pub trait Payout {
    fn pay(&mut self, to: &Address, amount: Wei) -> Result<(), PayoutError>;
}

/// External account balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accounts {
    balances: BTreeMap<Address, Wei>,
    #[serde(default)]
    rejecting: BTreeSet<Address>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`; zero for unknown accounts.
    pub fn balance_of(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(Wei::ZERO)
    }

    /// Create value in `account`, ignoring its rejection flag.
    pub fn mint(&mut self, account: &Address, amount: Wei) -> Result<(), PayoutError> {
        let updated = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(PayoutError::Overflow(*account))?;
        self.balances.insert(*account, updated);
        Ok(())
    }

    /// Overwrite the balance of `account`.
    pub(crate) fn set_balance(&mut self, account: &Address, amount: Wei) {
        if amount.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, amount);
        }
    }

    /// Mark `account` as refusing (or accepting again) incoming payouts.
    pub fn set_rejects_value(&mut self, account: &Address, rejects: bool) {
        if rejects {
            self.rejecting.insert(*account);
        } else {
            self.rejecting.remove(account);
        }
    }

    pub fn rejects_value(&self, account: &Address) -> bool {
        self.rejecting.contains(account)
    }

    /// Non-zero balances in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Wei)> {
        self.balances.iter()
    }
}

impl Payout for Accounts {
    fn pay(&mut self, to: &Address, amount: Wei) -> Result<(), PayoutError> {
        if self.rejects_value(to) {
            return Err(PayoutError::Rejected(*to));
        }
        self.mint(to, amount)
    }
}
