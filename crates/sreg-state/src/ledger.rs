//! # Ledger
//!
//! A registry together with the external balances it exchanges value with.
//! Paying the fee debits the payer's account; transfers and withdrawals
//! credit the recipient through the [`Payout`](crate::Payout) seam.
//!
//! The ledger is the unit the CLI persists between invocations.

use serde::{Deserialize, Serialize};
use sreg_core::{Address, Wei};

use crate::config::RegistryConfig;
use crate::custody::Accounts;
use crate::error::RegistryError;
use crate::registry::StudentRegistry;

/// Registry plus external accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    registry: StudentRegistry,
    accounts: Accounts,
}

impl Ledger {
    pub fn deploy(owner: Address, config: RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            registry: StudentRegistry::new(owner, config)?,
            accounts: Accounts::new(),
        })
    }

    pub fn registry(&self) -> &StudentRegistry {
        &self.registry
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn balance_of(&self, account: &Address) -> Wei {
        self.accounts.balance_of(account)
    }

    /// Credit an external account out of thin air.
    pub fn fund(&mut self, account: &Address, amount: Wei) -> Result<(), RegistryError> {
        if account.is_zero() {
            return Err(RegistryError::InvalidIdentity { role: "account" });
        }
        self.accounts
            .mint(account, amount)
            .map_err(|_| RegistryError::BalanceOverflow)?;
        tracing::info!(%account, %amount, "account funded");
        Ok(())
    }

    pub fn set_rejects_value(&mut self, account: &Address, rejects: bool) {
        self.accounts.set_rejects_value(account, rejects);
    }

    /// Pay the fee from `payer`'s external balance.
    ///
    /// Registry rejections (owner, wrong fee, already paid) take precedence
    /// over `InsufficientFunds`. The debit happens only if the registry
    /// accepts the payment.
    pub fn pay_fee(&mut self, payer: &Address, value: Wei) -> Result<(), RegistryError> {
        self.registry.precheck_pay_fee(payer, value)?;
        let available = self.accounts.balance_of(payer);
        let remaining = available
            .checked_sub(value)
            .ok_or(RegistryError::InsufficientFunds {
                payer: *payer,
                required: value,
                available,
            })?;
        self.registry.pay_fee(payer, value)?;
        self.accounts.set_balance(payer, remaining);
        Ok(())
    }

    pub fn register(&mut self, caller: &Address, name: &str, age: u8) -> Result<(), RegistryError> {
        self.registry.register(caller, name, age)
    }

    pub fn authorize_student_registration(
        &mut self,
        caller: &Address,
        student: &Address,
    ) -> Result<u64, RegistryError> {
        self.registry.authorize_student_registration(caller, student)
    }

    pub fn remove_student(&mut self, caller: &Address, student: &Address) -> Result<(), RegistryError> {
        self.registry.remove_student(caller, student)
    }

    pub fn modify_owner(&mut self, caller: &Address, new_owner: Address) -> Result<(), RegistryError> {
        self.registry.modify_owner(caller, new_owner)
    }

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: Wei) -> Result<(), RegistryError> {
        self.registry.transfer(caller, to, amount, &mut self.accounts)
    }

    pub fn withdraw(&mut self, caller: &Address) -> Result<Wei, RegistryError> {
        self.registry.withdraw(caller, &mut self.accounts)
    }

    /// Total value held across custody and every external account.
    pub fn total_value(&self) -> Option<Wei> {
        self.accounts
            .iter()
            .try_fold(self.registry.custody_balance(), |acc, (_, v)| acc.checked_add(*v))
    }
}
