//! # Shared Registry Handle
//!
//! Thread-safe, cloneable handle over one [`Ledger`]. Every mutating call
//! takes the write lock for its whole duration, so concurrent callers are
//! applied one at a time in some total order and no caller observes a
//! half-applied operation. Queries take the read lock and return owned
//! snapshots.
//!
//! The lock is `parking_lot::RwLock`: non-poisoning, and never held across
//! an `.await`.

use std::sync::Arc;

use parking_lot::RwLock;
use sreg_core::{Address, Wei};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::ledger::Ledger;
use crate::student::Student;

/// Cloneable handle; clones share the same ledger.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedRegistry {
    pub fn deploy(owner: Address, config: RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self::from_ledger(Ledger::deploy(owner, config)?))
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Run `f` with exclusive access to the ledger.
    ///
    /// Use this to compose several operations that must not interleave with
    /// other callers.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Clone of the current ledger.
    pub fn snapshot(&self) -> Ledger {
        self.inner.read().clone()
    }

    // -- Mutations ------------------------------------------------------------

    pub fn fund(&self, account: &Address, amount: Wei) -> Result<(), RegistryError> {
        self.inner.write().fund(account, amount)
    }

    pub fn pay_fee(&self, payer: &Address, value: Wei) -> Result<(), RegistryError> {
        self.inner.write().pay_fee(payer, value)
    }

    pub fn register(&self, caller: &Address, name: &str, age: u8) -> Result<(), RegistryError> {
        self.inner.write().register(caller, name, age)
    }

    pub fn authorize_student_registration(
        &self,
        caller: &Address,
        student: &Address,
    ) -> Result<u64, RegistryError> {
        self.inner
            .write()
            .authorize_student_registration(caller, student)
    }

    pub fn remove_student(&self, caller: &Address, student: &Address) -> Result<(), RegistryError> {
        self.inner.write().remove_student(caller, student)
    }

    pub fn modify_owner(&self, caller: &Address, new_owner: Address) -> Result<(), RegistryError> {
        self.inner.write().modify_owner(caller, new_owner)
    }

    pub fn transfer(&self, caller: &Address, to: &Address, amount: Wei) -> Result<(), RegistryError> {
        self.inner.write().transfer(caller, to, amount)
    }

    pub fn withdraw(&self, caller: &Address) -> Result<Wei, RegistryError> {
        self.inner.write().withdraw(caller)
    }

    // -- Queries --------------------------------------------------------------

    pub fn get_owner(&self) -> Address {
        self.inner.read().registry().get_owner()
    }

    pub fn get_student(&self, index: u64) -> Result<Student, RegistryError> {
        self.inner.read().registry().get_student(index)
    }

    pub fn get_student_from_mapping(&self, identity: &Address) -> Student {
        self.inner.read().registry().get_student_from_mapping(identity)
    }

    pub fn get_all_students(&self) -> Vec<Student> {
        self.inner.read().registry().get_all_students()
    }

    pub fn student_count(&self) -> u64 {
        self.inner.read().registry().student_count()
    }

    pub fn custody_balance(&self) -> Wei {
        self.inner.read().registry().custody_balance()
    }

    pub fn balance_of(&self, account: &Address) -> Wei {
        self.inner.read().balance_of(account)
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.inner.read().registry().events().to_vec()
    }
}
