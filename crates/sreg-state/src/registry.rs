//! # Student Registry State Machine
//!
//! Holds every record, the authorization-ordered roster, the owner, and the
//! custody balance. Operations take the caller identity explicitly and either
//! commit completely or return an error with no state change.
//!
//! ## Storage
//!
//! ```text
//! students: BTreeMap<Address, StudentRecord>   (source of truth)
//! roster:   Vec<Address>                       (authorization order)
//! ```
//!
//! Invariant: `roster[i]` is the identity of the record whose enrollment is
//! `Authorized { sequence_id: i + 1 }`, and the roster length equals the
//! number of authorized records. Only authorization appends to the roster
//! and only removal takes from it, and both update the table in the same
//! call. [`StudentRegistry::verify_invariants`] checks this, and every
//! deserialization runs it.
//!
//! ## Operation shape
//!
//! Each mutating operation first runs a read-only `check_*` step that
//! validates access control and preconditions against `&self`, then applies
//! an infallible commit. The only fallible step after commit is a custody
//! payout, which restores a checkpoint on failure.
//!
//! ## Access control
//!
//! | Operation | Caller |
//! |-----------|--------|
//! | `pay_fee`, `register` | anyone except as noted |
//! | `authorize_student_registration`, `remove_student`, `modify_owner`, `transfer`, `withdraw` | owner only |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sreg_core::{Address, Timestamp, Wei};

use crate::config::RegistryConfig;
use crate::custody::Payout;
use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::student::{Enrollment, Student, StudentRecord};

// ─── Persisted Layout ────────────────────────────────────────────────

/// The persisted form of a registry.
///
/// Deserializing a [`StudentRegistry`] goes through this type and then
/// through [`StudentRegistry::verify_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub owner: Address,
    pub config: RegistryConfig,
    pub custody: Wei,
    pub students: BTreeMap<Address, StudentRecord>,
    pub roster: Vec<Address>,
    #[serde(default)]
    pub events: Vec<RegistryEvent>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// The registry state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryState", into = "RegistryState")]
pub struct StudentRegistry {
    owner: Address,
    config: RegistryConfig,
    custody: Wei,
    students: BTreeMap<Address, StudentRecord>,
    roster: Vec<Address>,
    events: Vec<RegistryEvent>,
}

/// Values restored when a payout fails.
struct Checkpoint {
    custody: Wei,
    events: usize,
}

impl StudentRegistry {
    /// Deploy an empty registry owned by `owner`.
    pub fn new(owner: Address, config: RegistryConfig) -> Result<Self, RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::InvalidOwner);
        }
        config.validate()?;
        tracing::info!(%owner, fee = %config.fee, min_age = config.min_age, "registry deployed");
        Ok(Self {
            owner,
            config,
            custody: Wei::ZERO,
            students: BTreeMap::new(),
            roster: Vec::new(),
            events: Vec::new(),
        })
    }

    // ── Fee payment ──────────────────────────────────────────────────

    /// Pay the registration fee, creating the caller's record.
    ///
    /// Checked in order: zero caller, caller is owner, value differs from
    /// the fee, caller already paid.
    pub fn pay_fee(&mut self, caller: &Address, value: Wei) -> Result<(), RegistryError> {
        let custody = logged("pay_fee", caller, self.check_pay_fee(caller, value))?;

        self.custody = custody;
        self.students
            .insert(*caller, StudentRecord::paid(*caller, Timestamp::now()));
        tracing::info!(identity = %caller, amount = %value, custody = %custody, "fee paid");
        self.emit(RegistryEvent::PaidFee {
            identity: *caller,
            amount: value,
        });
        Ok(())
    }

    /// Run the `pay_fee` checks without committing.
    pub(crate) fn precheck_pay_fee(
        &self,
        caller: &Address,
        value: Wei,
    ) -> Result<(), RegistryError> {
        logged("pay_fee", caller, self.check_pay_fee(caller, value)).map(|_| ())
    }

    fn check_pay_fee(&self, caller: &Address, value: Wei) -> Result<Wei, RegistryError> {
        if caller.is_zero() {
            return Err(RegistryError::InvalidIdentity { role: "caller" });
        }
        if *caller == self.owner {
            return Err(RegistryError::OwnerExcluded { owner: self.owner });
        }
        if value != self.config.fee {
            return Err(RegistryError::FeeRequired {
                required: self.config.fee,
                supplied: value,
            });
        }
        if self
            .students
            .get(caller)
            .is_some_and(|r| r.enrollment.has_paid())
        {
            return Err(RegistryError::AlreadyPaid { identity: *caller });
        }
        self.custody
            .checked_add(value)
            .ok_or(RegistryError::BalanceOverflow)
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Record the caller's name and age.
    ///
    /// Re-registering before authorization overwrites the previous values.
    /// Only the empty string is rejected as a name.
    pub fn register(&mut self, caller: &Address, name: &str, age: u8) -> Result<(), RegistryError> {
        logged("register", caller, self.check_register(caller, name, age))?;

        let now = Timestamp::now();
        if let Some(record) = self.students.get_mut(caller) {
            record.register(name.to_string(), age, now);
        }
        tracing::info!(identity = %caller, age, "student registered");
        self.emit(RegistryEvent::RegisterStudent {
            identity: *caller,
            name: name.to_string(),
            age,
            timestamp: now,
        });
        Ok(())
    }

    fn check_register(&self, caller: &Address, name: &str, age: u8) -> Result<(), RegistryError> {
        let record = self.paid_record(caller)?;
        if record.enrollment.is_authorized() {
            return Err(RegistryError::AlreadyAuthorized { identity: *caller });
        }
        if name.is_empty() {
            return Err(RegistryError::NameIsEmpty);
        }
        if age < self.config.min_age {
            return Err(RegistryError::UnderAge {
                supplied: age,
                minimum: self.config.min_age,
            });
        }
        Ok(())
    }

    // ── Authorization ────────────────────────────────────────────────

    /// Authorize a registered student, appending it to the roster.
    ///
    /// Returns the assigned 1-based sequence id.
    pub fn authorize_student_registration(
        &mut self,
        caller: &Address,
        student: &Address,
    ) -> Result<u64, RegistryError> {
        let sequence_id = logged("authorize", caller, self.check_authorize(caller, student))?;

        let now = Timestamp::now();
        let authorized = self
            .students
            .get_mut(student)
            .map(|r| r.authorize(sequence_id, now))
            .unwrap_or(false);
        if !authorized {
            return Err(RegistryError::CorruptState(format!(
                "record for {student} changed between check and commit"
            )));
        }
        self.roster.push(*student);

        tracing::info!(identity = %student, sequence_id, "student authorized");
        self.emit(RegistryEvent::AuthorizeStudentReg {
            identity: *student,
            timestamp: now,
        });
        Ok(sequence_id)
    }

    fn check_authorize(&self, caller: &Address, student: &Address) -> Result<u64, RegistryError> {
        self.only_owner(caller)?;
        match &self.paid_record(student)?.enrollment {
            Enrollment::Authorized { .. } => {
                Err(RegistryError::AlreadyAuthorized { identity: *student })
            }
            Enrollment::Unpaid | Enrollment::Paid => {
                Err(RegistryError::NotRegistered { identity: *student })
            }
            Enrollment::Registered { .. } => Ok(self.roster.len() as u64 + 1),
        }
    }

    // ── Removal ──────────────────────────────────────────────────────

    /// Delete a student's record.
    ///
    /// If the student was authorized, the roster is compacted and every
    /// later student moves up one position. The fee is not refunded.
    pub fn remove_student(&mut self, caller: &Address, student: &Address) -> Result<(), RegistryError> {
        logged("remove_student", caller, self.check_remove(caller, student))?;

        self.students.remove(student);
        if let Some(pos) = self.roster.iter().position(|a| a == student) {
            self.roster.remove(pos);
            for (offset, identity) in self.roster[pos..].iter().enumerate() {
                if let Some(record) = self.students.get_mut(identity) {
                    record.reposition((pos + offset) as u64 + 1);
                }
            }
        }

        tracing::info!(identity = %student, roster_len = self.roster.len(), "student removed");
        self.emit(RegistryEvent::StudentRemoved {
            identity: *student,
            timestamp: Timestamp::now(),
        });
        Ok(())
    }

    fn check_remove(&self, caller: &Address, student: &Address) -> Result<(), RegistryError> {
        self.only_owner(caller)?;
        if !self.students.contains_key(student) {
            return Err(RegistryError::StudentNotFound {
                identity: *student,
            });
        }
        Ok(())
    }

    // ── Ownership ────────────────────────────────────────────────────

    /// Hand ownership to `new_owner`. The role check precedes the zero check.
    pub fn modify_owner(&mut self, caller: &Address, new_owner: Address) -> Result<(), RegistryError> {
        logged("modify_owner", caller, self.check_modify_owner(caller, &new_owner))?;

        let previous = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(%previous, new = %new_owner, "ownership transferred");
        self.emit(RegistryEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }

    fn check_modify_owner(&self, caller: &Address, new_owner: &Address) -> Result<(), RegistryError> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidOwner);
        }
        Ok(())
    }

    // ── Custody ──────────────────────────────────────────────────────

    /// Send `amount` of custody to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Wei,
        payout: &mut impl Payout,
    ) -> Result<(), RegistryError> {
        let remaining = logged("transfer", caller, self.check_transfer(caller, to, amount))?;
        self.disburse(
            *to,
            amount,
            remaining,
            RegistryEvent::FundsTransferred { to: *to, amount },
            payout,
        )
    }

    fn check_transfer(&self, caller: &Address, to: &Address, amount: Wei) -> Result<Wei, RegistryError> {
        self.only_owner(caller)?;
        if to.is_zero() {
            return Err(RegistryError::InvalidIdentity { role: "recipient" });
        }
        self.custody
            .checked_sub(amount)
            .ok_or(RegistryError::InsufficientBalance {
                requested: amount,
                available: self.custody,
            })
    }

    /// Send the whole custody balance to the owner.
    ///
    /// With an empty custody balance this is a no-op: it returns
    /// `Wei::ZERO`, calls no payout, and emits nothing.
    pub fn withdraw(&mut self, caller: &Address, payout: &mut impl Payout) -> Result<Wei, RegistryError> {
        logged("withdraw", caller, self.only_owner(caller))?;

        let amount = self.custody;
        if amount.is_zero() {
            tracing::debug!(owner = %caller, "withdraw with empty custody");
            return Ok(Wei::ZERO);
        }
        let to = self.owner;
        self.disburse(
            to,
            amount,
            Wei::ZERO,
            RegistryEvent::FundsWithdrawn { to, amount },
            payout,
        )?;
        Ok(amount)
    }

    /// Debit custody, stage the event, then move value out.
    ///
    /// Nothing on `self` is read after `pay` is called. A failed payout
    /// restores the checkpoint taken before the debit.
    fn disburse(
        &mut self,
        to: Address,
        amount: Wei,
        remaining: Wei,
        event: RegistryEvent,
        payout: &mut impl Payout,
    ) -> Result<(), RegistryError> {
        let checkpoint = self.checkpoint();
        self.custody = remaining;
        self.emit(event);

        if let Err(err) = payout.pay(&to, amount) {
            self.revert(checkpoint);
            tracing::warn!(%to, %amount, error = %err, "payout failed; custody debit reverted");
            return Err(RegistryError::TransferFailed {
                to,
                amount,
                reason: err.to_string(),
            });
        }
        tracing::info!(%to, %amount, custody = %remaining, "custody disbursed");
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            custody: self.custody,
            events: self.events.len(),
        }
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        self.custody = checkpoint.custody;
        self.events.truncate(checkpoint.events);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get_owner(&self) -> Address {
        self.owner
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The exact value `pay_fee` accepts.
    pub fn fee(&self) -> Wei {
        self.config.fee
    }

    pub fn min_age(&self) -> u8 {
        self.config.min_age
    }

    pub fn custody_balance(&self) -> Wei {
        self.custody
    }

    /// Number of authorized students (the roster length).
    pub fn student_count(&self) -> u64 {
        self.roster.len() as u64
    }

    /// The authorized student at 1-based `index`.
    pub fn get_student(&self, index: u64) -> Result<Student, RegistryError> {
        let len = self.student_count();
        if index == 0 || index > len {
            return Err(RegistryError::IndexOutOfRange { index, len });
        }
        let identity = &self.roster[(index - 1) as usize];
        self.students
            .get(identity)
            .map(StudentRecord::view)
            .ok_or_else(|| {
                RegistryError::CorruptState(format!("roster entry {identity} has no record"))
            })
    }

    /// The view for `identity`, or the zero view if it has no record.
    pub fn get_student_from_mapping(&self, identity: &Address) -> Student {
        self.students
            .get(identity)
            .map(StudentRecord::view)
            .unwrap_or_default()
    }

    /// Every authorized student in roster order.
    pub fn get_all_students(&self) -> Vec<Student> {
        self.roster
            .iter()
            .filter_map(|a| self.students.get(a))
            .map(StudentRecord::view)
            .collect()
    }

    /// The full record, including its transition log.
    pub fn record(&self, identity: &Address) -> Option<&StudentRecord> {
        self.students.get(identity)
    }

    /// Committed events, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    // ── Invariants ───────────────────────────────────────────────────

    /// Check the structural invariants of the table and roster.
    pub fn verify_invariants(&self) -> Result<(), RegistryError> {
        if self.owner.is_zero() {
            return Err(corrupt("owner is the zero address".to_string()));
        }
        self.config.validate()?;

        for (key, record) in &self.students {
            if key.is_zero() {
                return Err(corrupt("a record is keyed by the zero address".to_string()));
            }
            if record.identity != *key {
                return Err(corrupt(format!(
                    "record keyed by {key} belongs to {}",
                    record.identity
                )));
            }
            if !record.enrollment.has_paid() {
                return Err(corrupt(format!("record for {key} is stored unpaid")));
            }
        }

        for (pos, identity) in self.roster.iter().enumerate() {
            let position = pos as u64 + 1;
            match self
                .students
                .get(identity)
                .and_then(|r| r.enrollment.sequence_id())
            {
                Some(seq) if seq == position => {}
                Some(seq) => {
                    return Err(corrupt(format!(
                        "{identity} at roster position {position} carries sequence id {seq}"
                    )))
                }
                None => {
                    return Err(corrupt(format!(
                        "roster position {position} holds {identity}, which is not authorized"
                    )))
                }
            }
        }

        let authorized = self
            .students
            .values()
            .filter(|r| r.enrollment.is_authorized())
            .count();
        if authorized != self.roster.len() {
            return Err(corrupt(format!(
                "{authorized} authorized records but roster length {}",
                self.roster.len()
            )));
        }
        Ok(())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn only_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        if *caller != self.owner {
            return Err(RegistryError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn paid_record(&self, identity: &Address) -> Result<&StudentRecord, RegistryError> {
        self.students
            .get(identity)
            .filter(|r| r.enrollment.has_paid())
            .ok_or(RegistryError::PaymentRequired {
                identity: *identity,
            })
    }

    fn emit(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }
}

fn corrupt(reason: String) -> RegistryError {
    RegistryError::CorruptState(reason)
}

fn logged<T>(
    op: &'static str,
    caller: &Address,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        tracing::debug!(op, %caller, error = %err, "registry operation rejected");
    }
    result
}

impl TryFrom<RegistryState> for StudentRegistry {
    type Error = RegistryError;

    fn try_from(state: RegistryState) -> Result<Self, Self::Error> {
        let registry = Self {
            owner: state.owner,
            config: state.config,
            custody: state.custody,
            students: state.students,
            roster: state.roster,
            events: state.events,
        };
        registry.verify_invariants()?;
        Ok(registry)
    }
}

impl From<StudentRegistry> for RegistryState {
    fn from(registry: StudentRegistry) -> Self {
        Self {
            owner: registry.owner,
            config: registry.config,
            custody: registry.custody,
            students: registry.students,
            roster: registry.roster,
            events: registry.events,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
