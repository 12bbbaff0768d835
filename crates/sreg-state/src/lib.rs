//! # sreg-state — Student Registry State Machine
//!
//! A registry where students pay a fixed fee, self-register a name and age,
//! and wait for the owner to authorize them. Authorized students are kept in
//! a 1-based roster in authorization order. Collected fees stay in custody
//! until the owner transfers or withdraws them.
//!
//! ## Layers
//!
//! - [`StudentRegistry`]: the pure state machine. Callers are explicit
//!   arguments; value leaving custody goes through a [`Payout`].
//! - [`Ledger`]: a registry plus the external [`Accounts`] it pays into and
//!   collects fees from.
//! - [`SharedRegistry`]: a cloneable, lock-serialized handle over a ledger
//!   for concurrent callers.
//!
//! Every operation either commits completely or returns a
//! [`RegistryError`] and leaves state untouched.

pub mod config;
pub mod custody;
pub mod error;
pub mod event;
pub mod ledger;
pub mod registry;
pub mod shared;
pub mod student;

pub use config::{RegistryConfig, DEFAULT_MIN_AGE};
pub use custody::{Accounts, Payout, PayoutError};
pub use error::RegistryError;
pub use event::RegistryEvent;
pub use ledger::Ledger;
pub use registry::{RegistryState, StudentRegistry};
pub use shared::SharedRegistry;
pub use student::{Enrollment, EnrollmentStatus, EnrollmentTransition, Student, StudentRecord};
