//! # Registry Events
//!
//! Events are appended to the registry's log only when an operation commits.
//! A rejected operation never leaves a partial event behind; a reverted
//! custody transfer removes the event it staged.

use serde::{Deserialize, Serialize};
use sreg_core::{Address, Timestamp, Wei};

/// A notification emitted by a committed registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    /// A fee was paid.
    PaidFee { identity: Address, amount: Wei },
    /// A student registered (or re-registered) a name and age.
    RegisterStudent {
        identity: Address,
        name: String,
        age: u8,
        timestamp: Timestamp,
    },
    /// The owner authorized a registration.
    AuthorizeStudentReg {
        identity: Address,
        timestamp: Timestamp,
    },
    /// Ownership moved to a new identity.
    OwnershipTransferred { previous: Address, new: Address },
    /// The owner removed a student record.
    StudentRemoved {
        identity: Address,
        timestamp: Timestamp,
    },
    /// Custody value sent to an arbitrary recipient.
    FundsTransferred { to: Address, amount: Wei },
    /// The whole custody balance sent to the owner.
    FundsWithdrawn { to: Address, amount: Wei },
}

impl RegistryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaidFee { .. } => "PaidFee",
            Self::RegisterStudent { .. } => "RegisterStudent",
            Self::AuthorizeStudentReg { .. } => "AuthorizeStudentReg",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
            Self::StudentRemoved { .. } => "StudentRemoved",
            Self::FundsTransferred { .. } => "FundsTransferred",
            Self::FundsWithdrawn { .. } => "FundsWithdrawn",
        }
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaidFee { identity, amount } => write!(f, "PaidFee({identity}, {amount})"),
            Self::RegisterStudent {
                identity,
                name,
                age,
                timestamp,
            } => write!(f, "RegisterStudent({identity}, {name:?}, {age}, {timestamp})"),
            Self::AuthorizeStudentReg {
                identity,
                timestamp,
            } => write!(f, "AuthorizeStudentReg({identity}, {timestamp})"),
            Self::OwnershipTransferred { previous, new } => {
                write!(f, "OwnershipTransferred({previous} -> {new})")
            }
            Self::StudentRemoved {
                identity,
                timestamp,
            } => write!(f, "StudentRemoved({identity}, {timestamp})"),
            Self::FundsTransferred { to, amount } => write!(f, "FundsTransferred({to}, {amount})"),
            Self::FundsWithdrawn { to, amount } => write!(f, "FundsWithdrawn({to}, {amount})"),
        }
    }
}
