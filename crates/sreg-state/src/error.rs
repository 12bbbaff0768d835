//! # Registry Error Types
//!
//! Every variant is a precondition violation detected before any mutation.
//! A returned error means the registry is exactly as it was before the call
//! and no event was emitted. Variants carry the identities and amounts an
//! operator needs to diagnose the rejection without reading logs.

use sreg_core::{Address, Wei};
use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks owner privilege.
    #[error("caller {caller} is not the registry owner")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// The zero identity was supplied as the owner.
    #[error("owner cannot be the zero address")]
    InvalidOwner,

    /// The owner attempted a payer-only action.
    #[error("owner {owner} is excluded from paying the fee")]
    OwnerExcluded {
        /// The current owner.
        owner: Address,
    },

    /// Attached value does not equal the registration fee.
    #[error("a fee of exactly {required} is required, got {supplied}")]
    FeeRequired {
        /// The configured fee.
        required: Wei,
        /// The value attached to the call.
        supplied: Wei,
    },

    /// The caller has already paid.
    #[error("{identity} has already paid the fee")]
    AlreadyPaid {
        /// The payer.
        identity: Address,
    },

    /// A dependent action was attempted before payment.
    #[error("{identity} has not paid the fee")]
    PaymentRequired {
        /// The identity without a paid record.
        identity: Address,
    },

    /// Registration with an empty name.
    #[error("student name must not be empty")]
    NameIsEmpty,

    /// Registration below the minimum age.
    #[error("age {supplied} is below the minimum age of {minimum}")]
    UnderAge {
        /// The age supplied by the caller.
        supplied: u8,
        /// The configured minimum.
        minimum: u8,
    },

    /// The record is already authorized.
    #[error("{identity} is already authorized")]
    AlreadyAuthorized {
        /// The authorized identity.
        identity: Address,
    },

    /// Authorization of a record that paid but never registered.
    #[error("{identity} has paid but has not registered a name and age")]
    NotRegistered {
        /// The unregistered identity.
        identity: Address,
    },

    /// Removal of an identity with no record.
    #[error("no student record exists for {identity}")]
    StudentNotFound {
        /// The unknown identity.
        identity: Address,
    },

    /// Position outside `1..=len` of the ordered sequence.
    #[error("student position {index} is out of range (1..={len})")]
    IndexOutOfRange {
        /// The requested 1-based position.
        index: u64,
        /// Current length of the ordered sequence.
        len: u64,
    },

    /// Custody balance too small for the requested transfer.
    #[error("insufficient custody balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount requested.
        requested: Wei,
        /// Current custody balance.
        available: Wei,
    },

    /// The payer's external balance cannot cover the attached value.
    #[error("{payer} holds {available} and cannot attach {required}")]
    InsufficientFunds {
        /// The paying identity.
        payer: Address,
        /// Value the call attaches.
        required: Wei,
        /// The payer's external balance.
        available: Wei,
    },

    /// The zero identity was used where a real principal is required.
    #[error("the zero address is not a valid {role}")]
    InvalidIdentity {
        /// Which argument was zero (e.g. "caller", "recipient").
        role: &'static str,
    },

    /// Value could not be delivered; the operation was reverted.
    #[error("transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        /// The intended recipient.
        to: Address,
        /// The amount that was not delivered.
        amount: Wei,
        /// Why delivery failed.
        reason: String,
    },

    /// Custody or an account balance would exceed the representable range.
    #[error("balance overflow")]
    BalanceOverflow,

    /// Configuration rejected at deployment.
    #[error("invalid registry configuration: {0}")]
    InvalidConfig(String),

    /// Loaded state violates a structural invariant.
    #[error("corrupt registry state: {0}")]
    CorruptState(String),
}
