//! # sreg-core — Foundational Types for the Student Registry
//!
//! Defines the primitives every other crate in the workspace builds on.
//! `sreg-core` depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for domain primitives.** `Address` (caller identity) and
//!    `Wei` (native value) are distinct types with validated parsers. No bare
//!    strings or integers cross crate boundaries for identities or amounts.
//!
//! 2. **The zero identity is a sentinel.** `Address::ZERO` means "no such
//!    record" and is never a valid owner.
//!
//! 3. **Checked arithmetic only.** `Wei` exposes `checked_add`/`checked_sub`;
//!    there is no `Add` impl that could silently wrap.
//!
//! 4. **`CanonicalBytes` for digests.** Persisted state is sealed with a
//!    SHA-256 digest computed only over RFC 8785 canonical bytes.
//!
//! 5. **UTC-only timestamps** truncated to seconds.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod amount;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod seal;
pub mod temporal;

pub use address::Address;
pub use amount::{Wei, WEI_PER_ETHER};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, SregError};
pub use seal::SealedState;
pub use temporal::Timestamp;
