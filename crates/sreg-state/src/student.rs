//! # Student Enrollment Lifecycle
//!
//! Each identity's record moves through a one-way lifecycle:
//!
//! ```text
//! Unpaid ──pay_fee──▶ Paid ──register──▶ Registered ──authorize──▶ Authorized
//!                                          │    ▲
//!                                          └────┘ (re-register overwrites)
//! ```
//!
//! ## Design Decision
//!
//! The lifecycle is a tagged enum rather than independent `has_paid` /
//! `is_authorized` flags. Name, age, and sequence id live inside the variants
//! that own them, so "authorized but unpaid" or "sequence id without
//! authorization" cannot be constructed. The flat [`Student`] view exists for
//! callers that expect the six-field record shape.
//!
//! Transitions are only performed by the registry, which checks access
//! control and preconditions first. The methods here assume the caller has
//! already validated the move.

use serde::{Deserialize, Serialize};
use sreg_core::{Address, Timestamp};

// ─── Enrollment ──────────────────────────────────────────────────────

/// Lifecycle state of a record, carrying the data each stage owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Enrollment {
    /// No fee received. Never stored: records are created `Paid`, and a
    /// persisted `Unpaid` record is refused as corrupt. The lifecycle before
    /// payment survives only as [`EnrollmentStatus::Unpaid`], the `from` tag
    /// of the first transition.
    Unpaid,
    /// Fee received; awaiting name and age.
    Paid,
    /// Name and age supplied; awaiting owner authorization.
    Registered { name: String, age: u8 },
    /// Authorized by the owner at 1-based position `sequence_id`.
    Authorized {
        name: String,
        age: u8,
        sequence_id: u64,
    },
}

impl Enrollment {
    pub fn status(&self) -> EnrollmentStatus {
        match self {
            Self::Unpaid => EnrollmentStatus::Unpaid,
            Self::Paid => EnrollmentStatus::Paid,
            Self::Registered { .. } => EnrollmentStatus::Registered,
            Self::Authorized { .. } => EnrollmentStatus::Authorized,
        }
    }

    pub fn has_paid(&self) -> bool {
        !matches!(self, Self::Unpaid)
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized { .. })
    }

    /// The sequence id, if authorized.
    pub fn sequence_id(&self) -> Option<u64> {
        match self {
            Self::Authorized { sequence_id, .. } => Some(*sequence_id),
            _ => None,
        }
    }
}

/// Data-free lifecycle tag used in transition logs and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Unpaid,
    Paid,
    Registered,
    Authorized,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "UNPAID",
            Self::Paid => "PAID",
            Self::Registered => "REGISTERED",
            Self::Authorized => "AUTHORIZED",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Transition Log ──────────────────────────────────────────────────

/// Record of one lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentTransition {
    pub from: EnrollmentStatus,
    pub to: EnrollmentStatus,
    pub timestamp: Timestamp,
}

// ─── Record ──────────────────────────────────────────────────────────

/// The authoritative record for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// The identity this record belongs to. Always equals its table key.
    pub identity: Address,
    /// Current lifecycle state.
    pub enrollment: Enrollment,
    /// When the fee was received.
    pub paid_at: Timestamp,
    /// Ordered log of lifecycle transitions.
    pub transitions: Vec<EnrollmentTransition>,
}

impl StudentRecord {
    /// A freshly paid record (Unpaid → Paid).
    pub(crate) fn paid(identity: Address, now: Timestamp) -> Self {
        Self {
            identity,
            enrollment: Enrollment::Paid,
            paid_at: now,
            transitions: vec![EnrollmentTransition {
                from: EnrollmentStatus::Unpaid,
                to: EnrollmentStatus::Paid,
                timestamp: now,
            }],
        }
    }

    /// Paid/Registered → Registered.
    pub(crate) fn register(&mut self, name: String, age: u8, now: Timestamp) {
        self.do_transition(Enrollment::Registered { name, age }, now);
    }

    /// Registered → Authorized at `sequence_id`.
    ///
    /// Returns `false` and leaves the record untouched if it is not in the
    /// Registered state.
    pub(crate) fn authorize(&mut self, sequence_id: u64, now: Timestamp) -> bool {
        let (name, age) = match &self.enrollment {
            Enrollment::Registered { name, age } => (name.clone(), *age),
            _ => return false,
        };
        self.do_transition(
            Enrollment::Authorized {
                name,
                age,
                sequence_id,
            },
            now,
        );
        true
    }

    /// Move an authorized record to a new position after compaction.
    /// Not a lifecycle transition, so nothing is logged.
    pub(crate) fn reposition(&mut self, new_sequence_id: u64) {
        if let Enrollment::Authorized { sequence_id, .. } = &mut self.enrollment {
            *sequence_id = new_sequence_id;
        }
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.enrollment.status()
    }

    /// Flat view of this record.
    pub fn view(&self) -> Student {
        let (name, age, sequence_id) = match &self.enrollment {
            Enrollment::Unpaid | Enrollment::Paid => (String::new(), 0, 0),
            Enrollment::Registered { name, age } => (name.clone(), *age, 0),
            Enrollment::Authorized {
                name,
                age,
                sequence_id,
            } => (name.clone(), *age, *sequence_id),
        };
        Student {
            identity: self.identity,
            name,
            sequence_id,
            age,
            has_paid: self.enrollment.has_paid(),
            is_authorized: self.enrollment.is_authorized(),
        }
    }

    fn do_transition(&mut self, to: Enrollment, now: Timestamp) {
        self.transitions.push(EnrollmentTransition {
            from: self.enrollment.status(),
            to: to.status(),
            timestamp: now,
        });
        self.enrollment = to;
    }
}

// ─── Flat View ───────────────────────────────────────────────────────

/// Six-field view of a record, as returned by queries.
///
/// `Student::default()` is the zero view reported for unknown identities:
/// zero identity, empty name, zero sequence id and age, both flags false.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Student {
    pub identity: Address,
    pub name: String,
    pub sequence_id: u64,
    pub age: u8,
    pub has_paid: bool,
    pub is_authorized: bool,
}
