//! # Registry Lifecycle Scenarios
//!
//! End-to-end flows through `StudentRegistry` and `Ledger`: the happy path,
//! rejected registrations, custody withdrawal, ownership handover, and the
//! owner-only access matrix.

use sreg_core::{Address, Wei};
use sreg_state::{
    Ledger, RegistryConfig, RegistryError, RegistryEvent, Student, StudentRegistry,
};

const OWNER: Address = Address::repeat_byte(0x01);
const ADA: Address = Address::repeat_byte(0xa1);
const BOB: Address = Address::repeat_byte(0xb0);
const CAL: Address = Address::repeat_byte(0xc4);
const EVE: Address = Address::repeat_byte(0xee);

fn ledger() -> Ledger {
    let mut ledger = Ledger::deploy(OWNER, RegistryConfig::default()).unwrap();
    for account in [ADA, BOB, CAL, EVE] {
        ledger
            .fund(&account, Wei::new(10 * Wei::ONE_ETHER.as_u128()))
            .unwrap();
    }
    ledger
}

fn enroll(ledger: &mut Ledger, who: Address, name: &str, age: u8) -> u64 {
    ledger.pay_fee(&who, Wei::ONE_ETHER).unwrap();
    ledger.register(&who, name, age).unwrap();
    ledger.authorize_student_registration(&OWNER, &who).unwrap()
}

// =========================================================================
// Scenario A: pay, register, authorize
// =========================================================================

#[test]
fn happy_path_assigns_first_position() {
    let mut l = ledger();

    l.pay_fee(&ADA, Wei::ONE_ETHER).unwrap();
    l.register(&ADA, "Ada", 19).unwrap();
    let seq = l.authorize_student_registration(&OWNER, &ADA).unwrap();
    assert_eq!(seq, 1);

    let r = l.registry();
    assert_eq!(r.student_count(), 1);
    assert_eq!(
        r.get_student(1).unwrap(),
        Student {
            identity: ADA,
            name: "Ada".to_string(),
            sequence_id: 1,
            age: 19,
            has_paid: true,
            is_authorized: true,
        }
    );
    assert_eq!(r.get_student_from_mapping(&ADA), r.get_student(1).unwrap());

    let names: Vec<_> = r.events().iter().map(RegistryEvent::name).collect();
    assert_eq!(names, vec!["PaidFee", "RegisterStudent", "AuthorizeStudentReg"]);
    assert_eq!(
        r.events()[0],
        RegistryEvent::PaidFee {
            identity: ADA,
            amount: Wei::ONE_ETHER
        }
    );
}

#[test]
fn roster_preserves_authorization_order_not_payment_order() {
    let mut l = ledger();
    for who in [ADA, BOB, CAL] {
        l.pay_fee(&who, Wei::ONE_ETHER).unwrap();
        l.register(&who, "x", 18).unwrap();
    }
    for who in [CAL, ADA, BOB] {
        l.authorize_student_registration(&OWNER, &who).unwrap();
    }

    let order: Vec<_> = l
        .registry()
        .get_all_students()
        .into_iter()
        .map(|s| (s.sequence_id, s.identity))
        .collect();
    assert_eq!(order, vec![(1, CAL), (2, ADA), (3, BOB)]);
}

#[test]
fn record_keeps_transition_history() {
    let mut l = ledger();
    enroll(&mut l, ADA, "Ada", 19);
    let record = l.registry().record(&ADA).unwrap();
    let statuses: Vec<_> = record.transitions.iter().map(|t| t.to.as_str()).collect();
    assert_eq!(statuses, vec!["PAID", "REGISTERED", "AUTHORIZED"]);
}

// =========================================================================
// Scenario B: under-age registration
// =========================================================================

#[test]
fn under_age_registration_changes_nothing() {
    let mut l = ledger();
    l.pay_fee(&BOB, Wei::ONE_ETHER).unwrap();
    let before = l.clone();

    assert_eq!(
        l.register(&BOB, "Bob", 17),
        Err(RegistryError::UnderAge {
            supplied: 17,
            minimum: 18
        })
    );
    assert_eq!(l, before);
    assert_eq!(l.registry().events().len(), 1);
}

#[test]
fn eighteen_is_old_enough() {
    let mut l = ledger();
    l.pay_fee(&BOB, Wei::ONE_ETHER).unwrap();
    assert!(l.register(&BOB, "Bob", 18).is_ok());
}

#[test]
fn registration_checks_payment_before_arguments() {
    let mut l = ledger();
    assert_eq!(
        l.register(&BOB, "", 3),
        Err(RegistryError::PaymentRequired { identity: BOB })
    );
}

#[test]
fn authorizing_unpaid_identity_requires_payment() {
    let mut l = ledger();
    assert_eq!(
        l.authorize_student_registration(&OWNER, &CAL),
        Err(RegistryError::PaymentRequired { identity: CAL })
    );
}

// =========================================================================
// Scenario C: withdraw
// =========================================================================

#[test]
fn withdraw_moves_custody_to_owner_once() {
    let mut l = ledger();
    for who in [ADA, BOB, CAL] {
        l.pay_fee(&who, Wei::ONE_ETHER).unwrap();
    }
    let v = l.registry().custody_balance();
    assert_eq!(v, Wei::new(3 * Wei::ONE_ETHER.as_u128()));

    assert_eq!(l.withdraw(&OWNER), Ok(v));
    assert_eq!(l.balance_of(&OWNER), v);
    assert_eq!(l.registry().custody_balance(), Wei::ZERO);

    let events_after_first = l.registry().events().len();
    assert_eq!(l.withdraw(&OWNER), Ok(Wei::ZERO));
    assert_eq!(l.balance_of(&OWNER), v);
    assert_eq!(l.registry().events().len(), events_after_first);
}

// =========================================================================
// Scenario D: ownership handover
// =========================================================================

#[test]
fn zero_owner_rejected_after_role_check() {
    let mut l = ledger();
    assert_eq!(
        l.modify_owner(&EVE, Address::ZERO),
        Err(RegistryError::Unauthorized { caller: EVE })
    );
    assert_eq!(
        l.modify_owner(&OWNER, Address::ZERO),
        Err(RegistryError::InvalidOwner)
    );
    assert_eq!(l.registry().get_owner(), OWNER);
}

#[test]
fn new_owner_inherits_every_privilege() {
    let mut l = ledger();
    l.pay_fee(&ADA, Wei::ONE_ETHER).unwrap();
    l.register(&ADA, "Ada", 19).unwrap();
    l.modify_owner(&OWNER, EVE).unwrap();

    assert!(matches!(
        l.authorize_student_registration(&OWNER, &ADA),
        Err(RegistryError::Unauthorized { .. })
    ));
    assert_eq!(l.authorize_student_registration(&EVE, &ADA), Ok(1));

    // The new owner can no longer pay; the old one now can.
    assert!(matches!(
        l.pay_fee(&EVE, Wei::ONE_ETHER),
        Err(RegistryError::OwnerExcluded { .. })
    ));
    l.fund(&OWNER, Wei::ONE_ETHER).unwrap();
    assert!(l.pay_fee(&OWNER, Wei::ONE_ETHER).is_ok());

    assert_eq!(l.withdraw(&EVE), Ok(Wei::new(2 * Wei::ONE_ETHER.as_u128())));
}

// =========================================================================
// Access control matrix
// =========================================================================

#[test]
fn owner_gated_operations_reject_everyone_else() {
    let mut l = ledger();
    enroll(&mut l, ADA, "Ada", 19);
    l.pay_fee(&BOB, Wei::ONE_ETHER).unwrap();
    l.register(&BOB, "Bob", 20).unwrap();

    for caller in [ADA, BOB, CAL, EVE] {
        let before = l.clone();
        let unauthorized = Err(RegistryError::Unauthorized { caller });

        assert_eq!(l.authorize_student_registration(&caller, &BOB), unauthorized.clone().map(|()| 0));
        assert_eq!(l.remove_student(&caller, &ADA), unauthorized.clone());
        assert_eq!(l.modify_owner(&caller, caller), unauthorized.clone());
        assert_eq!(l.transfer(&caller, &caller, Wei::new(1)), unauthorized.clone());
        assert_eq!(l.withdraw(&caller), unauthorized.clone().map(|()| Wei::ZERO));

        assert_eq!(l, before);
    }
}

// =========================================================================
// Removal and compaction
// =========================================================================

#[test]
fn removal_compacts_and_reopens_the_gates() {
    let mut l = ledger();
    enroll(&mut l, ADA, "Ada", 19);
    enroll(&mut l, BOB, "Bob", 20);
    enroll(&mut l, CAL, "Cal", 21);

    l.remove_student(&OWNER, &BOB).unwrap();
    let r = l.registry();
    assert_eq!(r.student_count(), 2);
    assert_eq!(r.get_student(2).unwrap().identity, CAL);
    assert_eq!(r.get_student(2).unwrap().sequence_id, 2);
    assert_eq!(r.get_student_from_mapping(&BOB), Student::default());
    assert!(r.verify_invariants().is_ok());

    // Bob starts over and lands at the end of the roster.
    assert_eq!(enroll(&mut l, BOB, "Bob", 20), 3);
    // Fees are not refunded: four payments are in custody.
    assert_eq!(
        l.registry().custody_balance(),
        Wei::new(4 * Wei::ONE_ETHER.as_u128())
    );
}

#[test]
fn removing_unauthorized_record_leaves_roster_alone() {
    let mut l = ledger();
    enroll(&mut l, ADA, "Ada", 19);
    l.pay_fee(&BOB, Wei::ONE_ETHER).unwrap();

    l.remove_student(&OWNER, &BOB).unwrap();
    assert_eq!(l.registry().student_count(), 1);
    assert_eq!(l.registry().get_student(1).unwrap().sequence_id, 1);
}

// =========================================================================
// Deployment parameters
// =========================================================================

#[test]
fn custom_fee_must_be_matched_exactly() {
    let config = RegistryConfig {
        fee: Wei::new(250),
        min_age: 16,
    };
    let mut r = StudentRegistry::new(OWNER, config).unwrap();
    assert!(matches!(
        r.pay_fee(&ADA, Wei::ONE_ETHER),
        Err(RegistryError::FeeRequired { .. })
    ));
    r.pay_fee(&ADA, Wei::new(250)).unwrap();
    assert!(r.register(&ADA, "Ada", 16).is_ok());
}

#[test]
fn zero_fee_deployment_rejected() {
    let config = RegistryConfig {
        fee: Wei::ZERO,
        min_age: 18,
    };
    assert!(matches!(
        StudentRegistry::new(OWNER, config),
        Err(RegistryError::InvalidConfig(_))
    ));
}
