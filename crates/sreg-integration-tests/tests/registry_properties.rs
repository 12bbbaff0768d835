//! # Registry Property Tests
//!
//! Random operation sequences against a funded `Ledger`. After every step:
//!
//! - a rejected operation leaves the ledger exactly as it was,
//! - `has_paid` and `is_authorized` only flip from false to true on success,
//! - the roster agrees with the table (`verify_invariants`),
//! - total value across custody and accounts is conserved.

use proptest::prelude::*;
use sreg_core::{Address, Wei};
use sreg_state::{Ledger, RegistryConfig, RegistryError};

const OWNER: Address = Address::repeat_byte(0x01);
const RECIPIENT: Address = Address::repeat_byte(0x7e);
const STUDENTS: usize = 5;

fn student(i: usize) -> Address {
    Address::repeat_byte(0x10 + i as u8)
}

#[derive(Debug, Clone)]
enum Op {
    PayFee { student: usize, exact: bool },
    Register { student: usize, empty_name: bool, age: u8 },
    Authorize { by_owner: bool, student: usize },
    Remove { student: usize },
    Transfer { amount: u128 },
    Withdraw,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..STUDENTS, any::<bool>())
            .prop_map(|(student, exact)| Op::PayFee { student, exact }),
        3 => (0..STUDENTS, any::<bool>(), 10u8..30)
            .prop_map(|(student, empty_name, age)| Op::Register { student, empty_name, age }),
        3 => (any::<bool>(), 0..STUDENTS)
            .prop_map(|(by_owner, student)| Op::Authorize { by_owner, student }),
        1 => (0..STUDENTS).prop_map(|student| Op::Remove { student }),
        1 => (0u128..3 * Wei::ONE_ETHER.as_u128()).prop_map(|amount| Op::Transfer { amount }),
        1 => Just(Op::Withdraw),
    ]
}

fn funded_ledger() -> Ledger {
    let mut l = Ledger::deploy(OWNER, RegistryConfig::default()).unwrap();
    for i in 0..STUDENTS {
        l.fund(&student(i), Wei::new(100 * Wei::ONE_ETHER.as_u128()))
            .unwrap();
    }
    l
}

fn apply(l: &mut Ledger, op: &Op) -> Result<(), RegistryError> {
    match *op {
        Op::PayFee { student: i, exact } => {
            let value = if exact { Wei::ONE_ETHER } else { Wei::new(1) };
            l.pay_fee(&student(i), value)
        }
        Op::Register {
            student: i,
            empty_name,
            age,
        } => {
            let name = if empty_name { "" } else { "student" };
            l.register(&student(i), name, age)
        }
        Op::Authorize { by_owner, student: i } => {
            let caller = if by_owner { OWNER } else { student(i) };
            l.authorize_student_registration(&caller, &student(i))
                .map(|_| ())
        }
        Op::Remove { student: i } => l.remove_student(&OWNER, &student(i)),
        Op::Transfer { amount } => l.transfer(&OWNER, &RECIPIENT, Wei::new(amount)),
        Op::Withdraw => l.withdraw(&OWNER).map(|_| ()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_sequences_preserve_invariants(ops in prop::collection::vec(op(), 1..60)) {
        let mut ledger = funded_ledger();
        let total = ledger.total_value();

        for op in &ops {
            let before = ledger.clone();
            let result = apply(&mut ledger, op);

            match (&result, op) {
                (Err(_), _) => prop_assert_eq!(&ledger, &before),
                (Ok(()), Op::PayFee { student: i, .. }) => {
                    prop_assert!(!before.registry().get_student_from_mapping(&student(*i)).has_paid);
                    prop_assert!(ledger.registry().get_student_from_mapping(&student(*i)).has_paid);
                }
                (Ok(()), Op::Authorize { student: i, .. }) => {
                    let prev = before.registry().get_student_from_mapping(&student(*i));
                    let now = ledger.registry().get_student_from_mapping(&student(*i));
                    prop_assert!(!prev.is_authorized);
                    prop_assert!(now.is_authorized);
                    prop_assert_eq!(now.sequence_id, before.registry().student_count() + 1);
                }
                (Ok(()), _) => {}
            }

            prop_assert!(ledger.registry().verify_invariants().is_ok());
            prop_assert_eq!(ledger.total_value(), total);

            let authorized = (0..STUDENTS)
                .filter(|i| ledger.registry().get_student_from_mapping(&student(*i)).is_authorized)
                .count() as u64;
            prop_assert_eq!(authorized, ledger.registry().student_count());
            for (pos, s) in ledger.registry().get_all_students().iter().enumerate() {
                prop_assert_eq!(s.sequence_id, pos as u64 + 1);
            }
        }
    }

    #[test]
    fn only_exact_fee_is_accepted(value in 0u128..4 * Wei::ONE_ETHER.as_u128()) {
        let mut ledger = funded_ledger();
        let result = ledger.pay_fee(&student(0), Wei::new(value));
        prop_assert_eq!(result.is_ok(), value == Wei::ONE_ETHER.as_u128());
    }

    #[test]
    fn age_gate_matches_minimum(age in any::<u8>()) {
        let mut ledger = funded_ledger();
        ledger.pay_fee(&student(0), Wei::ONE_ETHER).unwrap();
        let result = ledger.register(&student(0), "student", age);
        prop_assert_eq!(result.is_ok(), age >= 18);
    }
}
