//! Circuit Shape Tests
//!
//! Checks for the construction-time contract:
//! 1. Malformed shape parameters are rejected with a typed error before
//!    any constraint is emitted
//! 2. Constraint topology depends only on shape parameters, never on the
//!    assignment values

use zktls_circuits::evaluate::demo_session;
use zktls_circuits::{CircuitError, RecordVerify, WitnessBuilder};

#[test]
fn length_mismatch_is_rejected() {
    let session = demo_session().unwrap();
    let mut plaintext = session.plaintext;
    plaintext.truncate(16);
    let circuit = RecordVerify {
        key: session.key,
        plaintext,
        statement: session.statement,
    };
    let mut api = WitnessBuilder::new();
    match circuit.define(&mut api) {
        Err(CircuitError::LengthMismatch { expected, actual }) => {
            assert_eq!(expected, 32);
            assert_eq!(actual, 16);
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
}

#[test]
fn unaligned_record_is_rejected() {
    let session = demo_session().unwrap();
    let mut statement = session.statement;
    let mut plaintext = session.plaintext;
    plaintext.truncate(24);
    statement.ciphertext.truncate(24);
    let circuit = RecordVerify {
        key: session.key,
        plaintext,
        statement,
    };
    let mut api = WitnessBuilder::new();
    assert!(matches!(
        circuit.define(&mut api),
        Err(CircuitError::NotBlockAligned { len: 24 })
    ));
}

#[test]
fn out_of_bounds_substring_is_rejected() {
    let session = demo_session().unwrap();
    let mut statement = session.statement;
    statement.substring_start = 30;
    let circuit = RecordVerify {
        key: session.key,
        plaintext: session.plaintext,
        statement,
    };
    let mut api = WitnessBuilder::new();
    assert!(matches!(
        circuit.define(&mut api),
        Err(CircuitError::SliceOutOfBounds { .. })
    ));
}

#[test]
fn oversized_value_slice_is_rejected() {
    let session = demo_session().unwrap();
    let mut statement = session.statement;
    statement.value_start = 0;
    statement.value_end = 12;
    let circuit = RecordVerify {
        key: session.key,
        plaintext: session.plaintext,
        statement,
    };
    let mut api = WitnessBuilder::new();
    assert!(matches!(
        circuit.define(&mut api),
        Err(CircuitError::ValueSliceTooLong { len: 12, max: 9 })
    ));
}

#[test]
fn no_constraints_emitted_before_shape_rejection() {
    let session = demo_session().unwrap();
    let mut statement = session.statement;
    statement.value_end = 100;
    let circuit = RecordVerify {
        key: session.key,
        plaintext: session.plaintext,
        statement,
    };
    let mut api = WitnessBuilder::new();
    assert!(circuit.define(&mut api).is_err());
    assert_eq!(api.num_constraints(), 0);
}

#[test]
fn constraint_count_is_assignment_independent() {
    let session = demo_session().unwrap();
    let honest = RecordVerify {
        key: session.key,
        plaintext: session.plaintext.clone(),
        statement: session.statement.clone(),
    };
    let mut api = WitnessBuilder::new();
    honest.define(&mut api).unwrap();
    let honest_counts = (api.num_constraints(), api.num_variables());

    // same shape, garbage assignment: identical topology, unsatisfied
    let garbage = RecordVerify {
        key: [0u8; 16],
        plaintext: vec![0u8; session.plaintext.len()],
        statement: session.statement,
    };
    let mut api = WitnessBuilder::new();
    garbage.define(&mut api).unwrap();
    assert_eq!(
        (api.num_constraints(), api.num_variables()),
        honest_counts
    );
    assert!(api.check().is_err());
}
