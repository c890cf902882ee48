//! zktls-circuits
//!
//! Constraint-emission gadgets and composition circuits for verifiable,
//! privacy-preserving proofs about TLS 1.3 session traffic, over the
//! Mersenne 31 field.
//!
//! # Architecture
//!
//! The crate is a gadget library: every cryptographic primitive is
//! re-expressed as a fixed topology of boolean/field constraints emitted
//! through the narrow [`builder::ConstraintApi`] interface.
//!
//! - Gadget layer: bit operations, AES-128, GCM keystream, auth-tag ECB
//!   checks, SHA-256 with mid-state resumption, TLS 1.3 key schedule,
//!   selective disclosure (substring / decimal parse / threshold).
//! - Composition layer: `RecordVerify`, `AuthenticatedRecord`,
//!   `SessionCommit`, `SessionData`, and the end-to-end `Oracle` circuit,
//!   each a declarative conjunction of gadget constraints.
//! - Witness layer: out-of-circuit reference crypto used to construct
//!   assignments and cross-check the gadgets.
//!
//! # Satisfiability model
//!
//! A circuit is either satisfiable for a given assignment or it is not;
//! there is no partial success. The bundled [`builder::WitnessBuilder`]
//! evaluates every emitted constraint against the concrete assignment and
//! reports the first violation, which makes the whole layer testable
//! without a proving backend. Proving, trusted setup, and verification
//! belong to an external backend and are out of scope here.

pub mod builder;
pub mod circuits;
pub mod evaluate;
pub mod gadgets;
pub mod witness;

// Re-export the circuit types that form the public statement surface
pub use circuits::{
    AuthTagInputs, AuthenticatedRecord, CircuitError, KdcInputs, Oracle, RecordStatement,
    RecordVerify, SessionCommit, SessionData,
};

pub use builder::{ConstraintApi, Unsatisfied, Var, Visibility, WitnessBuilder};

use p3_mersenne_31::Mersenne31;

/// The field type used throughout the gadget layer (Mersenne 31: p = 2^31 - 1)
pub type F = Mersenne31;
