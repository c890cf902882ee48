//! Constraint-builder interface
//!
//! This module defines [`ConstraintApi`], the narrow seam between the gadget
//! layer and whatever constraint system ultimately carries the proof. Gadgets
//! only ever talk to this trait; the bundled [`WitnessBuilder`] evaluates the
//! emitted constraints against a concrete assignment so that satisfiability
//! is testable in-process.
//!
//! ## Conventions
//!
//! - A [`Var`] is an opaque handle to one field element owned by the builder.
//! - "Bit" operations (`xor`, `and`, `not`) assume both operands are already
//!   boolean-constrained; gadget code upholds this by construction (bits only
//!   ever come from `to_binary` or boolean constants).
//! - `to_binary` produces a little-endian bit vector: bit i carries weight
//!   2^i. All byte and word gadgets inherit this ordering.

mod witness;

pub use witness::{Unsatisfied, Visibility, WitnessBuilder};

use p3_field::AbstractField;

use crate::F;

/// Opaque handle to a single field-element variable inside a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var(pub(crate) usize);

/// The constraint-building operations the gadget layer requires.
///
/// This is the complete external surface: equality assertion, single-bit
/// logic, binary decomposition/recomposition, a range-checked inequality,
/// and the small amount of field arithmetic needed for counter construction
/// and decimal parsing.
pub trait ConstraintApi {
    /// Introduce a constant field element. No constraint is emitted.
    fn constant(&mut self, value: F) -> Var;

    /// Allocate a public input with the given assignment.
    fn alloc_public(&mut self, value: F) -> Var;

    /// Allocate a private witness value with the given assignment.
    fn alloc_private(&mut self, value: F) -> Var;

    /// `a + b` over the field.
    fn add(&mut self, a: Var, b: Var) -> Var;

    /// `a - b` over the field.
    fn sub(&mut self, a: Var, b: Var) -> Var;

    /// Scaled multiply-accumulate: `acc + v * coeff`.
    fn mul_const_acc(&mut self, acc: Var, v: Var, coeff: F) -> Var;

    /// Boolean XOR of two bits.
    fn xor(&mut self, a: Var, b: Var) -> Var;

    /// Boolean AND of two bits.
    fn and(&mut self, a: Var, b: Var) -> Var;

    /// Boolean NOT of one bit.
    fn not(&mut self, a: Var) -> Var;

    /// Decompose `v` into `width` boolean-constrained bits, little-endian.
    ///
    /// Unsatisfiable if the assigned value does not fit in `width` bits.
    fn to_binary(&mut self, v: Var, width: usize) -> Vec<Var>;

    /// Recompose a little-endian bit vector into one field element.
    fn from_binary(&mut self, bits: &[Var]) -> Var;

    /// Assert `a == b`; the circuit is unsatisfiable otherwise.
    fn assert_equal(&mut self, a: Var, b: Var);

    /// Assert `a <= b` under the canonical integer ordering of the field.
    fn assert_less_or_equal(&mut self, a: Var, b: Var);

    /// Shorthand for a constant zero bit.
    fn zero(&mut self) -> Var {
        self.constant(F::zero())
    }
}
