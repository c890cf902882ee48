//! Witness-evaluating constraint builder
//!
//! [`WitnessBuilder`] implements [`ConstraintApi`] by carrying the concrete
//! assignment alongside the constraint stream: every emitted constraint is
//! checked immediately against the assigned values and violations are
//! collected. The builder also tracks variable visibility and constraint
//! counts, which is what the evaluation harness and the tests consume.
//!
//! Compile-only mode needs no separate code path: circuit shape depends only
//! on lengths and offsets, never on assigned data, so running `define` with
//! an all-zero assignment yields the constraint counts of the compiled
//! circuit.

use p3_field::{AbstractField, PrimeField32};

use super::{ConstraintApi, Var};
use crate::F;

/// Visibility tag attached to every variable at allocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Constant baked into the circuit.
    Constant,
    /// Public input, visible to the verifier.
    Public,
    /// Private witness, known only to the prover.
    Private,
    /// Internal wire produced by a gadget operation.
    Internal,
}

/// A violated constraint, kept for diagnostics.
#[derive(Debug, Clone)]
struct Violation {
    index: usize,
    detail: String,
}

/// The circuit, evaluated against this assignment, is unsatisfiable.
///
/// Carries the index of the first violated constraint. There is deliberately
/// no richer taxonomy: a single failed assertion voids the whole proof.
#[derive(Debug, Clone, thiserror::Error)]
#[error("constraint {index} unsatisfied: {detail}")]
pub struct Unsatisfied {
    /// Sequence number of the first violated constraint.
    pub index: usize,
    /// Human-readable description of the violated relation.
    pub detail: String,
}

/// Constraint builder that evaluates every constraint against a concrete
/// assignment.
#[derive(Debug, Default)]
pub struct WitnessBuilder {
    values: Vec<F>,
    visibility: Vec<Visibility>,
    num_constraints: usize,
    violations: Vec<Violation>,
}

impl WitnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, value: F, vis: Visibility) -> Var {
        self.values.push(value);
        self.visibility.push(vis);
        Var(self.values.len() - 1)
    }

    fn value(&self, v: Var) -> F {
        self.values[v.0]
    }

    fn record(&mut self, holds: bool, detail: impl FnOnce() -> String) {
        if !holds {
            self.violations.push(Violation {
                index: self.num_constraints,
                detail: detail(),
            });
        }
        self.num_constraints += 1;
    }

    /// Total number of variables allocated so far.
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Total number of constraints emitted so far.
    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    /// Number of variables tagged with the given visibility.
    pub fn count_of(&self, vis: Visibility) -> usize {
        self.visibility.iter().filter(|&&v| v == vis).count()
    }

    /// Concrete assigned value of a variable, as a canonical integer.
    pub fn assignment_of(&self, v: Var) -> u32 {
        self.value(v).as_canonical_u32()
    }

    /// Check whether every emitted constraint holds for the assignment.
    pub fn check(&self) -> Result<(), Unsatisfied> {
        match self.violations.first() {
            None => Ok(()),
            Some(v) => Err(Unsatisfied {
                index: v.index,
                detail: v.detail.clone(),
            }),
        }
    }
}

impl ConstraintApi for WitnessBuilder {
    fn constant(&mut self, value: F) -> Var {
        self.push(value, Visibility::Constant)
    }

    fn alloc_public(&mut self, value: F) -> Var {
        self.push(value, Visibility::Public)
    }

    fn alloc_private(&mut self, value: F) -> Var {
        self.push(value, Visibility::Private)
    }

    fn add(&mut self, a: Var, b: Var) -> Var {
        let v = self.value(a) + self.value(b);
        self.push(v, Visibility::Internal)
    }

    fn sub(&mut self, a: Var, b: Var) -> Var {
        let v = self.value(a) - self.value(b);
        self.push(v, Visibility::Internal)
    }

    fn mul_const_acc(&mut self, acc: Var, v: Var, coeff: F) -> Var {
        let out = self.value(acc) + self.value(v) * coeff;
        self.push(out, Visibility::Internal)
    }

    fn xor(&mut self, a: Var, b: Var) -> Var {
        // a + b - 2ab over the field; one constraint per bit
        let (va, vb) = (self.value(a), self.value(b));
        let out = va + vb - va * vb.double();
        self.num_constraints += 1;
        self.push(out, Visibility::Internal)
    }

    fn and(&mut self, a: Var, b: Var) -> Var {
        let out = self.value(a) * self.value(b);
        self.num_constraints += 1;
        self.push(out, Visibility::Internal)
    }

    fn not(&mut self, a: Var) -> Var {
        let out = F::one() - self.value(a);
        self.num_constraints += 1;
        self.push(out, Visibility::Internal)
    }

    fn to_binary(&mut self, v: Var, width: usize) -> Vec<Var> {
        let canonical = self.value(v).as_canonical_u32() as u64;
        let fits = width >= 32 || canonical < (1u64 << width);
        self.record(fits, || {
            format!("value {canonical} does not fit in {width} bits")
        });
        let mut bits = Vec::with_capacity(width);
        for i in 0..width {
            if i < 32 {
                let bit = F::from_canonical_u32(((canonical >> i) & 1) as u32);
                // one boolean constraint per bit
                self.num_constraints += 1;
                bits.push(self.push(bit, Visibility::Internal));
            } else {
                // widths beyond the field size pad with constant zeros
                let z = self.zero();
                bits.push(z);
            }
        }
        bits
    }

    fn from_binary(&mut self, bits: &[Var]) -> Var {
        let mut acc = F::zero();
        let mut weight = F::one();
        for &b in bits {
            acc += self.value(b) * weight;
            weight = weight.double();
        }
        // one recomposition constraint
        self.num_constraints += 1;
        self.push(acc, Visibility::Internal)
    }

    fn assert_equal(&mut self, a: Var, b: Var) {
        let (va, vb) = (self.value(a), self.value(b));
        self.record(va == vb, || {
            format!(
                "{} != {}",
                va.as_canonical_u32(),
                vb.as_canonical_u32()
            )
        });
    }

    fn assert_less_or_equal(&mut self, a: Var, b: Var) {
        let (va, vb) = (self.value(a).as_canonical_u32(), self.value(b).as_canonical_u32());
        self.record(va <= vb, || format!("{va} > {vb}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_ops_follow_boolean_semantics() {
        let mut api = WitnessBuilder::new();
        let zero = api.constant(F::zero());
        let one = api.constant(F::one());

        let x = api.xor(zero, one);
        assert_eq!(api.assignment_of(x), 1);
        let x = api.xor(one, one);
        assert_eq!(api.assignment_of(x), 0);
        let a = api.and(one, one);
        assert_eq!(api.assignment_of(a), 1);
        let n = api.not(one);
        assert_eq!(api.assignment_of(n), 0);
    }

    #[test]
    fn binary_round_trip() {
        let mut api = WitnessBuilder::new();
        let v = api.constant(F::from_canonical_u32(0xA5));
        let bits = api.to_binary(v, 8);
        assert_eq!(bits.len(), 8);
        // little-endian: bit 0 of 0xA5 is 1
        assert_eq!(api.assignment_of(bits[0]), 1);
        assert_eq!(api.assignment_of(bits[1]), 0);
        let back = api.from_binary(&bits);
        assert_eq!(api.assignment_of(back), 0xA5);
        assert!(api.check().is_ok());
    }

    #[test]
    fn to_binary_rejects_oversized_values() {
        let mut api = WitnessBuilder::new();
        let v = api.constant(F::from_canonical_u32(256));
        api.to_binary(v, 8);
        assert!(api.check().is_err());
    }

    #[test]
    fn assert_equal_records_violation() {
        let mut api = WitnessBuilder::new();
        let a = api.constant(F::from_canonical_u32(3));
        let b = api.constant(F::from_canonical_u32(4));
        api.assert_equal(a, a);
        assert!(api.check().is_ok());
        api.assert_equal(a, b);
        let err = api.check().unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn less_or_equal_is_non_strict() {
        let mut api = WitnessBuilder::new();
        let a = api.constant(F::from_canonical_u32(38002));
        let b = api.constant(F::from_canonical_u32(38002));
        api.assert_less_or_equal(a, b);
        assert!(api.check().is_ok());
        let c = api.constant(F::from_canonical_u32(38001));
        api.assert_less_or_equal(a, c);
        assert!(api.check().is_err());
    }
}
