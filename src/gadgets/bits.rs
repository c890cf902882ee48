//! Bitwise primitives over fixed-width boolean vectors
//!
//! [`U8`] and [`U32`] wrap boolean-constrained variables in little-endian
//! weight order: `bits[i]` carries weight 2^i. Bytes assemble into words
//! big-endian (byte 0 is the most significant), matching SHA-256 and the
//! GCM counter layout.
//!
//! XOR/AND/NOT emit one builder call per bit. Rotates and shifts are index
//! permutations and zero-fills: placement only, no constraints. The 32-bit
//! adder is a ripple-carry boolean circuit (the 31-bit field cannot hold
//! multi-operand 32-bit sums, so add-then-truncate is not an option).

use p3_field::AbstractField;

use crate::builder::{ConstraintApi, Var};
use crate::F;

/// One byte: 8 boolean-constrained variables, little-endian bit order.
#[derive(Debug, Clone, Copy)]
pub struct U8 {
    pub bits: [Var; 8],
}

impl U8 {
    /// Constant byte. Bits are constants; no constraints are emitted.
    pub fn constant<B: ConstraintApi>(api: &mut B, value: u8) -> Self {
        let mut bits = [Var(0); 8];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = api.constant(F::from_canonical_u32(u32::from((value >> i) & 1)));
        }
        Self { bits }
    }

    /// Decompose an already-allocated field variable into a byte.
    pub fn from_var<B: ConstraintApi>(api: &mut B, v: Var) -> Self {
        let bits = api.to_binary(v, 8);
        let mut out = [Var(0); 8];
        out.copy_from_slice(&bits);
        Self { bits: out }
    }

    /// Recompose this byte into a single field variable.
    pub fn to_var<B: ConstraintApi>(self, api: &mut B) -> Var {
        api.from_binary(&self.bits)
    }
}

/// One 32-bit word: 32 boolean-constrained variables, little-endian bit order.
#[derive(Debug, Clone, Copy)]
pub struct U32 {
    pub bits: [Var; 32],
}

impl U32 {
    pub fn constant<B: ConstraintApi>(api: &mut B, value: u32) -> Self {
        let mut bits = [Var(0); 32];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = api.constant(F::from_canonical_u32((value >> i) & 1));
        }
        Self { bits }
    }

    /// Assemble a word from four bytes, big-endian: `b[0]` is the most
    /// significant byte. Pure placement.
    pub fn from_bytes_be(b: [U8; 4]) -> Self {
        let mut bits = [Var(0); 32];
        for (j, byte) in b.iter().enumerate() {
            // byte 0 occupies the high-weight bits 24..32
            let base = 8 * (3 - j);
            bits[base..base + 8].copy_from_slice(&byte.bits);
        }
        Self { bits }
    }

    /// Split a word back into four big-endian bytes. Pure placement.
    pub fn to_bytes_be(self) -> [U8; 4] {
        let mut out = [U8 { bits: [Var(0); 8] }; 4];
        for (j, byte) in out.iter_mut().enumerate() {
            let base = 8 * (3 - j);
            byte.bits.copy_from_slice(&self.bits[base..base + 8]);
        }
        out
    }

    /// Rotate right by `n` bit positions. Pure placement.
    pub fn rotate_right(self, n: usize) -> Self {
        let mut bits = [Var(0); 32];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = self.bits[(i + n) % 32];
        }
        Self { bits }
    }

    /// Logical shift right by `n`, zero-filling the vacated high bits.
    pub fn shift_right<B: ConstraintApi>(self, api: &mut B, n: usize) -> Self {
        let zero = api.zero();
        let mut bits = [zero; 32];
        for i in 0..32 - n {
            bits[i] = self.bits[i + n];
        }
        Self { bits }
    }
}

/// Byte-wise XOR: one builder call per bit.
pub fn xor_u8<B: ConstraintApi>(api: &mut B, a: U8, b: U8) -> U8 {
    let mut bits = [Var(0); 8];
    for i in 0..8 {
        bits[i] = api.xor(a.bits[i], b.bits[i]);
    }
    U8 { bits }
}

pub fn xor_u32<B: ConstraintApi>(api: &mut B, a: U32, b: U32) -> U32 {
    let mut bits = [Var(0); 32];
    for i in 0..32 {
        bits[i] = api.xor(a.bits[i], b.bits[i]);
    }
    U32 { bits }
}

pub fn and_u32<B: ConstraintApi>(api: &mut B, a: U32, b: U32) -> U32 {
    let mut bits = [Var(0); 32];
    for i in 0..32 {
        bits[i] = api.and(a.bits[i], b.bits[i]);
    }
    U32 { bits }
}

pub fn not_u32<B: ConstraintApi>(api: &mut B, a: U32) -> U32 {
    let mut bits = [Var(0); 32];
    for i in 0..32 {
        bits[i] = api.not(a.bits[i]);
    }
    U32 { bits }
}

/// 32-bit modular addition as a ripple-carry boolean adder.
///
/// Per bit: `s = a ^ b ^ c`, `c' = (a & b) ^ (c & (a ^ b))`; the two carry
/// terms are mutually exclusive, so XOR implements their OR. The final carry
/// is dropped (mod 2^32).
pub fn add_u32<B: ConstraintApi>(api: &mut B, a: U32, b: U32) -> U32 {
    let mut bits = [Var(0); 32];
    let mut carry = api.zero();
    for i in 0..32 {
        let axb = api.xor(a.bits[i], b.bits[i]);
        bits[i] = api.xor(axb, carry);
        if i < 31 {
            let gen = api.and(a.bits[i], b.bits[i]);
            let prop = api.and(carry, axb);
            carry = api.xor(gen, prop);
        }
    }
    U32 { bits }
}

/// Assert byte equality bit-by-bit.
pub fn assert_u8_equal<B: ConstraintApi>(api: &mut B, a: U8, b: U8) {
    for i in 0..8 {
        api.assert_equal(a.bits[i], b.bits[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WitnessBuilder;

    fn byte_value(api: &WitnessBuilder, b: U8) -> u8 {
        let mut v = 0u8;
        for (i, bit) in b.bits.iter().enumerate() {
            v |= (api.assignment_of(*bit) as u8) << i;
        }
        v
    }

    fn word_value(api: &WitnessBuilder, w: U32) -> u32 {
        let mut v = 0u32;
        for (i, bit) in w.bits.iter().enumerate() {
            v |= api.assignment_of(*bit) << i;
        }
        v
    }

    #[test]
    fn xor_and_not_bytes() {
        let mut api = WitnessBuilder::new();
        let a = U8::constant(&mut api, 0xA5);
        let b = U8::constant(&mut api, 0x3C);
        let x = xor_u8(&mut api, a, b);
        assert_eq!(byte_value(&api, x), 0xA5 ^ 0x3C);
        assert!(api.check().is_ok());
    }

    #[test]
    fn word_byte_round_trip_is_big_endian() {
        let mut api = WitnessBuilder::new();
        let bytes = [
            U8::constant(&mut api, 0xDE),
            U8::constant(&mut api, 0xAD),
            U8::constant(&mut api, 0xBE),
            U8::constant(&mut api, 0xEF),
        ];
        let w = U32::from_bytes_be(bytes);
        assert_eq!(word_value(&api, w), 0xDEADBEEF);
        let back = w.to_bytes_be();
        assert_eq!(byte_value(&api, back[0]), 0xDE);
        assert_eq!(byte_value(&api, back[3]), 0xEF);
    }

    #[test]
    fn rotate_and_shift() {
        let mut api = WitnessBuilder::new();
        let w = U32::constant(&mut api, 0x80000001);
        assert_eq!(word_value(&api, w.rotate_right(1)), 0xC0000000);
        let s = w.shift_right(&mut api, 4);
        assert_eq!(word_value(&api, s), 0x08000000);
    }

    #[test]
    fn ripple_carry_addition() {
        let mut api = WitnessBuilder::new();
        for (a, b) in [
            (0u32, 0u32),
            (1, 1),
            (0xFFFF_FFFF, 1),
            (0x89AB_CDEF, 0x1234_5678),
            (0x8000_0000, 0x8000_0000),
        ] {
            let wa = U32::constant(&mut api, a);
            let wb = U32::constant(&mut api, b);
            let s = add_u32(&mut api, wa, wb);
            assert_eq!(word_value(&api, s), a.wrapping_add(b));
        }
        assert!(api.check().is_ok());
    }
}
