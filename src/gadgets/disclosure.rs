//! Selective disclosure over decrypted record bytes
//!
//! The record circuits prove statements about plaintext without revealing
//! it: a public label appears at a fixed offset, and the ASCII-decimal
//! value that follows clears a public threshold.
//!
//! `string_to_int` maps each byte to `byte - 48` without range-checking the
//! digits. A non-digit byte shifts the accumulated value instead of failing
//! (a `.` contributes -2 at its decimal position); callers choose slice
//! bounds that cover digits only when they need exact arithmetic. Slices
//! are capped at 9 digits so the accumulated value stays below the 31-bit
//! field modulus.

use p3_field::AbstractField;

use crate::builder::{ConstraintApi, Var};
use crate::gadgets::bits::{assert_u8_equal, U8};
use crate::F;

/// Maximum value-slice width: 10^9 < 2^31 - 1 < 10^10.
pub const MAX_VALUE_DIGITS: usize = 9;

/// Assert `needle` appears in `haystack` at byte offset `start`.
pub fn substring_match<B: ConstraintApi>(
    api: &mut B,
    haystack: &[U8],
    needle: &[U8],
    start: usize,
) {
    debug_assert!(start + needle.len() <= haystack.len());
    for (j, &byte) in needle.iter().enumerate() {
        assert_u8_equal(api, haystack[start + j], byte);
    }
}

/// Interpret `digits` as an ASCII decimal number, most significant byte
/// first, and return its value as a single field variable.
pub fn string_to_int<B: ConstraintApi>(api: &mut B, digits: &[U8]) -> Var {
    debug_assert!(digits.len() <= MAX_VALUE_DIGITS);
    let ascii_zero = api.constant(F::from_canonical_u32(48));
    let mut sum = api.zero();
    let mut scale = F::one();
    for &byte in digits.iter().rev() {
        let value = byte.to_var(api);
        let digit = api.sub(value, ascii_zero);
        sum = api.mul_const_acc(sum, digit, scale);
        scale *= F::from_canonical_u32(10);
    }
    sum
}

/// Assert `value >= threshold`. Satisfied at equality.
pub fn greater_than<B: ConstraintApi>(api: &mut B, value: Var, threshold: Var) {
    api.assert_less_or_equal(threshold, value);
}
