//! Session circuit compositions
//!
//! Each circuit owns its assignment data as plain bytes and exposes a
//! `define` entry point that validates shape parameters, allocates the
//! public and private variables, and declares every constraint. Definition
//! is single-threaded and side-effect-free; a circuit value can be defined
//! into any builder implementing [`ConstraintApi`].
//!
//! Shape errors surface as [`CircuitError`] before any constraint is
//! emitted. Satisfiability is reported separately by the builder.

use p3_field::AbstractField;
use thiserror::Error;

use crate::builder::ConstraintApi;
use crate::gadgets::authtag::assert_tag_blocks;
use crate::gadgets::bits::{assert_u8_equal, U8};
use crate::gadgets::disclosure::MAX_VALUE_DIGITS;
use crate::gadgets::kdc::KeySchedule;
use crate::gadgets::sha256::Sha256Gadget;
use crate::F;

mod oracle;
mod record;
mod session_commit;
mod session_data;

pub use oracle::Oracle;
pub use record::{AuthenticatedRecord, RecordStatement, RecordVerify};
pub use session_commit::SessionCommit;
pub use session_data::SessionData;

/// Shape-validation failures raised while assembling a circuit.
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("record length {len} is not a multiple of the 16-byte block size")]
    NotBlockAligned { len: usize },

    #[error("slice [{start}, {end}) is out of bounds for a {len}-byte record")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("value slice spans {len} bytes, maximum is {max}")]
    ValueSliceTooLong { len: usize, max: usize },
}

// One field variable per input byte, bit-decomposed through `to_binary` so
// every bit downstream gadgets touch carries a booleanity constraint.
fn alloc_byte<B: ConstraintApi>(api: &mut B, value: u8, public: bool) -> U8 {
    let v = F::from_canonical_u32(u32::from(value));
    let var = if public {
        api.alloc_public(v)
    } else {
        api.alloc_private(v)
    };
    U8::from_var(api, var)
}

pub(crate) fn alloc_bytes_public<B: ConstraintApi>(api: &mut B, data: &[u8]) -> Vec<U8> {
    data.iter().map(|&b| alloc_byte(api, b, true)).collect()
}

pub(crate) fn alloc_bytes_private<B: ConstraintApi>(api: &mut B, data: &[u8]) -> Vec<U8> {
    data.iter().map(|&b| alloc_byte(api, b, false)).collect()
}

pub(crate) fn assert_digest_equals_public<B: ConstraintApi>(
    api: &mut B,
    digest: &[U8; 32],
    expected: &[u8; 32],
) {
    let commitment = alloc_bytes_public(api, expected);
    for (d, c) in digest.iter().zip(commitment.iter()) {
        assert_u8_equal(api, *d, *c);
    }
}

/// Inputs for one traffic-key derivation. The four hash-chain buffers are
/// public statement data; only the padded inner hash `dhs_in` is a private
/// witness. See [`crate::gadgets::kdc`] for the derivation chain.
#[derive(Debug, Clone)]
pub struct KdcInputs {
    pub intermediate_hash_hs_opad: [u8; 32],
    /// Pre-padded 64-byte block, inner hash plus SHA-256 padding for a
    /// 96-byte total message.
    pub dhs_in: [u8; 64],
    pub ms_in: [u8; 32],
    pub xats_in: [u8; 32],
    pub tk_xapp_in: [u8; 32],
}

impl KdcInputs {
    /// Allocate the derivation inputs and return the in-circuit traffic key.
    pub(crate) fn derive<B: ConstraintApi>(&self, api: &mut B) -> [U8; 16] {
        let to_array32 = |v: Vec<U8>| -> [U8; 32] {
            v.try_into().unwrap_or_else(|_| unreachable!())
        };
        let dhs_in: [U8; 64] = alloc_bytes_private(api, &self.dhs_in)
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        let schedule = KeySchedule {
            intermediate_hash_hs_opad: to_array32(alloc_bytes_public(
                api,
                &self.intermediate_hash_hs_opad,
            )),
            dhs_in,
            ms_in: to_array32(alloc_bytes_public(api, &self.ms_in)),
            xats_in: to_array32(alloc_bytes_public(api, &self.xats_in)),
            tk_xapp_in: to_array32(alloc_bytes_public(api, &self.tk_xapp_in)),
        };
        schedule.derive(api)
    }
}

/// Public statement binding a key to the two ECB blocks behind a GCM tag.
#[derive(Debug, Clone)]
pub struct AuthTagInputs {
    /// All-zero block, carried as an explicit public input.
    pub zeros: [u8; 16],
    /// GCM J0 block, `iv ‖ BE32(1)`, treated as opaque bytes.
    pub iv_counter: [u8; 16],
    pub ecb0: [u8; 16],
    pub ecbk: [u8; 16],
}

impl AuthTagInputs {
    pub fn new(iv: [u8; 12], ecb0: [u8; 16], ecbk: [u8; 16]) -> Self {
        let mut iv_counter = [0u8; 16];
        iv_counter[..12].copy_from_slice(&iv);
        iv_counter[12..].copy_from_slice(&1u32.to_be_bytes());
        AuthTagInputs {
            zeros: [0u8; 16],
            iv_counter,
            ecb0,
            ecbk,
        }
    }

    pub(crate) fn assert_with_key<B: ConstraintApi>(&self, api: &mut B, key: &[U8; 16]) {
        let to_block = |v: Vec<U8>| -> [U8; 16] {
            v.try_into().unwrap_or_else(|_| unreachable!())
        };
        let zeros = to_block(alloc_bytes_public(api, &self.zeros));
        let iv_counter = to_block(alloc_bytes_public(api, &self.iv_counter));
        let ecb0 = to_block(alloc_bytes_public(api, &self.ecb0));
        let ecbk = to_block(alloc_bytes_public(api, &self.ecbk));
        assert_tag_blocks(api, key, &zeros, &iv_counter, &ecb0, &ecbk);
    }
}

pub(crate) fn assert_key_commitment<B: ConstraintApi>(
    api: &mut B,
    key: &[U8; 16],
    commitment: &[u8; 32],
) {
    let mut hasher = Sha256Gadget::new(api);
    hasher.write(api, key);
    let digest = hasher.sum(api);
    assert_digest_equals_public(api, &digest, commitment);
}

pub(crate) fn check_value_slice(
    start: usize,
    end: usize,
    len: usize,
) -> Result<(), CircuitError> {
    if start >= end || end > len {
        return Err(CircuitError::SliceOutOfBounds { start, end, len });
    }
    if end - start > MAX_VALUE_DIGITS {
        return Err(CircuitError::ValueSliceTooLong {
            len: end - start,
            max: MAX_VALUE_DIGITS,
        });
    }
    Ok(())
}
