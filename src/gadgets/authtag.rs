//! ECB assertions binding a key to a GCM authentication tag
//!
//! A GCM tag is `GHASH(Encrypt(key, 0^16), aad, ct) XOR Encrypt(key, J0)`.
//! The GHASH polynomial runs over public data, so the verifier recomputes
//! it outside the circuit; what must stay secret-dependent are the two ECB
//! outputs. This gadget asserts both against their public expected values,
//! proving the key in the witness is the key behind the tag.

use crate::builder::ConstraintApi;
use crate::gadgets::aes128::{encrypt_block, expand_key};
use crate::gadgets::bits::{assert_u8_equal, U8};

/// Assert `Encrypt(key, zeros) = ecb0` and `Encrypt(key, iv_counter) = ecbk`.
///
/// `iv_counter` is the GCM J0 block (`iv ‖ BE32(1)`), passed in as opaque
/// bytes. One key expansion covers both encryptions.
pub fn assert_tag_blocks<B: ConstraintApi>(
    api: &mut B,
    key: &[U8; 16],
    zeros: &[U8; 16],
    iv_counter: &[U8; 16],
    ecb0: &[U8; 16],
    ecbk: &[U8; 16],
) {
    let xk = expand_key(api, key);

    let enc_zero = encrypt_block(api, &xk, zeros);
    for i in 0..16 {
        assert_u8_equal(api, enc_zero[i], ecb0[i]);
    }

    let enc_counter = encrypt_block(api, &xk, iv_counter);
    for i in 0..16 {
        assert_u8_equal(api, enc_counter[i], ecbk[i]);
    }
}
