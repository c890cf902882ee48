//! TLS 1.3 key-schedule derivation from a handshake-secret mid-state
//!
//! The prover never holds the handshake secret itself. It holds the SHA-256
//! state left after absorbing `HS XOR opad` as a first block, plus the
//! pre-padded inner-hash outputs of the HKDF expansion. From there the
//! circuit walks the remaining outer hashes of the schedule:
//!
//!   dHS  = resume(IH_HSopad, dHSin ‖ pad)
//!   MS   = SHA256(opad_concat(dHS,  MSin))
//!   SATS = SHA256(opad_concat(MS,   XATSin))
//!   tk'  = SHA256(opad_concat(SATS, tkXAPPin))
//!   tk   = tk'[..16]
//!
//! One `Sha256Gadget` instance serves all three full hashes via `reset`.

use crate::gadgets::bits::{xor_u8, U8};
use crate::builder::ConstraintApi;
use crate::gadgets::sha256::Sha256Gadget;

/// In-circuit inputs for one traffic-key derivation.
pub struct KeySchedule {
    /// SHA-256 state after absorbing the 64-byte `HS XOR opad` block.
    pub intermediate_hash_hs_opad: [U8; 32],
    /// Pre-padded single block holding the inner hash of the dHS expansion.
    pub dhs_in: [U8; 64],
    pub ms_in: [U8; 32],
    pub xats_in: [U8; 32],
    pub tk_xapp_in: [U8; 32],
}

/// `(secret ‖ 0^32) XOR 0x5c^64`, then `next` appended: the outer-hash
/// input of one HMAC-style derivation step.
pub fn opad_concat<B: ConstraintApi>(
    api: &mut B,
    secret: &[U8; 32],
    next: &[U8; 32],
) -> Vec<U8> {
    let opad = U8::constant(api, 0x5c);
    let mut out = Vec::with_capacity(96);
    for &byte in secret.iter() {
        out.push(xor_u8(api, byte, opad));
    }
    for _ in 0..32 {
        out.push(opad);
    }
    out.extend_from_slice(next);
    out
}

impl KeySchedule {
    /// Run the derivation chain and return the 16-byte traffic key.
    pub fn derive<B: ConstraintApi>(&self, api: &mut B) -> [U8; 16] {
        let mut hasher = Sha256Gadget::with_iv(&self.intermediate_hash_hs_opad, 64);
        let dhs = hasher.write_return(api, &self.dhs_in);

        let mut secret = dhs;
        for next in [&self.ms_in, &self.xats_in, &self.tk_xapp_in] {
            let block = opad_concat(api, &secret, next);
            hasher.reset(api);
            hasher.write(api, &block);
            secret = hasher.sum(api);
        }

        let mut tk = [U8 { bits: [crate::builder::Var(0); 8] }; 16];
        tk.copy_from_slice(&secret[..16]);
        tk
    }
}
