//! SHA-256 compression over constraint variables, with mid-state resumption
//!
//! The gadget buffers input bytes and runs the FIPS 180-4 compression
//! function once per full 64-byte block. Two entry points matter for the
//! TLS key-schedule circuits: `sum` applies standard padding and finalizes,
//! while `write_return` compresses exactly the buffered blocks without
//! padding, so a caller holding an intermediate hash state can continue a
//! hash whose earlier blocks were absorbed outside the circuit.
//!
//! All 32-bit additions ripple through boolean carries; a multi-operand
//! field sum would overflow the 31-bit modulus before the bit
//! decomposition could recover it.

use crate::builder::{ConstraintApi, Var};
use crate::gadgets::bits::{add_u32, and_u32, not_u32, xor_u32, U32, U8};

/// FIPS 180-4 round constants.
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Initial hash values.
const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Streaming SHA-256 over in-circuit bytes.
pub struct Sha256Gadget {
    state: [U32; 8],
    buffer: Vec<U8>,
    /// Total bytes absorbed, including any out-of-circuit prefix.
    length: u64,
}

impl Sha256Gadget {
    /// Start a fresh hash from the standard IV.
    pub fn new<B: ConstraintApi>(api: &mut B) -> Self {
        let state = core::array::from_fn(|i| U32::constant(api, H0[i]));
        Sha256Gadget {
            state,
            buffer: Vec::new(),
            length: 0,
        }
    }

    /// Resume from an externally computed 32-byte intermediate state.
    ///
    /// `prefix_len` is the number of bytes already absorbed into that state
    /// and must be a multiple of the 64-byte block size; it only affects
    /// the length field of the final padding.
    pub fn with_iv(state: &[U8; 32], prefix_len: u64) -> Self {
        debug_assert_eq!(prefix_len % 64, 0);
        let words = core::array::from_fn(|i| {
            U32::from_bytes_be([
                state[4 * i],
                state[4 * i + 1],
                state[4 * i + 2],
                state[4 * i + 3],
            ])
        });
        Sha256Gadget {
            state: words,
            buffer: Vec::new(),
            length: prefix_len,
        }
    }

    /// Absorb bytes, compressing each completed 64-byte block.
    pub fn write<B: ConstraintApi>(&mut self, api: &mut B, data: &[U8]) {
        self.length += data.len() as u64;
        self.buffer.extend_from_slice(data);
        while self.buffer.len() >= 64 {
            let block: Vec<U8> = self.buffer.drain(..64).collect();
            self.compress(api, &block);
        }
    }

    /// Finalize with standard SHA-256 padding and return the 32-byte digest.
    pub fn sum<B: ConstraintApi>(&mut self, api: &mut B) -> [U8; 32] {
        let mut padding = vec![0x80u8];
        let rem = (self.length % 64) as usize;
        let pad_len = if rem < 56 { 56 - rem } else { 120 - rem };
        padding.resize(pad_len, 0);
        padding.extend_from_slice(&(self.length * 8).to_be_bytes());

        let pad_bytes: Vec<U8> = padding
            .iter()
            .map(|&b| U8::constant(api, b))
            .collect();
        self.buffer.extend_from_slice(&pad_bytes);
        while self.buffer.len() >= 64 {
            let block: Vec<U8> = self.buffer.drain(..64).collect();
            self.compress(api, &block);
        }
        debug_assert!(self.buffer.is_empty());
        self.digest()
    }

    /// Return the raw state after compressing the buffered blocks, without
    /// any padding. The buffered length must be block-aligned; the circuits
    /// that call this feed in data that was padded before entering the
    /// constraint system.
    pub fn write_return<B: ConstraintApi>(&mut self, api: &mut B, data: &[U8]) -> [U8; 32] {
        self.write(api, data);
        debug_assert!(self.buffer.is_empty());
        self.digest()
    }

    /// Reset to the standard IV so the gadget can be reused for the next
    /// message without reallocating.
    pub fn reset<B: ConstraintApi>(&mut self, api: &mut B) {
        self.state = core::array::from_fn(|i| U32::constant(api, H0[i]));
        self.buffer.clear();
        self.length = 0;
    }

    fn digest(&self) -> [U8; 32] {
        let mut out = [U8 { bits: [Var(0); 8] }; 32];
        for (i, word) in self.state.iter().enumerate() {
            let bytes = word.to_bytes_be();
            out[4 * i..4 * i + 4].copy_from_slice(&bytes);
        }
        out
    }

    fn compress<B: ConstraintApi>(&mut self, api: &mut B, block: &[U8]) {
        debug_assert_eq!(block.len(), 64);

        let mut w = Vec::with_capacity(64);
        for i in 0..16 {
            w.push(U32::from_bytes_be([
                block[4 * i],
                block[4 * i + 1],
                block[4 * i + 2],
                block[4 * i + 3],
            ]));
        }
        for i in 16..64 {
            let s0 = small_sigma0(api, w[i - 15]);
            let s1 = small_sigma1(api, w[i - 2]);
            let t = add_u32(api, w[i - 16], s0);
            let t = add_u32(api, t, w[i - 7]);
            w.push(add_u32(api, t, s1));
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = self.state;

        for i in 0..64 {
            let s1 = big_sigma1(api, e);
            let ch = {
                let ef = and_u32(api, e, f);
                let ne = not_u32(api, e);
                let neg = and_u32(api, ne, g);
                xor_u32(api, ef, neg)
            };
            let k = U32::constant(api, K[i]);
            let t1 = add_u32(api, h, s1);
            let t1 = add_u32(api, t1, ch);
            let t1 = add_u32(api, t1, k);
            let t1 = add_u32(api, t1, w[i]);

            let s0 = big_sigma0(api, a);
            let maj = {
                let ab = and_u32(api, a, b);
                let ac = and_u32(api, a, c);
                let bc = and_u32(api, b, c);
                let t = xor_u32(api, ab, ac);
                xor_u32(api, t, bc)
            };
            let t2 = add_u32(api, s0, maj);

            h = g;
            g = f;
            f = e;
            e = add_u32(api, d, t1);
            d = c;
            c = b;
            b = a;
            a = add_u32(api, t1, t2);
        }

        let working = [a, b, c, d, e, f, g, h];
        for i in 0..8 {
            self.state[i] = add_u32(api, self.state[i], working[i]);
        }
    }
}

fn big_sigma0<B: ConstraintApi>(api: &mut B, x: U32) -> U32 {
    let a = x.rotate_right(2);
    let b = x.rotate_right(13);
    let c = x.rotate_right(22);
    let t = xor_u32(api, a, b);
    xor_u32(api, t, c)
}

fn big_sigma1<B: ConstraintApi>(api: &mut B, x: U32) -> U32 {
    let a = x.rotate_right(6);
    let b = x.rotate_right(11);
    let c = x.rotate_right(25);
    let t = xor_u32(api, a, b);
    xor_u32(api, t, c)
}

fn small_sigma0<B: ConstraintApi>(api: &mut B, x: U32) -> U32 {
    let a = x.rotate_right(7);
    let b = x.rotate_right(18);
    let c = x.shift_right(api, 3);
    let t = xor_u32(api, a, b);
    xor_u32(api, t, c)
}

fn small_sigma1<B: ConstraintApi>(api: &mut B, x: U32) -> U32 {
    let a = x.rotate_right(17);
    let b = x.rotate_right(19);
    let c = x.shift_right(api, 10);
    let t = xor_u32(api, a, b);
    xor_u32(api, t, c)
}
