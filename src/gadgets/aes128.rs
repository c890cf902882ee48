//! AES-128 key schedule and single-block encryption as boolean circuits
//!
//! Every AES step is expressed inside the constraint system: the S-box is a
//! constraint-encoded 256-way multiplexer (nibble selectors + scaled
//! multiply-accumulate), ShiftRows is pure placement, and the MixColumns
//! field multiplications reduce to shifts and conditional XOR with 0x1b.
//! No out-of-circuit table lookup is permitted, since the proof must cover
//! every AES step.
//!
//! State layout is column-major: `state[r + 4 * c]` holds row r of column c,
//! matching the byte order of the plaintext block.

use p3_field::AbstractField;

use crate::builder::{ConstraintApi, Var};
use crate::gadgets::bits::{xor_u8, U8};
use crate::F;

/// The AES S-box, embedded as multiplexer coefficients.
pub const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Round constants for the key schedule (applied every 4th word).
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Boolean selectors for one nibble: `selectors[v]` is 1 iff the 4 input
/// bits encode `v`. 16 AND-chains over bit literals and their negations.
fn nibble_selectors<B: ConstraintApi>(api: &mut B, bits: &[Var]) -> [Var; 16] {
    debug_assert_eq!(bits.len(), 4);
    let mut literals = [[Var(0); 2]; 4];
    for (i, &bit) in bits.iter().enumerate() {
        literals[i][0] = api.not(bit);
        literals[i][1] = bit;
    }
    let mut selectors = [Var(0); 16];
    for (v, sel) in selectors.iter_mut().enumerate() {
        let l01 = api.and(literals[0][v & 1], literals[1][(v >> 1) & 1]);
        let l23 = api.and(literals[2][(v >> 2) & 1], literals[3][(v >> 3) & 1]);
        *sel = api.and(l01, l23);
    }
    selectors
}

/// S-box substitution as a constraint-encoded lookup.
///
/// The low and high nibbles each produce 16 boolean selectors; their 256
/// pairwise ANDs select exactly one S-box coefficient, accumulated with
/// `mul_const_acc` and re-decomposed into bits.
pub fn sub_byte<B: ConstraintApi>(api: &mut B, b: U8) -> U8 {
    let lo = nibble_selectors(api, &b.bits[0..4]);
    let hi = nibble_selectors(api, &b.bits[4..8]);
    let mut acc = api.zero();
    for (v, &coeff) in SBOX.iter().enumerate() {
        let sel = api.and(lo[v & 0xF], hi[v >> 4]);
        acc = api.mul_const_acc(acc, sel, F::from_canonical_u32(u32::from(coeff)));
    }
    U8::from_var(api, acc)
}

/// Multiply by 2 in GF(2^8): shift left one bit, conditionally reduce by
/// 0x1b when the input MSB is set.
fn mul2<B: ConstraintApi>(api: &mut B, b: U8) -> U8 {
    let zero = api.zero();
    let mut bits = [zero; 8];
    for i in 1..8 {
        bits[i] = b.bits[i - 1];
    }
    let msb = b.bits[7];
    // 0x1b has bits 0, 1, 3 and 4 set
    for i in [0usize, 1, 3, 4] {
        bits[i] = api.xor(bits[i], msb);
    }
    U8 { bits }
}

/// Multiply by 3 in GF(2^8): `mul2(b) ^ b`.
fn mul3<B: ConstraintApi>(api: &mut B, b: U8) -> U8 {
    let doubled = mul2(api, b);
    xor_u8(api, doubled, b)
}

/// Expand a 16-byte key into the 176-byte round-key schedule.
///
/// Every 4th word is rotated, S-box substituted and XORed with the round
/// constant; all other words XOR the word four positions back. Computed once
/// per circuit evaluation.
pub fn expand_key<B: ConstraintApi>(api: &mut B, key: &[U8; 16]) -> [U8; 176] {
    let mut xk = [U8 { bits: [Var(0); 8] }; 176];
    xk[..16].copy_from_slice(key);

    let mut i = 16;
    while i < 176 {
        let mut t = [xk[i - 4], xk[i - 3], xk[i - 2], xk[i - 1]];
        if i % 16 == 0 {
            // rotate word
            t = [t[1], t[2], t[3], t[0]];
            for byte in t.iter_mut() {
                *byte = sub_byte(api, *byte);
            }
            let rcon = U8::constant(api, RCON[i / 16 - 1]);
            t[0] = xor_u8(api, t[0], rcon);
        }
        for j in 0..4 {
            xk[i + j] = xor_u8(api, xk[i - 16 + j], t[j]);
        }
        i += 4;
    }
    xk
}

fn shift_rows(state: &[U8; 16]) -> [U8; 16] {
    let mut out = [U8 { bits: [Var(0); 8] }; 16];
    for c in 0..4 {
        for r in 0..4 {
            out[r + 4 * c] = state[r + 4 * ((c + r) % 4)];
        }
    }
    out
}

fn mix_columns<B: ConstraintApi>(api: &mut B, state: &[U8; 16]) -> [U8; 16] {
    let mut out = [U8 { bits: [Var(0); 8] }; 16];
    for c in 0..4 {
        let col = [state[4 * c], state[4 * c + 1], state[4 * c + 2], state[4 * c + 3]];
        let d0 = {
            let a = mul2(api, col[0]);
            let b = mul3(api, col[1]);
            let ab = xor_u8(api, a, b);
            let abc = xor_u8(api, ab, col[2]);
            xor_u8(api, abc, col[3])
        };
        let d1 = {
            let b = mul2(api, col[1]);
            let cc = mul3(api, col[2]);
            let ab = xor_u8(api, col[0], b);
            let abc = xor_u8(api, ab, cc);
            xor_u8(api, abc, col[3])
        };
        let d2 = {
            let cc = mul2(api, col[2]);
            let d = mul3(api, col[3]);
            let ab = xor_u8(api, col[0], col[1]);
            let abc = xor_u8(api, ab, cc);
            xor_u8(api, abc, d)
        };
        let d3 = {
            let a = mul3(api, col[0]);
            let d = mul2(api, col[3]);
            let ab = xor_u8(api, a, col[1]);
            let abc = xor_u8(api, ab, col[2]);
            xor_u8(api, abc, d)
        };
        out[4 * c] = d0;
        out[4 * c + 1] = d1;
        out[4 * c + 2] = d2;
        out[4 * c + 3] = d3;
    }
    out
}

fn add_round_key<B: ConstraintApi>(api: &mut B, state: &[U8; 16], rk: &[U8]) -> [U8; 16] {
    let mut out = [U8 { bits: [Var(0); 8] }; 16];
    for i in 0..16 {
        out[i] = xor_u8(api, state[i], rk[i]);
    }
    out
}

/// Encrypt one 16-byte block under an expanded round-key schedule.
///
/// Initial round-key XOR, nine full rounds (SubBytes, ShiftRows, MixColumns,
/// AddRoundKey), final round without MixColumns.
pub fn encrypt_block<B: ConstraintApi>(
    api: &mut B,
    xk: &[U8; 176],
    block: &[U8; 16],
) -> [U8; 16] {
    let mut state = add_round_key(api, block, &xk[..16]);

    for round in 1..10 {
        for byte in state.iter_mut() {
            *byte = sub_byte(api, *byte);
        }
        state = shift_rows(&state);
        state = mix_columns(api, &state);
        state = add_round_key(api, &state, &xk[16 * round..16 * round + 16]);
    }

    for byte in state.iter_mut() {
        *byte = sub_byte(api, *byte);
    }
    state = shift_rows(&state);
    add_round_key(api, &state, &xk[160..176])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WitnessBuilder;

    fn alloc_block(api: &mut WitnessBuilder, data: &[u8]) -> Vec<U8> {
        data.iter().map(|&b| U8::constant(api, b)).collect()
    }

    fn byte_value(api: &WitnessBuilder, b: U8) -> u8 {
        let mut v = 0u8;
        for (i, bit) in b.bits.iter().enumerate() {
            v |= (api.assignment_of(*bit) as u8) << i;
        }
        v
    }

    #[test]
    fn sbox_mux_selects_table_entries() {
        let mut api = WitnessBuilder::new();
        for input in [0x00u8, 0x01, 0x53, 0x7F, 0x80, 0xA5, 0xFF] {
            let b = U8::constant(&mut api, input);
            let s = sub_byte(&mut api, b);
            assert_eq!(byte_value(&api, s), SBOX[input as usize]);
        }
        assert!(api.check().is_ok());
    }

    #[test]
    fn fips197_appendix_c_vector() {
        // FIPS-197 C.1: key 000102...0f, plaintext 00112233...eeff
        let key: Vec<u8> = (0u8..16).collect();
        let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();

        let mut api = WitnessBuilder::new();
        let key_bytes: [U8; 16] = alloc_block(&mut api, &key).try_into().unwrap();
        let pt_bytes: [U8; 16] = alloc_block(&mut api, &pt).try_into().unwrap();

        let xk = expand_key(&mut api, &key_bytes);
        let ct = encrypt_block(&mut api, &xk, &pt_bytes);

        let got: Vec<u8> = ct.iter().map(|&b| byte_value(&api, b)).collect();
        assert_eq!(hex::encode(got), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert!(api.check().is_ok());
    }

    #[test]
    fn key_schedule_first_round_key() {
        // FIPS-197 A.1: w4..w7 for key 2b7e151628aed2a6abf7158809cf4f3c
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let mut api = WitnessBuilder::new();
        let key_bytes: [U8; 16] = alloc_block(&mut api, &key).try_into().unwrap();
        let xk = expand_key(&mut api, &key_bytes);
        let round1: Vec<u8> = xk[16..32].iter().map(|&b| byte_value(&api, b)).collect();
        assert_eq!(hex::encode(round1), "a0fafe1788542cb123a339392a6c7605");
    }

    #[test]
    fn encryption_matches_reference_for_random_inputs() {
        use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};

        let key = hex::decode("2872658573f95e87550cb26374e5f667").unwrap();
        let pt = hex::decode("a54613bf2801a84ce693d0a000000001").unwrap();

        let reference = aes::Aes128::new(GenericArray::from_slice(&key));
        let mut expected = GenericArray::clone_from_slice(&pt);
        reference.encrypt_block(&mut expected);

        let mut api = WitnessBuilder::new();
        let key_bytes: [U8; 16] = alloc_block(&mut api, &key).try_into().unwrap();
        let pt_bytes: [U8; 16] = alloc_block(&mut api, &pt).try_into().unwrap();
        let xk = expand_key(&mut api, &key_bytes);
        let ct = encrypt_block(&mut api, &xk, &pt_bytes);

        let got: Vec<u8> = ct.iter().map(|&b| byte_value(&api, b)).collect();
        assert_eq!(got, expected.to_vec());
    }
}
