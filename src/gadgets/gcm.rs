//! AES-GCM keystream assertions over block-aligned records
//!
//! Only the CTR keystream half of GCM lives in the circuit: each 16-byte
//! block of ciphertext must equal the matching plaintext block XOR
//! `Encrypt(key, nonce ‖ BE32(chunkIndex + i))`. The GHASH tag combination
//! is checked separately through the ECB assertions in `authtag`.
//!
//! The chunk index is an in-circuit variable so a prover can open a window
//! anywhere in a long record; block counters derive from it by field
//! addition followed by a 32-bit decomposition.

use p3_field::AbstractField;

use crate::builder::{ConstraintApi, Var};
use crate::gadgets::aes128::{encrypt_block, expand_key};
use crate::gadgets::bits::{assert_u8_equal, xor_u8, U8};
use crate::F;

/// Build the 16-byte GCM counter block `nonce ‖ BE32(count)`.
///
/// `count` is decomposed to 32 bits and re-composed back-to-front so the
/// most significant byte lands at counter position 12.
pub fn counter_block<B: ConstraintApi>(api: &mut B, nonce: &[U8; 12], count: Var) -> [U8; 16] {
    let bits = api.to_binary(count, 32);
    let mut block = [U8 { bits: [Var(0); 8] }; 16];
    block[..12].copy_from_slice(nonce);
    for j in 0..4 {
        let lo = (3 - j) * 8;
        let mut byte = [Var(0); 8];
        byte.copy_from_slice(&bits[lo..lo + 8]);
        block[12 + j] = U8 { bits: byte };
    }
    block
}

/// Assert that `ciphertext` is the CTR encryption of `plaintext` starting
/// at block counter `chunk_index`.
///
/// Both slices must be equal length and a multiple of 16 bytes; the
/// composition layer rejects anything else before reaching this gadget.
/// The key schedule is expanded once and shared across all blocks.
pub fn assert_keystream<B: ConstraintApi>(
    api: &mut B,
    key: &[U8; 16],
    nonce: &[U8; 12],
    chunk_index: Var,
    plaintext: &[U8],
    ciphertext: &[U8],
) {
    debug_assert_eq!(plaintext.len(), ciphertext.len());
    debug_assert_eq!(plaintext.len() % 16, 0);

    let xk = expand_key(api, key);
    for (i, (pt, ct)) in plaintext
        .chunks_exact(16)
        .zip(ciphertext.chunks_exact(16))
        .enumerate()
    {
        let offset = api.constant(F::from_canonical_u32(i as u32));
        let count = api.add(chunk_index, offset);
        let counter = counter_block(api, nonce, count);
        let keystream = encrypt_block(api, &xk, &counter);
        for j in 0..16 {
            let expected = xor_u8(api, pt[j], keystream[j]);
            assert_u8_equal(api, expected, ct[j]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WitnessBuilder;
    use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};

    fn alloc_bytes(api: &mut WitnessBuilder, data: &[u8]) -> Vec<U8> {
        data.iter().map(|&b| U8::constant(api, b)).collect()
    }

    fn ctr_encrypt(key: &[u8], nonce: &[u8], chunk_index: u32, plaintext: &[u8]) -> Vec<u8> {
        let cipher = aes::Aes128::new(GenericArray::from_slice(key));
        let mut out = Vec::with_capacity(plaintext.len());
        for (i, block) in plaintext.chunks_exact(16).enumerate() {
            let mut counter = [0u8; 16];
            counter[..12].copy_from_slice(nonce);
            counter[12..].copy_from_slice(&(chunk_index + i as u32).to_be_bytes());
            let mut ks = GenericArray::clone_from_slice(&counter);
            cipher.encrypt_block(&mut ks);
            for (p, k) in block.iter().zip(ks.iter()) {
                out.push(p ^ k);
            }
        }
        out
    }

    #[test]
    fn session_record_keystream_is_satisfied() {
        let key = hex::decode("2872658573f95e87550cb26374e5f667").unwrap();
        let nonce = hex::decode("a54613bf2801a84ce693d0a0").unwrap();
        let plaintext =
            hex::decode("302c353631204575726f227d2c227072696365223a2233383030322e32222c22")
                .unwrap();
        let ciphertext = ctr_encrypt(&key, &nonce, 32, &plaintext);
        assert_eq!(
            hex::encode(&ciphertext),
            "419a031754a4897806533c6020e9130f6088747b9f9a1e1eba4cb0518a6d5692"
        );

        let mut api = WitnessBuilder::new();
        let key_bytes: [U8; 16] = alloc_bytes(&mut api, &key).try_into().unwrap();
        let nonce_bytes: [U8; 12] = alloc_bytes(&mut api, &nonce).try_into().unwrap();
        let chunk_index = api.constant(crate::F::from_canonical_u32(32));
        let pt = alloc_bytes(&mut api, &plaintext);
        let ct = alloc_bytes(&mut api, &ciphertext);

        assert_keystream(&mut api, &key_bytes, &nonce_bytes, chunk_index, &pt, &ct);
        assert!(api.check().is_ok());
    }

    #[test]
    fn single_bit_flip_breaks_satisfiability() {
        let key = hex::decode("2872658573f95e87550cb26374e5f667").unwrap();
        let nonce = hex::decode("a54613bf2801a84ce693d0a0").unwrap();
        let plaintext = [0x42u8; 32];
        let mut ciphertext = ctr_encrypt(&key, &nonce, 5, &plaintext);
        ciphertext[17] ^= 0x04;

        let mut api = WitnessBuilder::new();
        let key_bytes: [U8; 16] = alloc_bytes(&mut api, &key).try_into().unwrap();
        let nonce_bytes: [U8; 12] = alloc_bytes(&mut api, &nonce).try_into().unwrap();
        let chunk_index = api.constant(crate::F::from_canonical_u32(5));
        let pt = alloc_bytes(&mut api, &plaintext);
        let ct = alloc_bytes(&mut api, &ciphertext);

        assert_keystream(&mut api, &key_bytes, &nonce_bytes, chunk_index, &pt, &ct);
        assert!(api.check().is_err());
    }

    #[test]
    fn counter_block_places_index_big_endian() {
        let mut api = WitnessBuilder::new();
        let nonce_raw = [0xAAu8; 12];
        let nonce: [U8; 12] = alloc_bytes(&mut api, &nonce_raw).try_into().unwrap();
        let count = api.constant(crate::F::from_canonical_u32(0x01020304));
        let block = counter_block(&mut api, &nonce, count);

        let bytes: Vec<u8> = block
            .iter()
            .map(|b| {
                let mut v = 0u8;
                for (i, bit) in b.bits.iter().enumerate() {
                    v |= (api.assignment_of(*bit) as u8) << i;
                }
                v
            })
            .collect();
        assert_eq!(&bytes[..12], &nonce_raw);
        assert_eq!(&bytes[12..], &[0x01, 0x02, 0x03, 0x04]);
    }
}
