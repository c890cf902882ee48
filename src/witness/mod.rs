//! Native witness-side crypto
//!
//! Everything a prover computes outside the constraint system before
//! assembling a circuit: record encryption, SHA-256 mid-states, and the
//! traffic-key derivation chain. These mirror the gadget semantics exactly
//! and back the evaluation harness and the integration tests.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use sha2::digest::generic_array::GenericArray as ShaBlock;
use sha2::{compress256, Digest, Sha256};

/// SHA-256 padding for a message of `len` bytes: `0x80`, zeros to 56 mod
/// 64, then the big-endian 64-bit bit length.
pub fn pad_sha256(len: u64) -> Vec<u8> {
    let rem = (len % 64) as usize;
    let pad_len = if rem < 56 { 56 - rem } else { 120 - rem };
    let mut pad = vec![0u8; pad_len];
    pad[0] = 0x80;
    pad.extend_from_slice(&(len * 8).to_be_bytes());
    pad
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compress whole blocks starting from `state`, returning the new state as
/// big-endian bytes. `data.len()` must be a multiple of 64.
pub fn resume_state(state: &[u8; 32], data: &[u8]) -> [u8; 32] {
    debug_assert_eq!(data.len() % 64, 0);
    let mut words = [0u32; 8];
    for (i, word) in words.iter_mut().enumerate() {
        let mut be = [0u8; 4];
        be.copy_from_slice(&state[4 * i..4 * i + 4]);
        *word = u32::from_be_bytes(be);
    }
    let blocks: Vec<_> = data
        .chunks_exact(64)
        .map(ShaBlock::clone_from_slice)
        .collect();
    compress256(&mut words, &blocks);
    let mut out = [0u8; 32];
    for (i, word) in words.iter().enumerate() {
        out[4 * i..4 * i + 4].copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// SHA-256 state after absorbing `data` from the standard IV, without
/// padding. Used to hand a resumable mid-state to the circuits.
pub fn intermediate_state(data: &[u8]) -> [u8; 32] {
    const IV: [u8; 32] = [
        0x6a, 0x09, 0xe6, 0x67, 0xbb, 0x67, 0xae, 0x85, 0x3c, 0x6e, 0xf3, 0x72, 0xa5, 0x4f, 0xf5,
        0x3a, 0x51, 0x0e, 0x52, 0x7f, 0x9b, 0x05, 0x68, 0x8c, 0x1f, 0x83, 0xd9, 0xab, 0x5b, 0xe0,
        0xcd, 0x19,
    ];
    resume_state(&IV, data)
}

pub fn aes128_ecb(key: &[u8; 16], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut out = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut out);
    out.into()
}

/// CTR-encrypt a block-aligned record window starting at `chunk_index`,
/// with the GCM counter layout `nonce ‖ BE32(index)`.
pub fn encrypt_record(
    key: &[u8; 16],
    nonce: &[u8; 12],
    chunk_index: u32,
    plaintext: &[u8],
) -> Vec<u8> {
    debug_assert_eq!(plaintext.len() % 16, 0);
    let cipher = Aes128::new(GenericArray::from_slice(key));
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

/// `(secret ‖ 0^32) XOR 0x5c^64` followed by `next`.
pub fn opad_concat(secret: &[u8; 32], next: &[u8; 32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(96);
    for &b in secret.iter() {
        out.push(b ^ 0x5c);
    }
    out.extend(std::iter::repeat(0x5c).take(32));
    out.extend_from_slice(next);
    out
}

/// Append the padding that makes a 32-byte inner hash a complete final
/// block of a 96-byte message (one opad block plus the hash).
pub fn dhs_in_padded(dhs_in: &[u8; 32]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(dhs_in);
    let pad = pad_sha256(96);
    out[32..].copy_from_slice(&pad);
    out
}

/// Native mirror of the in-circuit key schedule: resume over the padded
/// inner hash, then three opad-concat-hash steps, truncated to 16 bytes.
pub fn derive_traffic_key(
    intermediate_hash_hs_opad: &[u8; 32],
    dhs_in: &[u8; 64],
    ms_in: &[u8; 32],
    xats_in: &[u8; 32],
    tk_xapp_in: &[u8; 32],
) -> [u8; 16] {
    let dhs = resume_state(intermediate_hash_hs_opad, dhs_in);

    let mut secret = dhs;
    for next in [ms_in, xats_in, tk_xapp_in] {
        secret = sha256(&opad_concat(&secret, next));
    }

    let mut tk = [0u8; 16];
    tk.copy_from_slice(&secret[..16]);
    tk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_lengths_cover_both_branches() {
        // 0 bytes: 0x80 + 55 zeros + 8 length bytes
        assert_eq!(pad_sha256(0).len(), 64);
        // 55 bytes: shortest padding
        assert_eq!(pad_sha256(55).len(), 9);
        // 56 bytes: padding spills into a second block
        assert_eq!(pad_sha256(56).len(), 72);
        assert_eq!(pad_sha256(96).len(), 32);
    }

    #[test]
    fn padded_hash_matches_digest() {
        let data = b"kdc derivation input";
        let mut padded = data.to_vec();
        padded.extend(pad_sha256(data.len() as u64));
        assert_eq!(intermediate_state(&padded), sha256(data));
    }

    #[test]
    fn traffic_key_matches_captured_session() {
        let ih: [u8; 32] =
            hex::decode("5113c2d6533a74ea90392417f726dc79c180819ad8a55bd809a5b38a0858b12f")
                .unwrap()
                .try_into()
                .unwrap();
        let dhs_in: [u8; 32] =
            hex::decode("dbd41fabc139fdc0252db510d6d61c4dd09bf913bf4b4534e7a3910d21a13b6b")
                .unwrap()
                .try_into()
                .unwrap();
        let ms_in: [u8; 32] =
            hex::decode("9be88f33141755dcc1846795217f8cd632559771fbd75fb45033ae0e3adfeefa")
                .unwrap()
                .try_into()
                .unwrap();
        let xats_in: [u8; 32] =
            hex::decode("dae6d4b1df8df6e1ccb7d90463601475c70c4958ad98c2de07141f8baf77390b")
                .unwrap()
                .try_into()
                .unwrap();
        let tk_xapp_in: [u8; 32] =
            hex::decode("2feeba2461c64d98bd39a71ee1f20e59e7d85b3d99ad6a0e4fc8e29c3d9e8e0a")
                .unwrap()
                .try_into()
                .unwrap();

        let tk = derive_traffic_key(&ih, &dhs_in_padded(&dhs_in), &ms_in, &xats_in, &tk_xapp_in);
        assert_eq!(hex::encode(tk), "2872658573f95e87550cb26374e5f667");
        assert_eq!(
            hex::encode(sha256(&tk)),
            "e9c300234adbf690e81334e79d0c82b4e3a76a77d647c8d19df5968dc57248ba"
        );
    }

    #[test]
    fn record_encryption_matches_captured_ciphertext() {
        let key: [u8; 16] = hex::decode("2872658573f95e87550cb26374e5f667")
            .unwrap()
            .try_into()
            .unwrap();
        let nonce: [u8; 12] = hex::decode("a54613bf2801a84ce693d0a0")
            .unwrap()
            .try_into()
            .unwrap();
        let plaintext =
            hex::decode("302c353631204575726f227d2c227072696365223a2233383030322e32222c22")
                .unwrap();
        let ct = encrypt_record(&key, &nonce, 32, &plaintext);
        assert_eq!(
            hex::encode(ct),
            "419a031754a4897806533c6020e9130f6088747b9f9a1e1eba4cb0518a6d5692"
        );
    }

    #[test]
    fn tag_blocks_match_captured_session() {
        let key: [u8; 16] = hex::decode("2872658573f95e87550cb26374e5f667")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(
            hex::encode(aes128_ecb(&key, &[0u8; 16])),
            "1c9c7c260c39bcb8dcfa5fbc9330b9fa"
        );
        let mut j0 = [0u8; 16];
        j0[..12].copy_from_slice(&hex::decode("a54613bf2801a84ce693d0a0").unwrap());
        j0[12..].copy_from_slice(&1u32.to_be_bytes());
        assert_eq!(
            hex::encode(aes128_ecb(&key, &j0)),
            "a5cd49b7c29ad21fedbcedc01e0f13e8"
        );
    }
}
