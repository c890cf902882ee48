//! Record decryption proofs with selective disclosure

use crate::builder::ConstraintApi;
use crate::circuits::{
    alloc_bytes_private, alloc_bytes_public, check_value_slice, AuthTagInputs, CircuitError,
};
use crate::gadgets::bits::U8;
use crate::gadgets::{disclosure, gcm};
use crate::F;
use p3_field::AbstractField;

/// Public statement about one ciphertext window: where it sits in the
/// record stream, which label must appear in the plaintext, and the
/// threshold its decimal value slice must clear.
#[derive(Debug, Clone)]
pub struct RecordStatement {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; 12],
    /// Block counter of the first ciphertext block within the record.
    pub chunk_index: u32,
    pub substring: Vec<u8>,
    pub substring_start: usize,
    pub value_start: usize,
    pub value_end: usize,
    pub threshold: u32,
}

impl RecordStatement {
    /// Reject malformed shapes before any constraint is emitted.
    pub fn validate(&self, plaintext_len: usize) -> Result<(), CircuitError> {
        if self.ciphertext.len() != plaintext_len {
            return Err(CircuitError::LengthMismatch {
                expected: self.ciphertext.len(),
                actual: plaintext_len,
            });
        }
        if plaintext_len % 16 != 0 {
            return Err(CircuitError::NotBlockAligned { len: plaintext_len });
        }
        if self.substring_start + self.substring.len() > plaintext_len {
            return Err(CircuitError::SliceOutOfBounds {
                start: self.substring_start,
                end: self.substring_start + self.substring.len(),
                len: plaintext_len,
            });
        }
        check_value_slice(self.value_start, self.value_end, plaintext_len)
    }

    /// Emit keystream, substring, and threshold constraints for a key that
    /// was allocated (or derived) elsewhere in the circuit.
    pub(crate) fn assert_with_key<B: ConstraintApi>(
        &self,
        api: &mut B,
        key: &[U8; 16],
        plaintext: &[u8],
    ) -> Result<(), CircuitError> {
        self.validate(plaintext.len())?;

        let nonce: [U8; 12] = alloc_bytes_public(api, &self.nonce)
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        let chunk_index = api.alloc_public(F::from_canonical_u32(self.chunk_index));
        let pt = alloc_bytes_private(api, plaintext);
        let ct = alloc_bytes_public(api, &self.ciphertext);
        gcm::assert_keystream(api, key, &nonce, chunk_index, &pt, &ct);

        let needle = alloc_bytes_public(api, &self.substring);
        disclosure::substring_match(api, &pt, &needle, self.substring_start);

        let value = disclosure::string_to_int(api, &pt[self.value_start..self.value_end]);
        let threshold = api.alloc_public(F::from_canonical_u32(self.threshold));
        disclosure::greater_than(api, value, threshold);
        Ok(())
    }
}

/// Prove knowledge of a key and plaintext behind a public ciphertext
/// window, with the disclosure statement holding on the plaintext.
#[derive(Debug, Clone)]
pub struct RecordVerify {
    pub key: [u8; 16],
    pub plaintext: Vec<u8>,
    pub statement: RecordStatement,
}

impl RecordVerify {
    pub fn define<B: ConstraintApi>(&self, api: &mut B) -> Result<(), CircuitError> {
        self.statement.validate(self.plaintext.len())?;
        let key: [U8; 16] = alloc_bytes_private(api, &self.key)
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        self.statement.assert_with_key(api, &key, &self.plaintext)
    }
}

/// [`RecordVerify`] strengthened by the authentication-tag ECB checks, so
/// the proven key is the one that produced the record's GCM tag.
#[derive(Debug, Clone)]
pub struct AuthenticatedRecord {
    pub key: [u8; 16],
    pub plaintext: Vec<u8>,
    pub statement: RecordStatement,
    pub tag: AuthTagInputs,
}

impl AuthenticatedRecord {
    pub fn define<B: ConstraintApi>(&self, api: &mut B) -> Result<(), CircuitError> {
        self.statement.validate(self.plaintext.len())?;
        let key: [U8; 16] = alloc_bytes_private(api, &self.key)
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        self.tag.assert_with_key(api, &key);
        self.statement.assert_with_key(api, &key, &self.plaintext)
    }
}
