//! Disclose record data under a previously committed key

use crate::builder::ConstraintApi;
use crate::circuits::{
    alloc_bytes_private, assert_key_commitment, CircuitError, RecordStatement,
};
use crate::gadgets::bits::U8;

/// Prove a record statement under a key whose SHA-256 commitment was
/// published by an earlier [`super::SessionCommit`] proof.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub key: [u8; 16],
    pub commitment: [u8; 32],
    pub plaintext: Vec<u8>,
    pub statement: RecordStatement,
}

impl SessionData {
    pub fn define<B: ConstraintApi>(&self, api: &mut B) -> Result<(), CircuitError> {
        self.statement.validate(self.plaintext.len())?;
        let key: [U8; 16] = alloc_bytes_private(api, &self.key)
            .try_into()
            .unwrap_or_else(|_| unreachable!());
        assert_key_commitment(api, &key, &self.commitment);
        self.statement.assert_with_key(api, &key, &self.plaintext)
    }
}
