//! Commit to a derived traffic key before any record is disclosed

use crate::builder::ConstraintApi;
use crate::circuits::{
    assert_key_commitment, AuthTagInputs, CircuitError, KdcInputs,
};

/// Prove that a traffic key derived from the handshake mid-state hashes to
/// a public commitment and stands behind a record's authentication tag.
///
/// Publishing `SHA256(tk)` up front lets a later [`super::SessionData`]
/// proof reuse the same key without re-running the key schedule.
#[derive(Debug, Clone)]
pub struct SessionCommit {
    pub kdc: KdcInputs,
    pub commitment: [u8; 32],
    pub tag: AuthTagInputs,
}

impl SessionCommit {
    pub fn define<B: ConstraintApi>(&self, api: &mut B) -> Result<(), CircuitError> {
        let tk = self.kdc.derive(api);
        assert_key_commitment(api, &tk, &self.commitment);
        self.tag.assert_with_key(api, &tk);
        Ok(())
    }
}
