//! End-to-end session proof: key schedule, tag binding, record disclosure

use crate::builder::ConstraintApi;
use crate::circuits::{AuthTagInputs, CircuitError, KdcInputs, RecordStatement};

/// The full pipeline in one proof: derive the traffic key from the
/// handshake mid-state, bind it to the record's authentication tag, and
/// establish the disclosure statement on the decrypted window.
///
/// This is the largest circuit in the crate; the key schedule alone runs
/// four SHA-256 compressions before the AES work starts.
#[derive(Debug, Clone)]
pub struct Oracle {
    pub kdc: KdcInputs,
    pub tag: AuthTagInputs,
    pub plaintext: Vec<u8>,
    pub statement: RecordStatement,
}

impl Oracle {
    pub fn define<B: ConstraintApi>(&self, api: &mut B) -> Result<(), CircuitError> {
        self.statement.validate(self.plaintext.len())?;
        let tk = self.kdc.derive(api);
        self.tag.assert_with_key(api, &tk);
        self.statement.assert_with_key(api, &tk, &self.plaintext)
    }
}
