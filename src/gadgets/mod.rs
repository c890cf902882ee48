//! Constraint-emission gadgets
//!
//! Each submodule translates one cryptographic or parsing primitive into a
//! fixed topology of boolean/field constraints. Gadgets have no failure
//! modes of their own: correctness is enforced transitively by the equality
//! assertions of their callers, and shape misuse is a caller defect caught
//! at the composition layer before any constraints are emitted.

pub mod aes128;
pub mod authtag;
pub mod bits;
pub mod disclosure;
pub mod gcm;
pub mod kdc;
pub mod sha256;
