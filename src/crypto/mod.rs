//! Encryption module
//!
//! Passphrase-to-key derivation and the AES-256-GCM transform applied to
//! whole file contents.

mod cipher;
mod key;

pub use cipher::*;
pub use key::*;
