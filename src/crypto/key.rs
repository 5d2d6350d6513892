//! Key derivation
//!
//! The symmetric key is the SHA-256 digest of the passphrase. This is a fast
//! hash, not a password-hashing function, so brute-force resistance is only
//! as good as the passphrase. Existing ciphertexts depend on this exact
//! derivation, so switching to a slow KDF would be a format change.

use sha2::{Digest, Sha256};
use std::fmt;

/// Key size in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key
///
/// Created once before the worker pool starts and shared read-only by every
/// worker. The bytes are zeroed when the key is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey {
    key: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Derive a key from a passphrase
    ///
    /// Deterministic: the same passphrase always yields the same key. Empty
    /// passphrases are accepted here; the configuration layer rejects them.
    pub fn derive(passphrase: &[u8]) -> Self {
        Self {
            key: derive_key(passphrase),
        }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { key: bytes }
    }

    /// Get key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        // Zero out key on drop
        for byte in &mut self.key {
            *byte = 0;
        }
    }
}

/// Hash a passphrase into raw key bytes
pub fn derive_key(passphrase: &[u8]) -> [u8; KEY_SIZE] {
    Sha256::digest(passphrase).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = SymmetricKey::derive(b"mykey");
        let b = SymmetricKey::derive(b"mykey");
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), KEY_SIZE);
    }

    #[test]
    fn test_different_passphrases_differ() {
        let a = SymmetricKey::derive(b"mykey");
        let b = SymmetricKey::derive(b"mykey2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_vector() {
        // SHA-256("abc")
        let key = derive_key(b"abc");
        assert_eq!(key[..4], [0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(key[28..], [0xf2, 0x00, 0x15, 0xad]);
    }

    #[test]
    fn test_debug_redacts() {
        let key = SymmetricKey::derive(b"secret");
        let shown = format!("{:?}", key);
        assert_eq!(shown, "SymmetricKey([REDACTED])");
    }
}
