//! AES-256-GCM seal/open
//!
//! Blob layout, with no header or version byte:
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//! Changing the algorithm would make existing blobs unreadable.

use crate::crypto::SymmetricKey;
use crate::error::{DircryptError, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

/// Nonce size in bytes (96-bit GCM nonce)
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Total bytes a sealed blob adds on top of the plaintext
pub const SEAL_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

fn cipher_for(key: &SymmetricKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext` under `key`.
///
/// A fresh nonce is drawn from the OS RNG on every call, so sealing the same
/// plaintext twice gives different blobs. No associated data is bound.
///
/// Returns: `[12-byte nonce][ciphertext][16-byte tag]`
pub fn seal(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| DircryptError::Encryption(format!("nonce generation failed: {e}")))?;

    let sealed = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| DircryptError::Encryption(e.to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// Fails with `MalformedInput` when the blob cannot even hold a nonce, and
/// with `AuthenticationFailure` for a wrong key, tampering, or a blob that
/// was truncated or extended past the nonce.
pub fn open(key: &SymmetricKey, blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < NONCE_SIZE {
        return Err(DircryptError::MalformedInput {
            len: blob.len(),
            min: NONCE_SIZE,
        });
    }

    let (nonce_bytes, sealed) = blob.split_at(NONCE_SIZE);

    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| DircryptError::AuthenticationFailure)
}
