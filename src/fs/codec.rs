//! Per-file encrypt/decrypt
//!
//! Each operation is strictly read → transform → write → delete. The source
//! file is removed only after the output has been written, so any failure
//! before that point leaves the source untouched.
//!
//! With [`WriteStrategy::Direct`] a crash mid-write can leave a truncated
//! output next to the intact source, and a crash between write and delete
//! leaves both files. [`WriteStrategy::Atomic`] closes the first window by
//! renaming a fully written temp file into place; the second remains.

use crate::config::{Mode, WriteStrategy};
use crate::crypto::{open, seal, SymmetricKey};
use crate::error::{DircryptError, IoResultExt, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Result of processing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecStats {
    /// File that was written
    pub output: PathBuf,
    /// Bytes read from the source
    pub bytes_read: u64,
    /// Bytes written to the output
    pub bytes_written: u64,
}

/// Encrypts or decrypts single files with a shared key
#[derive(Debug, Clone, Copy)]
pub struct FileCodec<'k> {
    key: &'k SymmetricKey,
    strategy: WriteStrategy,
}

impl<'k> FileCodec<'k> {
    /// Create a codec that writes outputs directly
    pub fn new(key: &'k SymmetricKey) -> Self {
        Self {
            key,
            strategy: WriteStrategy::Direct,
        }
    }

    /// Set the output commit strategy
    pub fn with_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run the operation `mode` calls for on `path`
    pub fn process(&self, mode: Mode, path: &Path) -> Result<CodecStats> {
        match mode {
            Mode::Encrypt => self.encrypt_file(path),
            Mode::Decrypt => self.decrypt_file(path),
        }
    }

    /// Seal `path` into `path.enc`, then remove `path`
    pub fn encrypt_file(&self, path: &Path) -> Result<CodecStats> {
        let output = Mode::Encrypt
            .output_path(path)
            .ok_or_else(|| invalid_name(path))?;

        let plaintext = std::fs::read(path).with_path(path)?;
        let blob = seal(self.key, &plaintext)?;

        self.commit(path, &output, &blob)?;

        Ok(CodecStats {
            output,
            bytes_read: plaintext.len() as u64,
            bytes_written: blob.len() as u64,
        })
    }

    /// Open `name.enc` into `name`, then remove `name.enc`
    pub fn decrypt_file(&self, path: &Path) -> Result<CodecStats> {
        let output = Mode::Decrypt
            .output_path(path)
            .ok_or_else(|| invalid_name(path))?;

        let blob = std::fs::read(path).with_path(path)?;
        let plaintext = open(self.key, &blob)?;

        self.commit(path, &output, &plaintext)?;

        Ok(CodecStats {
            output,
            bytes_read: blob.len() as u64,
            bytes_written: plaintext.len() as u64,
        })
    }

    /// Write `data` to `output`, then delete `source`. Delete is always last.
    fn commit(&self, source: &Path, output: &Path, data: &[u8]) -> Result<()> {
        match self.strategy {
            WriteStrategy::Direct => std::fs::write(output, data).with_path(output)?,
            WriteStrategy::Atomic => write_atomic(output, data)?,
        }

        std::fs::remove_file(source).with_path(source)
    }
}

/// Write through a sibling temp file and rename it over `output`
fn write_atomic(output: &Path, data: &[u8]) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).with_path(dir)?;
    tmp.write_all(data).with_path(tmp.path())?;
    tmp.as_file().sync_all().with_path(tmp.path())?;
    tmp.persist(output)
        .map_err(|e| DircryptError::io(output, e.error))?;

    Ok(())
}

fn invalid_name(path: &Path) -> DircryptError {
    DircryptError::io(
        path,
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot derive output file name",
        ),
    )
}

/// Encrypt a single file with default settings
pub fn encrypt_file(path: &Path, key: &SymmetricKey) -> Result<CodecStats> {
    FileCodec::new(key).encrypt_file(path)
}

/// Decrypt a single file with default settings
pub fn decrypt_file(path: &Path, key: &SymmetricKey) -> Result<CodecStats> {
    FileCodec::new(key).decrypt_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{NONCE_SIZE, TAG_SIZE};
    use tempfile::TempDir;

    #[test]
    fn test_encrypt_then_decrypt() {
        let dir = TempDir::new().unwrap();
        let note = dir.path().join("note.txt");
        std::fs::write(&note, b"hello world").unwrap();
        let key = SymmetricKey::derive(b"mykey");

        let stats = encrypt_file(&note, &key).unwrap();
        let enc = dir.path().join("note.txt.enc");
        assert_eq!(stats.output, enc);
        assert_eq!(stats.bytes_read, 11);
        assert!(!note.exists());
        assert_eq!(
            std::fs::metadata(&enc).unwrap().len() as usize,
            NONCE_SIZE + 11 + TAG_SIZE
        );

        let stats = decrypt_file(&enc, &key).unwrap();
        assert_eq!(stats.output, note);
        assert!(!enc.exists());
        assert_eq!(std::fs::read(&note).unwrap(), b"hello world");
    }

    #[test]
    fn test_atomic_strategy() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("doc.md");
        std::fs::write(&doc, b"# title").unwrap();
        let key = SymmetricKey::derive(b"k");
        let codec = FileCodec::new(&key).with_strategy(WriteStrategy::Atomic);

        codec.process(Mode::Encrypt, &doc).unwrap();
        let enc = dir.path().join("doc.md.enc");
        assert!(enc.exists());
        assert!(!doc.exists());

        codec.process(Mode::Decrypt, &enc).unwrap();
        assert_eq!(std::fs::read(&doc).unwrap(), b"# title");

        // Only the restored file remains; no temp files left behind
        let names: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_wrong_key_leaves_source_untouched() {
        let dir = TempDir::new().unwrap();
        let note = dir.path().join("a.txt");
        std::fs::write(&note, b"secret").unwrap();

        encrypt_file(&note, &SymmetricKey::derive(b"right")).unwrap();
        let enc = dir.path().join("a.txt.enc");
        let before = std::fs::read(&enc).unwrap();

        let err = decrypt_file(&enc, &SymmetricKey::derive(b"wrong")).unwrap_err();
        assert!(err.is_authentication_failure());
        assert_eq!(std::fs::read(&enc).unwrap(), before);
        assert!(!note.exists());
    }

    #[test]
    fn test_short_blob_is_malformed() {
        let dir = TempDir::new().unwrap();
        let enc = dir.path().join("short.txt.enc");
        std::fs::write(&enc, b"tiny").unwrap();

        let err = decrypt_file(&enc, &SymmetricKey::derive(b"k")).unwrap_err();
        assert!(matches!(err, DircryptError::MalformedInput { len: 4, .. }));
        assert!(enc.exists());
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.txt");

        let err = encrypt_file(&missing, &SymmetricKey::derive(b"k")).unwrap_err();
        assert!(matches!(err, DircryptError::Io { .. }));
        assert_eq!(err.path(), Some(&missing));
        assert!(!dir.path().join("gone.txt.enc").exists());
    }

    #[test]
    fn test_decrypt_requires_suffix() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, b"data").unwrap();

        let err = decrypt_file(&plain, &SymmetricKey::derive(b"k")).unwrap_err();
        assert!(matches!(err, DircryptError::Io { .. }));
        assert!(plain.exists());
    }
}
