//! Error types for DirCrypt
//!
//! Every per-file failure is one of these variants. Only configuration and
//! thread-pool errors are fatal to a run; the rest are reported against the
//! file that produced them and the pipeline moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for DirCrypt operations
#[derive(Error, Debug)]
pub enum DircryptError {
    /// Invalid or missing start-up configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The directory walk could not access a path
    #[error("Error accessing path \"{path}\": {message}")]
    Traversal { path: PathBuf, message: String },

    /// Read, write or delete failure for a specific file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Blob is too short to contain a nonce
    #[error("Malformed input: ciphertext too short ({len} bytes, need at least {min})")]
    MalformedInput { len: usize, min: usize },

    /// Tag verification failed: wrong key or tampered data
    #[error("Authentication failed: wrong key or corrupted data")]
    AuthenticationFailure,

    /// The cipher refused to seal the plaintext
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// A worker thread could not be started or terminated abnormally
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl DircryptError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a traversal error
    pub fn traversal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Errors that abort the whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::ThreadPool(_))
    }

    /// Wrong key or tampering, as opposed to a filesystem problem
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::Traversal { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for DirCrypt operations
pub type Result<T> = std::result::Result<T, DircryptError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| DircryptError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DircryptError::io("/test/path", io_err);
        assert_eq!(err.path(), Some(&PathBuf::from("/test/path")));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatality() {
        assert!(DircryptError::config("missing key").is_fatal());
        assert!(DircryptError::ThreadPool("spawn".into()).is_fatal());
        assert!(!DircryptError::AuthenticationFailure.is_fatal());
        assert!(!DircryptError::MalformedInput { len: 3, min: 12 }.is_fatal());
        assert!(!DircryptError::traversal("/x", "denied").is_fatal());
    }

    #[test]
    fn test_auth_failure_is_distinct_from_io() {
        let auth = DircryptError::AuthenticationFailure;
        let io = DircryptError::io(
            "/a",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(auth.is_authentication_failure());
        assert!(!io.is_authentication_failure());
        assert_ne!(auth.to_string(), io.to_string());
    }

    #[test]
    fn test_traversal_message_quotes_path() {
        let err = DircryptError::traversal("/data/locked", "Permission denied");
        assert_eq!(
            err.to_string(),
            "Error accessing path \"/data/locked\": Permission denied"
        );
    }

    #[test]
    fn test_with_path() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result.with_path("/some/file").unwrap_err();
        assert_eq!(err.path(), Some(&PathBuf::from("/some/file")));
    }
}
