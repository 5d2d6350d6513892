//! # DirCrypt - Parallel Directory Encryption
//!
//! DirCrypt bulk-encrypts or bulk-decrypts the files of a directory tree
//! with AES-256-GCM, spreading the per-file work over a fixed pool of
//! worker threads.
//!
//! ## Pipeline
//!
//! - **Key**: SHA-256 of the passphrase, derived once and shared read-only
//! - **Producer**: walks the tree and queues `.txt`/`.md` files (encrypt)
//!   or `.enc` files (decrypt)
//! - **Queue**: bounded channel; closing it is the only stop signal
//! - **Workers**: each claimed file is read, sealed or opened, written to
//!   its new name, and only then is the source removed
//! - **Reporting**: every file yields one outcome for the configured sink
//!
//! ## Quick Start
//!
//! ```no_run
//! use dircrypt::config::Mode;
//! use dircrypt::core::process_directory;
//! use std::path::Path;
//!
//! let summary = process_directory(Path::new("./notes"), "passphrase", Mode::Encrypt).unwrap();
//! println!("Encrypted {} files", summary.files_processed);
//! ```
//!
//! ## Custom Reporting
//!
//! ```no_run
//! use dircrypt::config::{CryptConfig, Mode};
//! use dircrypt::core::CryptEngine;
//! use dircrypt::progress::CollectingSink;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! let config = CryptConfig {
//!     root: PathBuf::from("./notes"),
//!     mode: Mode::Decrypt,
//!     workers: 8,
//!     ..Default::default()
//! };
//!
//! let sink = Arc::new(CollectingSink::new());
//! let summary = CryptEngine::new(config, "passphrase")
//!     .with_sink(sink.clone())
//!     .execute()
//!     .unwrap();
//!
//! for outcome in sink.take_outcomes() {
//!     if let Err(e) = &outcome.result {
//!         eprintln!("{}: {}", outcome.path.display(), e);
//!     }
//! }
//! summary.print_summary();
//! ```
//!
//! ## Limitations
//!
//! - Whole files are held in memory while they are processed.
//! - The key derivation is a single fast hash, not a password KDF.
//! - Blobs carry no header or version; the format is fixed to
//!   `nonce || ciphertext || tag`.
//! - A crash between writing the output and deleting the source leaves
//!   both files on disk.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod progress;

// Re-export commonly used types
pub use config::{CryptConfig, Mode, WriteStrategy};
pub use core::{CryptEngine, RunSummary};
pub use error::{DircryptError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use dircrypt::prelude::*;
    //! ```

    pub use crate::config::{CryptConfig, Mode, WriteStrategy};
    pub use crate::core::{process_directory, CryptEngine, FileOutcome, RunSummary};
    pub use crate::crypto::{open, seal, SymmetricKey};
    pub use crate::error::{DircryptError, Result};
    pub use crate::fs::{select_paths, FileCodec};
    pub use crate::progress::{CollectingSink, ConsoleReporter, OutcomeSink};
}
