//! Configuration settings for DirCrypt
//!
//! Defines the CLI arguments, the processing mode, and the runtime
//! configuration derived from them.

use crate::error::{DircryptError, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Suffix appended to encrypted files
pub const ENC_SUFFIX: &str = ".enc";

/// Suffixes selected for encryption
pub const PLAINTEXT_SUFFIXES: &[&str] = &[".txt", ".md"];

/// Default number of workers
pub const DEFAULT_WORKERS: usize = 4;

/// Job queue slots per worker when the depth is auto-sized
pub const QUEUE_SLOTS_PER_WORKER: usize = 4;

/// DirCrypt - bulk-encrypt or bulk-decrypt the files of a directory tree
#[derive(Parser, Debug, Clone)]
#[command(name = "dircrypt")]
#[command(author = "DirCrypt Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parallel AES-256-GCM encryption of directory trees")]
#[command(long_about = r#"
DirCrypt walks a directory tree and encrypts every .txt and .md file in place
(writing <file>.enc and removing the original), or decrypts every .enc file
back to its original name.

Examples:
  dircrypt --dir ./notes --key hunter2                  # Encrypt
  dircrypt --dir ./notes --key hunter2 --decrypt        # Decrypt
  dircrypt --dir ./notes --key hunter2 --workers 16     # More workers
"#)]
pub struct CliArgs {
    /// Directory to process
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub dir: PathBuf,

    /// Passphrase the key is derived from
    #[arg(long, env = "DIRCRYPT_KEY", hide_env_values = true, value_name = "STRING")]
    pub key: Option<String>,

    /// Decrypt .enc files instead of encrypting
    #[arg(long)]
    pub decrypt: bool,

    /// Number of parallel workers
    #[arg(long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub workers: usize,

    /// Job queue capacity (0 = workers x 4)
    #[arg(long, default_value_t = 0, value_name = "NUM")]
    pub queue_depth: usize,

    /// Write output to a temp file and rename it into place
    #[arg(long)]
    pub atomic: bool,

    /// Show a progress spinner
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Only print failures and the completion line
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose logging (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Whether the run encrypts or decrypts
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Seal .txt/.md files into .enc files
    #[default]
    Encrypt,
    /// Open .enc files back into their original names
    Decrypt,
}

impl Mode {
    /// Pick the mode from the `--decrypt` flag
    pub fn from_decrypt_flag(decrypt: bool) -> Self {
        if decrypt {
            Self::Decrypt
        } else {
            Self::Encrypt
        }
    }

    /// Does this mode process the file at `path`?
    ///
    /// Matches on the final path component only.
    pub fn selects(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.as_encoded_bytes();

        match self {
            Self::Encrypt => PLAINTEXT_SUFFIXES
                .iter()
                .any(|s| name.ends_with(s.as_bytes())),
            Self::Decrypt => name.ends_with(ENC_SUFFIX.as_bytes()),
        }
    }

    /// Where the transformed contents of `path` are written
    ///
    /// Encrypt appends `.enc`; decrypt strips it. Returns `None` when a
    /// decrypt input does not carry the suffix.
    pub fn output_path(&self, path: &Path) -> Option<PathBuf> {
        let name = path.file_name()?;

        match self {
            Self::Encrypt => {
                let mut out: OsString = name.to_os_string();
                out.push(ENC_SUFFIX);
                Some(path.with_file_name(out))
            }
            Self::Decrypt => {
                let stripped = strip_name_suffix(name, ENC_SUFFIX)?;
                if stripped.is_empty() {
                    return None;
                }
                Some(path.with_file_name(stripped))
            }
        }
    }

    /// Human-readable verb
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

/// Strip an ASCII `suffix` from a file name without requiring UTF-8
fn strip_name_suffix<'a>(name: &'a OsStr, suffix: &str) -> Option<&'a OsStr> {
    let bytes = name.as_encoded_bytes();
    let stripped = bytes.strip_suffix(suffix.as_bytes())?;
    // SAFETY: `stripped` comes from `name` and ends right before a non-empty
    // UTF-8 substring, which is a valid split point for encoded bytes.
    Some(unsafe { OsStr::from_encoded_bytes_unchecked(stripped) })
}

/// How output files are committed to disk
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteStrategy {
    /// Write the output path directly
    #[default]
    Direct,
    /// Write a sibling temp file, then rename it over the output path
    Atomic,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptConfig {
    /// Root directory to walk
    pub root: PathBuf,
    /// Encrypt or decrypt
    pub mode: Mode,
    /// Worker count
    pub workers: usize,
    /// Job queue capacity (0 = auto)
    pub queue_depth: usize,
    /// Output commit strategy
    pub write_strategy: WriteStrategy,
}

impl Default for CryptConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            mode: Mode::Encrypt,
            workers: DEFAULT_WORKERS,
            queue_depth: 0,
            write_strategy: WriteStrategy::Direct,
        }
    }
}

impl CryptConfig {
    /// Create config from CLI arguments
    ///
    /// The passphrase is not part of the config; see [`passphrase_from_cli`].
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let config = Self {
            root: args.dir.clone(),
            mode: Mode::from_decrypt_flag(args.decrypt),
            workers: args.workers,
            queue_depth: args.queue_depth,
            write_strategy: if args.atomic {
                WriteStrategy::Atomic
            } else {
                WriteStrategy::Direct
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the pool hang or do nothing
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DircryptError::config("worker count must be at least 1"));
        }
        Ok(())
    }

    /// Effective job queue capacity
    pub fn effective_queue_depth(&self) -> usize {
        if self.queue_depth == 0 {
            self.workers.max(1) * QUEUE_SLOTS_PER_WORKER
        } else {
            self.queue_depth
        }
    }
}

/// Extract the required passphrase
pub fn passphrase_from_cli(args: &CliArgs) -> Result<&str> {
    match args.key.as_deref() {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(DircryptError::config("The 'key' flag is required.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("dircrypt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse(&["--key", "k"]);
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(!args.decrypt);
        assert_eq!(args.workers, 4);

        let config = CryptConfig::from_cli(&args).unwrap();
        assert_eq!(config.mode, Mode::Encrypt);
        assert_eq!(config.write_strategy, WriteStrategy::Direct);
        assert_eq!(config.effective_queue_depth(), 16);
    }

    #[test]
    fn test_cli_full() {
        let args = parse(&[
            "--dir", "/data", "--key", "k", "--decrypt", "--workers", "8", "--queue-depth", "3",
            "--atomic",
        ]);
        let config = CryptConfig::from_cli(&args).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.mode, Mode::Decrypt);
        assert_eq!(config.workers, 8);
        assert_eq!(config.effective_queue_depth(), 3);
        assert_eq!(config.write_strategy, WriteStrategy::Atomic);
    }

    #[test]
    fn test_missing_or_empty_key() {
        let mut args = parse(&[]);
        args.key = None;
        assert!(passphrase_from_cli(&args).unwrap_err().is_fatal());

        args.key = Some(String::new());
        assert!(passphrase_from_cli(&args).is_err());

        args.key = Some("mykey".into());
        assert_eq!(passphrase_from_cli(&args).unwrap(), "mykey");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = parse(&["--key", "k", "--workers", "0"]);
        let err = CryptConfig::from_cli(&args).unwrap_err();
        assert!(matches!(err, DircryptError::Config(_)));
    }

    #[test]
    fn test_mode_selection() {
        let enc = Mode::Encrypt;
        assert!(enc.selects(Path::new("dir/a.txt")));
        assert!(enc.selects(Path::new("b.md")));
        assert!(!enc.selects(Path::new("c.enc")));
        assert!(!enc.selects(Path::new("d.bin")));
        assert!(!enc.selects(Path::new("a.txt.enc")));

        let dec = Mode::Decrypt;
        assert!(dec.selects(Path::new("a.txt.enc")));
        assert!(!dec.selects(Path::new("b.bin")));
        assert!(!dec.selects(Path::new("a.txt")));
    }

    #[test]
    fn test_output_paths() {
        assert_eq!(
            Mode::Encrypt.output_path(Path::new("dir/note.txt")),
            Some(PathBuf::from("dir/note.txt.enc"))
        );
        assert_eq!(
            Mode::Decrypt.output_path(Path::new("dir/note.txt.enc")),
            Some(PathBuf::from("dir/note.txt"))
        );
        assert_eq!(Mode::Decrypt.output_path(Path::new("dir/note.txt")), None);
        assert_eq!(Mode::Decrypt.output_path(Path::new("dir/.enc")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_round_trip() {
        use std::os::unix::ffi::OsStrExt;

        let plain = Path::new("dir").join(OsStr::from_bytes(b"caf\xe9.txt"));
        assert!(Mode::Encrypt.selects(&plain));

        let sealed = Mode::Encrypt.output_path(&plain).unwrap();
        assert_eq!(
            sealed.file_name().unwrap().as_bytes(),
            b"caf\xe9.txt.enc"
        );
        assert!(Mode::Decrypt.selects(&sealed));
        assert!(!Mode::Encrypt.selects(&sealed));

        assert_eq!(Mode::Decrypt.output_path(&sealed), Some(plain));
    }
}
