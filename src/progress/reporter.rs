//! Outcome reporting
//!
//! Workers hand every per-file outcome to an [`OutcomeSink`]. The console
//! sink prints the operator status lines, optionally under an indicatif
//! spinner; the collecting sink keeps outcomes in memory.

use crate::core::FileOutcome;
use crate::error::DircryptError;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Receives per-file outcomes and traversal errors
///
/// Called concurrently from every worker and from the producer thread.
pub trait OutcomeSink: Send + Sync {
    /// A claimed file finished, successfully or not
    fn file_done(&self, outcome: FileOutcome);

    /// The directory walk could not access `path`
    fn traversal_failed(&self, path: &Path, error: &DircryptError);
}

/// Prints one status line per file
pub struct ConsoleReporter {
    /// Spinner, hidden unless progress is enabled
    spinner: ProgressBar,
    /// Suppress success lines
    quiet: bool,
    processed: AtomicU64,
    failed: AtomicU64,
}

impl ConsoleReporter {
    /// Plain status lines, no spinner
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_draw_target(ProgressDrawTarget::hidden());

        Self {
            spinner,
            quiet: false,
            processed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Status lines printed above a live spinner
    pub fn with_spinner() -> Self {
        let reporter = Self::new();
        reporter.spinner.set_draw_target(ProgressDrawTarget::stderr());
        reporter.spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        reporter.spinner.enable_steady_tick(Duration::from_millis(120));
        reporter
    }

    /// Only print failures
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Stop the spinner, leaving the final counts
    pub fn finish(&self) {
        self.spinner.finish_with_message(self.counts_message());
    }

    fn counts_message(&self) -> String {
        format!(
            "{} processed, {} failed",
            self.processed.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }

    fn line(&self, text: String) {
        if self.spinner.is_hidden() {
            println!("{}", text);
        } else {
            self.spinner.println(text);
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeSink for ConsoleReporter {
    fn file_done(&self, outcome: FileOutcome) {
        match &outcome.result {
            Ok(_) => {
                self.processed.fetch_add(1, Ordering::Relaxed);
                if !self.quiet {
                    self.line(format!(
                        "Successfully processed file: {}",
                        outcome.path.display()
                    ));
                }
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.line(format!(
                    "Failed to process file {}: {}",
                    outcome.path.display(),
                    e
                ));
            }
        }
        self.spinner.set_message(self.counts_message());
    }

    fn traversal_failed(&self, _path: &Path, error: &DircryptError) {
        self.line(error.to_string());
    }
}

/// Keeps every outcome in memory
#[derive(Default)]
pub struct CollectingSink {
    outcomes: Mutex<Vec<FileOutcome>>,
    traversal_errors: Mutex<Vec<PathBuf>>,
}

impl CollectingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all file outcomes recorded so far
    pub fn take_outcomes(&self) -> Vec<FileOutcome> {
        match self.outcomes.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Paths the walk failed to access
    pub fn traversal_errors(&self) -> Vec<PathBuf> {
        match self.traversal_errors.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OutcomeSink for CollectingSink {
    fn file_done(&self, outcome: FileOutcome) {
        if let Ok(mut guard) = self.outcomes.lock() {
            guard.push(outcome);
        }
    }

    fn traversal_failed(&self, path: &Path, _error: &DircryptError) {
        if let Ok(mut guard) = self.traversal_errors.lock() {
            guard.push(path.to_path_buf());
        }
    }
}

/// Discards everything
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn file_done(&self, _outcome: FileOutcome) {}

    fn traversal_failed(&self, _path: &Path, _error: &DircryptError) {}
}
