//! Pipeline engine
//!
//! Derives the key once, starts the worker pool, runs the path producer on
//! the calling thread, and waits for every worker to drain the queue.
//! Per-file failures are counted, never propagated; only configuration and
//! thread-pool errors make [`CryptEngine::execute`] fail.

use crate::config::{CryptConfig, Mode};
use crate::core::{job_queue, PipelineStats, WorkerContext, WorkerPool};
use crate::crypto::SymmetricKey;
use crate::error::Result;
use crate::fs::PathProducer;
use crate::progress::{NullSink, OutcomeSink};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Totals for a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Encrypt or decrypt
    pub mode: Mode,
    /// Worker count used
    pub workers: usize,
    /// Files handed to the workers
    pub files_queued: u64,
    /// Files processed successfully
    pub files_processed: u64,
    /// Files that failed
    pub files_failed: u64,
    /// Of the failures, how many were wrong key or tampering
    pub auth_failures: u64,
    /// Entries the walk could not access
    pub traversal_errors: u64,
    /// Bytes read from processed files
    pub bytes_read: u64,
    /// Bytes written for processed files
    pub bytes_written: u64,
    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    /// No file or traversal failures
    pub fn is_clean(&self) -> bool {
        self.files_failed == 0 && self.traversal_errors == 0
    }

    /// Input bytes per second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.bytes_read as f64 / secs
        } else {
            0.0
        }
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== {} Summary ===", capitalize(self.mode.verb()));
        println!("Workers:         {}", self.workers);
        println!("Files processed: {}", self.files_processed);
        println!("Files failed:    {}", self.files_failed);
        if self.auth_failures > 0 {
            println!("  wrong key or tampered: {}", self.auth_failures);
        }
        if self.traversal_errors > 0 {
            println!("Walk errors:     {}", self.traversal_errors);
        }
        println!("Bytes read:      {}", humansize::format_size(self.bytes_read, humansize::BINARY));
        println!("Bytes written:   {}", humansize::format_size(self.bytes_written, humansize::BINARY));
        println!("Duration:        {:.2?}", self.duration);
        println!("Throughput:      {}/s", humansize::format_size(self.throughput() as u64, humansize::BINARY));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Bulk encrypt/decrypt engine
pub struct CryptEngine {
    /// Configuration
    config: CryptConfig,
    /// Key shared by every worker
    key: Arc<SymmetricKey>,
    /// Outcome sink
    sink: Arc<dyn OutcomeSink>,
}

impl CryptEngine {
    /// Create an engine, deriving the key from `passphrase`
    pub fn new(config: CryptConfig, passphrase: &str) -> Self {
        Self::with_key(config, SymmetricKey::derive(passphrase.as_bytes()))
    }

    /// Create an engine around an existing key
    pub fn with_key(config: CryptConfig, key: SymmetricKey) -> Self {
        Self {
            config,
            key: Arc::new(key),
            sink: Arc::new(NullSink),
        }
    }

    /// Set where per-file outcomes are reported
    pub fn with_sink(mut self, sink: Arc<dyn OutcomeSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &CryptConfig {
        &self.config
    }

    /// Run the pipeline to completion
    pub fn execute(&self) -> Result<RunSummary> {
        self.config.validate()?;
        let start_time = Instant::now();

        let workers = self.config.workers;
        let mode = self.config.mode;
        tracing::info!(
            "Starting {} of {:?} with {} workers",
            mode.verb(),
            self.config.root,
            workers
        );

        let (jobs_tx, jobs_rx) = job_queue(self.config.effective_queue_depth());
        let stats = Arc::new(PipelineStats::default());

        let ctx = WorkerContext {
            key: Arc::clone(&self.key),
            mode,
            strategy: self.config.write_strategy,
            sink: Arc::clone(&self.sink),
            stats: Arc::clone(&stats),
        };
        let pool = WorkerPool::spawn(workers, jobs_rx, ctx)?;

        // Producer runs here, concurrently with the pool; it closes the queue.
        let produced = PathProducer::new(&self.config.root, mode).run(jobs_tx, self.sink.as_ref());

        pool.join()?;
        let produced = produced?;

        let summary = RunSummary {
            mode,
            workers,
            files_queued: produced.queued,
            files_processed: stats.files_processed.load(Ordering::Relaxed),
            files_failed: stats.files_failed.load(Ordering::Relaxed),
            auth_failures: stats.auth_failures.load(Ordering::Relaxed),
            traversal_errors: produced.traversal_errors,
            bytes_read: stats.bytes_read.load(Ordering::Relaxed),
            bytes_written: stats.bytes_written.load(Ordering::Relaxed),
            duration: start_time.elapsed(),
        };

        tracing::info!(
            "Finished: {} processed, {} failed in {:.2?}",
            summary.files_processed,
            summary.files_failed,
            summary.duration
        );

        Ok(summary)
    }
}

/// Process a directory with default settings and no reporting
pub fn process_directory(root: &Path, passphrase: &str, mode: Mode) -> Result<RunSummary> {
    let config = CryptConfig {
        root: root.to_path_buf(),
        mode,
        ..Default::default()
    };

    CryptEngine::new(config, passphrase).execute()
}
