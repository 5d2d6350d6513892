//! Worker pool
//!
//! A fixed number of named threads, each looping over the shared job
//! receiver until the queue is closed and drained. Every claimed path
//! produces exactly one [`FileOutcome`]; a failure never stops the worker.

use crate::config::{Mode, WriteStrategy};
use crate::core::JobReceiver;
use crate::crypto::SymmetricKey;
use crate::error::{DircryptError, Result};
use crate::fs::{CodecStats, FileCodec};
use crate::progress::OutcomeSink;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Outcome of one claimed file
#[derive(Debug)]
pub struct FileOutcome {
    /// Input path as claimed from the queue
    pub path: PathBuf,
    /// Success stats or the typed failure
    pub result: Result<CodecStats>,
}

impl FileOutcome {
    /// Build a failed outcome
    pub fn failed(path: PathBuf, error: DircryptError) -> Self {
        Self {
            path,
            result: Err(error),
        }
    }

    /// Did the file get processed?
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counters shared by every worker
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Files processed successfully
    pub files_processed: AtomicU64,
    /// Files that failed
    pub files_failed: AtomicU64,
    /// Failures caused by tag verification
    pub auth_failures: AtomicU64,
    /// Bytes read from processed files
    pub bytes_read: AtomicU64,
    /// Bytes written for processed files
    pub bytes_written: AtomicU64,
}

impl PipelineStats {
    /// Fold one outcome into the counters
    pub fn record(&self, outcome: &FileOutcome) {
        match &outcome.result {
            Ok(stats) => {
                self.files_processed.fetch_add(1, Ordering::Relaxed);
                self.bytes_read.fetch_add(stats.bytes_read, Ordering::Relaxed);
                self.bytes_written
                    .fetch_add(stats.bytes_written, Ordering::Relaxed);
            }
            Err(e) => {
                self.files_failed.fetch_add(1, Ordering::Relaxed);
                if e.is_authentication_failure() {
                    self.auth_failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Files that have reached a terminal outcome
    pub fn files_done(&self) -> u64 {
        self.files_processed.load(Ordering::Relaxed) + self.files_failed.load(Ordering::Relaxed)
    }
}

/// Settings every worker shares
#[derive(Clone)]
pub struct WorkerContext {
    /// Key shared read-only by all workers
    pub key: Arc<SymmetricKey>,
    /// Encrypt or decrypt
    pub mode: Mode,
    /// Output commit strategy
    pub strategy: WriteStrategy,
    /// Where outcomes go
    pub sink: Arc<dyn OutcomeSink>,
    /// Aggregate counters
    pub stats: Arc<PipelineStats>,
}

/// Running worker threads
pub struct WorkerPool {
    handles: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `workers` threads draining `jobs`
    pub fn spawn(workers: usize, jobs: JobReceiver, ctx: WorkerContext) -> Result<Self> {
        if workers == 0 {
            return Err(DircryptError::config("worker count must be at least 1"));
        }

        let mut handles = Vec::with_capacity(workers);

        for worker_id in 0..workers {
            let jobs = jobs.clone();
            let ctx = ctx.clone();

            let handle = thread::Builder::new()
                .name(format!("dircrypt-worker-{}", worker_id))
                .spawn(move || run_worker(worker_id, jobs, ctx))
                .map_err(|e| {
                    DircryptError::ThreadPool(format!("failed to spawn worker {}: {}", worker_id, e))
                })?;

            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Number of workers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Is the pool empty?
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until every worker has drained the queue and exited
    ///
    /// Waits for all workers even if one of them panicked.
    pub fn join(self) -> Result<()> {
        let mut panicked = 0usize;

        for handle in self.handles {
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        if panicked > 0 {
            return Err(DircryptError::ThreadPool(format!(
                "{} worker(s) panicked",
                panicked
            )));
        }

        Ok(())
    }
}

fn run_worker(worker_id: usize, jobs: JobReceiver, ctx: WorkerContext) {
    let codec = FileCodec::new(&ctx.key).with_strategy(ctx.strategy);

    for path in jobs.iter() {
        tracing::debug!("Worker {} claimed {:?}", worker_id, path);

        let result = codec.process(ctx.mode, &path);
        if let Err(e) = &result {
            tracing::warn!("Worker {} failed to {} {:?}: {}", worker_id, ctx.mode.verb(), path, e);
        }

        let outcome = FileOutcome { path, result };
        ctx.stats.record(&outcome);
        ctx.sink.file_done(outcome);
    }

    tracing::debug!("Worker {} drained, shutting down", worker_id);
}
