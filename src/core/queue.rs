//! Job queue between the path producer and the workers
//!
//! A bounded crossbeam channel. Every path is received by exactly one
//! worker. Closing is dropping the last [`JobSender`]; workers then drain
//! whatever is still buffered and stop.

use crate::error::{DircryptError, Result};
use crossbeam::channel::{bounded, Receiver, Sender};
use std::path::PathBuf;

/// Create a queue holding at most `capacity` pending paths
///
/// A capacity of zero is bumped to one so the producer can still hand off.
pub fn job_queue(capacity: usize) -> (JobSender, JobReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (JobSender { tx }, JobReceiver { rx })
}

/// Producer half; blocks when the queue is full
#[derive(Debug, Clone)]
pub struct JobSender {
    tx: Sender<PathBuf>,
}

impl JobSender {
    /// Enqueue a path, waiting for space
    pub fn push(&self, path: PathBuf) -> Result<()> {
        self.tx
            .send(path)
            .map_err(|_| DircryptError::ThreadPool("all workers have exited".to_string()))
    }

    /// Number of paths waiting to be claimed
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    /// Signal that no more paths will arrive
    ///
    /// Consumes this handle; the queue closes once every clone is gone.
    pub fn close(self) {
        drop(self);
    }
}

/// Consumer half; cloned once per worker
#[derive(Debug, Clone)]
pub struct JobReceiver {
    rx: Receiver<PathBuf>,
}

impl JobReceiver {
    /// Wait for the next path. `None` once the queue is closed and drained.
    pub fn next_job(&self) -> Option<PathBuf> {
        self.rx.recv().ok()
    }

    /// Iterate until the queue is closed and drained
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.rx.iter()
    }
}
