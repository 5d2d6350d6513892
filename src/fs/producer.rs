//! Path producer
//!
//! Walks the root directory with walkdir and feeds every file the mode
//! selects into the job queue. Directories are descended into but never
//! queued. An unreadable entry is reported and its branch skipped; the walk
//! carries on with its siblings.

use crate::config::Mode;
use crate::core::JobSender;
use crate::error::{DircryptError, Result};
use crate::progress::OutcomeSink;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Counters from a completed walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Paths handed to the queue
    pub queued: u64,
    /// Entries the walk could not access
    pub traversal_errors: u64,
}

/// Walks a tree and selects files for one mode
#[derive(Debug, Clone)]
pub struct PathProducer {
    root: PathBuf,
    mode: Mode,
}

impl PathProducer {
    /// Create a producer for `root`
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// Walk the tree, calling `on_match` per selected file and `on_error`
    /// per inaccessible entry. Stops early if `on_match` fails.
    pub fn walk<F, E>(&self, mut on_match: F, mut on_error: E) -> Result<ProducerStats>
    where
        F: FnMut(PathBuf) -> Result<()>,
        E: FnMut(DircryptError),
    {
        let mut stats = ProducerStats::default();

        for entry in WalkDir::new(&self.root) {
            match entry {
                Ok(entry) => {
                    if !self.is_candidate(&entry) {
                        continue;
                    }
                    on_match(entry.into_path())?;
                    stats.queued += 1;
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    let message = match err.io_error() {
                        Some(io) => io.to_string(),
                        None => err.to_string(),
                    };
                    stats.traversal_errors += 1;
                    on_error(DircryptError::traversal(path, message));
                }
            }
        }

        Ok(stats)
    }

    /// Walk the tree into the job queue, closing it when done
    ///
    /// The sender is consumed so the queue closes on every return path,
    /// including an empty walk.
    pub fn run(&self, jobs: JobSender, sink: &dyn OutcomeSink) -> Result<ProducerStats> {
        tracing::debug!("Walking {:?} for files to {}", self.root, self.mode.verb());

        let stats = self.walk(
            |path| {
                tracing::trace!("Queueing {:?}", path);
                jobs.push(path)
            },
            |err| {
                tracing::warn!("{}", err);
                if let Some(path) = err.path() {
                    sink.traversal_failed(path, &err);
                }
            },
        );

        jobs.close();
        stats
    }

    fn is_candidate(&self, entry: &DirEntry) -> bool {
        !entry.file_type().is_dir() && self.mode.selects(entry.path())
    }
}

/// Collect every path `mode` would process under `root`
///
/// Returns the selected paths in walk order together with any traversal
/// errors. No files are touched.
pub fn select_paths(root: &Path, mode: Mode) -> (Vec<PathBuf>, Vec<DircryptError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();

    let producer = PathProducer::new(root, mode);
    // on_match never fails here, so neither does the walk
    let _ = producer.walk(
        |path| {
            paths.push(path);
            Ok(())
        },
        |err| errors.push(err),
    );

    (paths, errors)
}
