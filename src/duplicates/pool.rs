//! Bounded hashing pool.
//!
//! Hashing is fanned out over a dedicated rayon thread pool whose thread
//! count is the admission gate: no more than `concurrency` hash operations
//! are ever in flight, and `run` does not return until every in-flight hash
//! has completed (the full join barrier the aggregator relies on).
//!
//! Per-file hash failures are recorded as diagnostics and do not stop the
//! remaining files. No ordering guarantee exists between files.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::scanner::{FileDescriptor, HashError, Hasher};

use super::aggregator::GroupAggregator;

/// Default number of concurrent hash operations.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Outcome of draining one batch of files through the pool.
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Files hashed successfully.
    pub hashed_files: usize,
    /// Bytes read across all hashed files.
    pub bytes_hashed: u64,
    /// Per-file failures, excluded from every group.
    pub errors: Vec<HashError>,
    /// Whether a shutdown request cut the batch short.
    pub interrupted: bool,
}

/// Fixed-bound scheduler for content hashing.
#[derive(Debug)]
pub struct HashPool {
    concurrency: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl HashPool {
    /// Create a pool with the given concurrency bound (clamped to ≥ 1).
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag; when it flips, no new hash work is admitted.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configured concurrency bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash every descriptor and record successes into the aggregator.
    ///
    /// Returns only after all admitted work has completed. Files whose
    /// hashing failed are dropped from the output and reported in
    /// [`PoolStats::errors`].
    ///
    /// # Errors
    ///
    /// Returns a [`rayon::ThreadPoolBuildError`] if the worker pool cannot
    /// be constructed.
    pub fn run(
        &self,
        files: Vec<FileDescriptor>,
        hasher: &Hasher,
        aggregator: &GroupAggregator,
    ) -> Result<PoolStats, rayon::ThreadPoolBuildError> {
        if files.is_empty() {
            return Ok(PoolStats::default());
        }

        log::info!(
            "Hashing {} files with {} ({} concurrent)",
            files.len(),
            hasher.algorithm(),
            self.concurrency
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .build()?;

        let mut stats = PoolStats::default();
        let errors = Mutex::new(Vec::new());
        let hashed = Mutex::new((0usize, 0u64));

        // install() blocks until every spawned task has finished, which is
        // the join barrier the aggregator needs before finalization.
        pool.install(|| {
            files.par_iter().for_each(|file| {
                if self.is_shutdown_requested() {
                    log::debug!("Hash pool: shutdown requested, skipping {}", file.path.display());
                    return;
                }

                match hasher.hash_file(&file.path) {
                    Ok(fingerprint) => {
                        log::trace!("Hashed {}: {}", file.path.display(), fingerprint);
                        aggregator.record(fingerprint, file);
                        let mut guard = hashed
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner);
                        guard.0 += 1;
                        guard.1 += file.size;
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", file.path.display(), e);
                        errors
                            .lock()
                            .unwrap_or_else(std::sync::PoisonError::into_inner)
                            .push(e);
                    }
                }
            });
        });

        let (count, bytes) = hashed
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        stats.hashed_files = count;
        stats.bytes_hashed = bytes;
        stats.errors = errors
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        stats.interrupted = self.is_shutdown_requested();

        log::debug!(
            "Hash pool drained: {} hashed, {} failed",
            stats.hashed_files,
            stats.errors.len()
        );

        Ok(stats)
    }
}

impl Default for HashPool {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}
