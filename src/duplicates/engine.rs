//! Scan engine orchestrating the walk → hash → aggregate pipeline.
//!
//! A scan moves through fixed stages: walking and hashing run concurrently
//! inside the bounded pool, the pool join drains all in-flight work, and a
//! single-threaded finalization pass computes the totals. One
//! [`ScanResult`] is produced per invocation; there is no transition back.
//!
//! Root-level problems (a root that does not exist or is not a directory)
//! abort the scan before any traversal. Per-entry problems never do.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::scanner::{EntryFilter, Hasher, HashAlgorithm, ScanError, Walker};

use super::aggregator::GroupAggregator;
use super::groups::ScanResult;
use super::pool::{HashPool, DEFAULT_CONCURRENCY};

/// Configuration for a scan engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Minimum file size in bytes (0 means no floor).
    pub min_size: u64,
    /// Base-name glob patterns to exclude.
    pub exclude_patterns: Vec<String>,
    /// File extensions to include (empty means all).
    pub include_types: Vec<String>,
    /// Upper bound on concurrent hash operations.
    pub concurrency: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            min_size: 0,
            exclude_patterns: Vec::new(),
            include_types: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            shutdown_flag: None,
        }
    }
}

impl EngineConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the minimum file size.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the exclusion patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set the include file-type filters.
    #[must_use]
    pub fn with_include_types(mut self, types: Vec<String>) -> Self {
        self.include_types = types;
        self
    }

    /// Set the concurrency bound.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Scan-aborting errors.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// A configured root path does not exist.
    #[error("root path not found: {0}")]
    RootNotFound(PathBuf),

    /// A configured root path is not a directory.
    #[error("root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// No root paths were given.
    #[error("no root paths to scan")]
    NoRoots,

    /// The concurrency bound must be at least 1.
    #[error("concurrency bound must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    /// The scan was interrupted by a shutdown request.
    #[error("scan interrupted")]
    Interrupted,

    /// The hashing worker pool could not be constructed.
    #[error("failed to build hash pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// The concurrent scan-and-group engine.
///
/// # Example
///
/// ```no_run
/// use dedupr::duplicates::{EngineConfig, ScanEngine};
/// use std::path::PathBuf;
///
/// let engine = ScanEngine::new(EngineConfig::default()).unwrap();
/// let result = engine.scan(&[PathBuf::from("/home/user/Downloads")]).unwrap();
/// println!(
///     "{} duplicate groups, {} bytes reclaimable",
///     result.duplicate_groups.len(),
///     result.saved_size
/// );
/// ```
#[derive(Debug)]
pub struct ScanEngine {
    config: EngineConfig,
    hasher: Hasher,
}

impl ScanEngine {
    /// Create an engine, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] for a zero bound.
    /// Malformed exclusion patterns are not an error; they simply never
    /// match.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.concurrency == 0 {
            return Err(EngineError::InvalidConcurrency(0));
        }
        let hasher = Hasher::new(config.algorithm);
        Ok(Self { config, hasher })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scan the given roots and group files by content fingerprint.
    ///
    /// Per-entry failures (unreadable subtrees, files vanishing before
    /// hashing) are collected as diagnostics on the result; the scan either
    /// fully completes or fails with a reason tied to a root path.
    ///
    /// # Errors
    ///
    /// - [`EngineError::RootNotFound`] / [`EngineError::NotADirectory`] if a
    ///   root is not traversable at all
    /// - [`EngineError::Interrupted`] if shutdown was requested; no partial
    ///   result is returned
    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanResult, EngineError> {
        let start = Instant::now();

        if roots.is_empty() {
            return Err(EngineError::NoRoots);
        }
        for root in roots {
            Self::validate_root(root)?;
        }

        log::info!("Starting scan of {} root(s)", roots.len());

        if self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        // Walking + filtering; per-entry errors become diagnostics
        let filter = EntryFilter::new(
            self.config.min_size,
            &self.config.exclude_patterns,
            &self.config.include_types,
        );
        let mut walker = Walker::new(roots.to_vec(), filter);
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        let mut files = Vec::new();
        let mut diagnostics: Vec<ScanError> = Vec::new();
        for entry in walker.walk() {
            match entry {
                Ok(file) => files.push(file),
                Err(e) => diagnostics.push(e),
            }
        }

        if self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        log::info!(
            "Walk complete: {} eligible files, {} entries skipped",
            files.len(),
            diagnostics.len()
        );

        // Bounded hashing with the aggregator as the only shared state
        let aggregator = GroupAggregator::new();
        let mut pool = HashPool::new(self.config.concurrency);
        if let Some(ref flag) = self.config.shutdown_flag {
            pool = pool.with_shutdown_flag(Arc::clone(flag));
        }

        let stats = pool.run(files, &self.hasher, &aggregator)?;
        diagnostics.extend(stats.errors.into_iter().map(ScanError::from));

        if stats.interrupted || self.config.is_shutdown_requested() {
            return Err(EngineError::Interrupted);
        }

        // Single-threaded finalization after the pool join
        let result = aggregator.finalize(diagnostics);

        log::info!(
            "Scan complete in {:.2?}: {} files, {} duplicate groups, {} bytes reclaimable",
            start.elapsed(),
            result.total_files,
            result.duplicate_groups.len(),
            result.saved_size
        );

        Ok(result)
    }

    /// A root must exist and be traversable; anything else aborts the scan.
    fn validate_root(root: &Path) -> Result<(), EngineError> {
        let metadata = std::fs::metadata(root)
            .map_err(|_| EngineError::RootNotFound(root.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(EngineError::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }
}
