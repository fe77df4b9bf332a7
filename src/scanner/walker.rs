//! Recursive file discovery over a set of root paths.
//!
//! The walker runs on the calling thread; hashing concurrency lives in the
//! worker pool downstream. Per-entry failures (unreadable subtrees, entries
//! vanishing mid-walk) are yielded as [`ScanError`] diagnostics and the walk
//! continues. Traversal order is unspecified and nothing downstream may
//! depend on it.
//!
//! Symbolic links are not followed, so symlink cycles cannot cause
//! unbounded traversal.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{EntryFilter, FileDescriptor, ScanError};

/// Directory walker that yields eligible files under one or more roots.
#[derive(Debug)]
pub struct Walker {
    /// Root paths to descend from.
    roots: Vec<PathBuf>,
    /// Eligibility predicate applied to every entry.
    filter: EntryFilter,
    /// Optional shutdown flag for graceful termination.
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a walker over the given roots.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, filter: EntryFilter) -> Self {
        Self {
            roots,
            filter,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag flips to `true` the walker stops yielding entries as
    /// soon as possible.
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

    /// Walk all roots, yielding eligible file descriptors lazily.
    ///
    /// Errors are yielded inline as [`ScanError`] values rather than
    /// stopping iteration; callers decide whether to collect them as
    /// diagnostics. An entry that cannot be stat'ed is reported and
    /// skipped.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileDescriptor, ScanError>> + '_ {
        self.roots.iter().flat_map(move |root| {
            log::debug!("Walking {}", root.display());
            WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_map(move |entry_result| self.process_entry(entry_result))
        })
    }

    /// Turn one walkdir entry into an eligible descriptor, a diagnostic, or
    /// nothing (filtered out).
    fn process_entry(
        &self,
        entry_result: walkdir::Result<walkdir::DirEntry>,
    ) -> Option<Result<FileDescriptor, ScanError>> {
        if self.is_shutdown_requested() {
            log::debug!("Walker: shutdown requested, stopping iteration");
            return None;
        }

        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(PathBuf::new, std::borrow::ToOwned::to_owned);
                let err = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk loop detected"));
                log::warn!("Walker error for {}: {}", path.display(), err);
                return Some(Err(ScanError::from_io(path, err)));
            }
        };

        // Directories and symlinks are traversal machinery, not candidates
        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
            }
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                let path = entry.path().to_path_buf();
                let err = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                log::warn!("Failed to stat {}: {}", path.display(), err);
                return Some(Err(ScanError::from_io(path, err)));
            }
        };

        if !self.filter.accept(entry.path(), &metadata) {
            log::trace!("Filtered out: {}", entry.path().display());
            return None;
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Some(Ok(FileDescriptor::new(
            entry.path().to_path_buf(),
            metadata.len(),
            modified,
        )))
    }
}
