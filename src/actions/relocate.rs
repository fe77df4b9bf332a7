//! Relocation of redundant copies to a recoverable holding area.
//!
//! The holding area is modeled as a capability trait with one
//! implementation selected at startup: [`SystemTrash`] moves files to the
//! platform recycle bin via the `trash` crate, [`PermanentDelete`] removes
//! them outright for users who opt out of the trash. The scan engine never
//! relocates anything itself; it only decides which paths in a group are
//! candidates (everything after the canonical first member).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// File was not found (may have been removed already).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when moving the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The trash backend rejected the operation.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// Path that could not be trashed
        path: PathBuf,
        /// Backend error message
        message: String,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// A recoverable (or, for permanent deletion, explicitly unrecoverable)
/// destination for redundant copies.
pub trait HoldingArea: Send + Sync {
    /// Move one file out of its current location.
    ///
    /// # Errors
    ///
    /// Returns [`RelocateError`] if the file cannot be moved; callers
    /// continue with the remaining candidates.
    fn relocate(&self, path: &Path) -> Result<(), RelocateError>;

    /// Short human-readable name for logs and summaries.
    fn describe(&self) -> &'static str;
}

/// Moves files to the platform recycle bin, leaving them recoverable.
#[derive(Debug, Default)]
pub struct SystemTrash;

impl HoldingArea for SystemTrash {
    fn relocate(&self, path: &Path) -> Result<(), RelocateError> {
        trash::delete(path).map_err(|e| RelocateError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn describe(&self) -> &'static str {
        "system trash"
    }
}

/// Removes files permanently. No recovery is possible.
#[derive(Debug, Default)]
pub struct PermanentDelete;

impl HoldingArea for PermanentDelete {
    fn relocate(&self, path: &Path) -> Result<(), RelocateError> {
        std::fs::remove_file(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RelocateError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => {
                RelocateError::PermissionDenied(path.to_path_buf())
            }
            _ => RelocateError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
    }

    fn describe(&self) -> &'static str {
        "permanent deletion"
    }
}

/// Select the holding-area implementation at startup.
#[must_use]
pub fn holding_area(use_trash: bool) -> Box<dyn HoldingArea> {
    if use_trash {
        Box::new(SystemTrash)
    } else {
        Box::new(PermanentDelete)
    }
}

/// Outcome of relocating the redundant members of a set of groups.
#[derive(Debug, Default)]
pub struct RelocateSummary {
    /// Paths successfully moved.
    pub relocated: Vec<PathBuf>,
    /// Failed paths with their error messages.
    pub failures: Vec<(PathBuf, String)>,
    /// Bytes freed by the successful moves.
    pub bytes_freed: u64,
}

impl RelocateSummary {
    /// Whether every candidate was moved.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Relocated {} file(s), freed {} bytes",
                self.relocated.len(),
                self.bytes_freed
            )
        } else {
            format!(
                "Relocated {} file(s), {} failed, freed {} bytes",
                self.relocated.len(),
                self.failures.len(),
                self.bytes_freed
            )
        }
    }
}

/// Relocate every redundant member of every group, keeping the canonical
/// first member of each. Failures are tolerated per file; the batch always
/// runs to completion.
pub fn relocate_redundant(
    groups: &[DuplicateGroup],
    area: &dyn HoldingArea,
) -> RelocateSummary {
    let mut summary = RelocateSummary::default();

    for group in groups {
        for path in group.redundant() {
            match area.relocate(path) {
                Ok(()) => {
                    log::info!("Moved to {}: {}", area.describe(), path.display());
                    summary.relocated.push(path.clone());
                    summary.bytes_freed += group.size;
                }
                Err(e) => {
                    log::warn!("Failed to relocate {}: {}", path.display(), e);
                    summary.failures.push((path.clone(), e.to_string()));
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Fingerprint;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn group_of(paths: Vec<PathBuf>, size: u64) -> DuplicateGroup {
        DuplicateGroup::new(Fingerprint::from_bytes(vec![1; 16]), size, paths)
    }

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_permanent_delete_keeps_canonical() {
        let dir = TempDir::new().unwrap();
        let keep = write_file(&dir, "keep", b"data");
        let drop_a = write_file(&dir, "drop-a", b"data");
        let drop_b = write_file(&dir, "drop-b", b"data");

        let groups = vec![group_of(vec![keep.clone(), drop_a.clone(), drop_b.clone()], 4)];
        let summary = relocate_redundant(&groups, &PermanentDelete);

        assert!(summary.all_succeeded());
        assert_eq!(summary.relocated.len(), 2);
        assert_eq!(summary.bytes_freed, 8);
        assert!(keep.exists());
        assert!(!drop_a.exists());
        assert!(!drop_b.exists());
    }

    #[test]
    fn test_missing_candidate_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let keep = write_file(&dir, "keep", b"data");
        let gone = dir.path().join("already-gone");
        let there = write_file(&dir, "there", b"data");

        let groups = vec![group_of(vec![keep.clone(), gone, there.clone()], 4)];
        let summary = relocate_redundant(&groups, &PermanentDelete);

        assert_eq!(summary.relocated.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(keep.exists());
        assert!(!there.exists());
        assert!(summary.summary().contains("1 failed"));
    }

    #[test]
    fn test_singleton_group_relocates_nothing() {
        let dir = TempDir::new().unwrap();
        let only = write_file(&dir, "only", b"data");

        let groups = vec![group_of(vec![only.clone()], 4)];
        let summary = relocate_redundant(&groups, &PermanentDelete);

        assert!(summary.relocated.is_empty());
        assert!(only.exists());
    }

    #[test]
    fn test_holding_area_selection() {
        assert_eq!(holding_area(true).describe(), "system trash");
        assert_eq!(holding_area(false).describe(), "permanent deletion");
    }

    #[test]
    fn test_permanent_delete_error_classification() {
        let err = PermanentDelete
            .relocate(Path::new("/nonexistent/file-55555"))
            .unwrap_err();
        assert!(matches!(err, RelocateError::NotFound(_)));
    }
}
