//! Duplicate groups and the final scan result.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{Fingerprint, ScanError};

/// A set of file paths sharing one content fingerprint.
///
/// Members are sorted by (modification time, path) at finalization, so the
/// first member is a stable canonical choice: the oldest copy is kept and
/// everything after it is a relocation candidate.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Content fingerprint shared by every member (hex in JSON output).
    pub fingerprint: Fingerprint,
    /// Size in bytes of each member.
    pub size: u64,
    /// Member paths; first is the canonical (kept) copy.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a group. Callers are expected to pass members already sorted.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            fingerprint,
            size,
            paths,
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The canonical (kept) copy, if the group is non-empty.
    #[must_use]
    pub fn canonical(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// All members after the canonical copy: the relocation candidates.
    #[must_use]
    pub fn redundant(&self) -> &[PathBuf] {
        if self.paths.is_empty() {
            &[]
        } else {
            &self.paths[1..]
        }
    }

    /// Number of redundant copies (total minus the kept one).
    #[must_use]
    pub fn redundant_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes reclaimable by removing every redundant copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.redundant_count() as u64
    }
}

/// Immutable result of one scan invocation.
#[derive(Debug, Default, Serialize)]
pub struct ScanResult {
    /// Groups with two or more members, largest waste first.
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Count of every successfully hashed file, singletons included.
    pub total_files: usize,
    /// Sum of sizes over every hashed file, counting duplicates.
    pub total_size: u64,
    /// Bytes reclaimable across all duplicate groups.
    pub saved_size: u64,
    /// Number of entries skipped due to per-entry errors.
    pub skipped_entries: usize,
    /// The per-entry diagnostics behind `skipped_entries`.
    #[serde(skip)]
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    /// Whether any duplicate group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_groups.is_empty()
    }

    /// Total number of redundant copies across all groups.
    #[must_use]
    pub fn redundant_files(&self) -> usize {
        self.duplicate_groups
            .iter()
            .map(DuplicateGroup::redundant_count)
            .sum()
    }

    /// Whether the scan skipped any entries.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.skipped_entries > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(paths: &[&str], size: u64) -> DuplicateGroup {
        DuplicateGroup::new(
            Fingerprint::from_bytes(vec![0xaa; 16]),
            size,
            paths.iter().map(PathBuf::from).collect(),
        )
    }

    #[test]
    fn test_canonical_and_redundant_split() {
        let g = group(&["/a/old.txt", "/a/copy1.txt", "/a/copy2.txt"], 100);

        assert_eq!(g.canonical().unwrap(), Path::new("/a/old.txt"));
        assert_eq!(g.redundant().len(), 2);
        assert_eq!(g.redundant_count(), 2);
        assert_eq!(g.wasted_space(), 200);
    }

    #[test]
    fn test_singleton_group_wastes_nothing() {
        let g = group(&["/a/only.txt"], 100);
        assert_eq!(g.redundant_count(), 0);
        assert!(g.redundant().is_empty());
        assert_eq!(g.wasted_space(), 0);
    }

    #[test]
    fn test_scan_result_counters() {
        let result = ScanResult {
            duplicate_groups: vec![group(&["/x", "/y"], 5), group(&["/p", "/q", "/r"], 3)],
            total_files: 7,
            total_size: 40,
            saved_size: 11,
            skipped_entries: 0,
            errors: Vec::new(),
        };

        assert!(result.has_duplicates());
        assert_eq!(result.redundant_files(), 3);
        assert!(!result.is_partial());
    }

    #[test]
    fn test_group_serializes_fingerprint_as_hex() {
        let g = group(&["/x"], 1);
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["fingerprint"], "aa".repeat(16));
    }
}
