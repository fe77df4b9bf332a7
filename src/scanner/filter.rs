//! File eligibility filtering.
//!
//! The [`EntryFilter`] decides whether a filesystem entry is worth hashing:
//! it must be a regular file, at least `min_size` bytes, its base name must
//! not match any exclusion glob, and (when type filters are configured) its
//! extension must be in the include set.
//!
//! The filter is a pure predicate. Malformed glob patterns are dropped at
//! construction with a warning and never match anything.

use std::fs::Metadata;
use std::path::Path;

use glob::Pattern;

/// Predicate deciding whether an entry is eligible for hashing.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    /// Minimum file size in bytes (0 means no floor).
    min_size: u64,
    /// Base-name exclusion patterns.
    exclude: Vec<Pattern>,
    /// Lowercased extensions to include; empty means include everything.
    include_exts: Vec<String>,
}

impl EntryFilter {
    /// Build a filter from configuration values.
    ///
    /// Invalid exclusion patterns are logged and skipped, so construction
    /// never fails. Include types are normalized by stripping a leading dot
    /// and lowercasing (`".JPG"` and `"jpg"` are equivalent).
    #[must_use]
    pub fn new(min_size: u64, exclude_patterns: &[String], include_types: &[String]) -> Self {
        let exclude = exclude_patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    log::warn!("Ignoring invalid exclude pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        let include_exts = include_types
            .iter()
            .map(|t| t.trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            min_size,
            exclude,
            include_exts,
        }
    }

    /// Minimum size this filter enforces.
    #[must_use]
    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    /// Check whether a file passes all configured filters.
    ///
    /// A file exactly at the minimum size is included.
    #[must_use]
    pub fn accept(&self, path: &Path, metadata: &Metadata) -> bool {
        if !metadata.is_file() {
            return false;
        }

        if metadata.len() < self.min_size {
            return false;
        }

        if self.is_excluded(path) {
            return false;
        }

        self.matches_include_types(path)
    }

    /// Check the base name against the exclusion patterns.
    fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            // Non-UTF-8 names cannot match a textual glob
            return false;
        };
        self.exclude.iter().any(|p| p.matches(name))
    }

    /// Check the extension against the include set (empty set accepts all).
    fn matches_include_types(&self, path: &Path) -> bool {
        if self.include_exts.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        self.include_exts.iter().any(|e| *e == ext)
    }
}
