//! Scanner module for directory traversal and file hashing.
//!
//! This module provides the pieces of the scan pipeline that touch the
//! filesystem:
//! - [`filter`]: eligibility predicate (size floor, exclusion globs, type filters)
//! - [`walker`]: recursive file discovery over one or more roots
//! - [`hasher`]: streaming content digests (MD5 or SHA-256)
//!
//! # Example
//!
//! ```no_run
//! use dedupr::scanner::{EntryFilter, Walker};
//! use std::path::PathBuf;
//!
//! let filter = EntryFilter::new(1024, &["*.tmp".to_string()], &[]);
//! let walker = Walker::new(vec![PathBuf::from(".")], filter);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

pub use filter::EntryFilter;
pub use hasher::{Fingerprint, HashAlgorithm, Hasher, ParseAlgorithmError};
pub use walker::Walker;

/// Metadata for a discovered regular file.
///
/// Produced by the walker and handed to the hash pool; size and mtime are
/// carried through to aggregation so finalization never has to stat the
/// file a second time.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// Path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileDescriptor {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// These are per-entry diagnostics: the walk continues past them and they
/// are collected on the final result rather than aborting the scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry vanished between enumeration and stat.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error against the path it occurred on.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished between enumeration and hashing.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error against the path it occurred on.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_descriptor_new() {
        let desc = FileDescriptor::new(PathBuf::from("/test/file.txt"), 1024, SystemTime::now());

        assert_eq!(desc.path, PathBuf::from("/test/file.txt"));
        assert_eq!(desc.size, 1024);
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::PermissionDenied(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "permission denied: /test");

        let err = ScanError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "path not found: /missing");
    }

    #[test]
    fn test_scan_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScanError::from_io(PathBuf::from("/x"), io);
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ScanError::from_io(PathBuf::from("/x"), io);
        assert!(matches!(err, ScanError::NotFound(_)));

        let io = std::io::Error::other("boom");
        let err = ScanError::from_io(PathBuf::from("/x"), io);
        assert!(matches!(err, ScanError::Io { .. }));
    }

    #[test]
    fn test_hash_error_display() {
        let err = HashError::NotFound(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "file not found: /test");

        let err = HashError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }
}
