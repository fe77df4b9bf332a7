//! Concurrent aggregation of hash results into duplicate groups.
//!
//! The fingerprint map is the only shared mutable state in a scan. Pool
//! workers append into it through one mutex; contention is low at
//! workstation file counts, so no per-key sharding is done. Finalization
//! runs single-threaded after the pool's join barrier.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::scanner::{FileDescriptor, Fingerprint, ScanError};

use super::groups::{DuplicateGroup, ScanResult};

/// One recorded member of a fingerprint group.
#[derive(Debug)]
struct Member {
    path: PathBuf,
    modified: SystemTime,
}

/// All members observed for one fingerprint.
#[derive(Debug)]
struct GroupSlot {
    /// Representative size, taken from the first recorded member.
    size: u64,
    members: Vec<Member>,
}

/// Collects (fingerprint, path, size) tuples under concurrent writers and
/// folds them into a [`ScanResult`] once the input stream is drained.
#[derive(Debug, Default)]
pub struct GroupAggregator {
    groups: Mutex<HashMap<Fingerprint, GroupSlot>>,
}

impl GroupAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hashed file. Safe to call from multiple workers; appends
    /// to the same or different keys never race.
    pub fn record(&self, fingerprint: Fingerprint, descriptor: &FileDescriptor) {
        let mut groups = self
            .groups
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let slot = groups.entry(fingerprint).or_insert_with(|| GroupSlot {
            size: descriptor.size,
            members: Vec::new(),
        });
        slot.members.push(Member {
            path: descriptor.path.clone(),
            modified: descriptor.modified,
        });
    }

    /// Number of fingerprints recorded so far. Mainly for logging.
    #[must_use]
    pub fn fingerprint_count(&self) -> usize {
        self.groups
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Consume the aggregator and compute the final result.
    ///
    /// Must only be called after all writers have finished (the pool's join
    /// barrier guarantees this). Group members are sorted by (mtime, path)
    /// so canonical selection is deterministic run-to-run, and groups are
    /// ordered by descending reclaimable bytes with the fingerprint as a
    /// tiebreaker.
    #[must_use]
    pub fn finalize(self, errors: Vec<ScanError>) -> ScanResult {
        let groups = self
            .groups
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut total_files = 0usize;
        let mut total_size = 0u64;
        let mut saved_size = 0u64;
        let mut duplicate_groups = Vec::new();

        for (fingerprint, mut slot) in groups {
            let count = slot.members.len();
            total_files += count;
            total_size += slot.size * count as u64;

            if count < 2 {
                continue;
            }

            saved_size += slot.size * (count as u64 - 1);

            slot.members
                .sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
            let paths = slot.members.into_iter().map(|m| m.path).collect();
            duplicate_groups.push(DuplicateGroup::new(fingerprint, slot.size, paths));
        }

        duplicate_groups.sort_by(|a, b| {
            b.wasted_space()
                .cmp(&a.wasted_space())
                .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });

        ScanResult {
            duplicate_groups,
            total_files,
            total_size,
            saved_size,
            skipped_entries: errors.len(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn descriptor(path: &str, size: u64, mtime_offset_secs: u64) -> FileDescriptor {
        FileDescriptor::new(
            PathBuf::from(path),
            size,
            SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_offset_secs),
        )
    }

    fn fp(byte: u8) -> Fingerprint {
        Fingerprint::from_bytes(vec![byte; 16])
    }

    #[test]
    fn test_singletons_counted_but_not_grouped() {
        let agg = GroupAggregator::new();
        agg.record(fp(1), &descriptor("/a", 10, 0));
        agg.record(fp(2), &descriptor("/b", 20, 0));

        let result = agg.finalize(Vec::new());
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_size, 30);
        assert_eq!(result.saved_size, 0);
        assert!(result.duplicate_groups.is_empty());
    }

    #[test]
    fn test_duplicates_grouped_with_saved_size() {
        let agg = GroupAggregator::new();
        agg.record(fp(1), &descriptor("/a/x", 5, 10));
        agg.record(fp(1), &descriptor("/a/y", 5, 20));
        agg.record(fp(2), &descriptor("/a/z", 3, 30));

        let result = agg.finalize(Vec::new());
        assert_eq!(result.total_files, 3);
        assert_eq!(result.total_size, 13);
        assert_eq!(result.saved_size, 5);
        assert_eq!(result.duplicate_groups.len(), 1);
        assert_eq!(result.duplicate_groups[0].len(), 2);
    }

    #[test]
    fn test_members_sorted_by_mtime_then_path() {
        let agg = GroupAggregator::new();
        // Record in reverse mtime order
        agg.record(fp(1), &descriptor("/newer", 8, 100));
        agg.record(fp(1), &descriptor("/older", 8, 50));
        agg.record(fp(1), &descriptor("/also-newer", 8, 100));

        let result = agg.finalize(Vec::new());
        let group = &result.duplicate_groups[0];
        assert_eq!(group.canonical().unwrap(), std::path::Path::new("/older"));
        // Equal mtimes fall back to path order
        assert_eq!(group.paths[1], PathBuf::from("/also-newer"));
        assert_eq!(group.paths[2], PathBuf::from("/newer"));
    }

    #[test]
    fn test_groups_ordered_by_wasted_space() {
        let agg = GroupAggregator::new();
        agg.record(fp(1), &descriptor("/small-a", 1, 0));
        agg.record(fp(1), &descriptor("/small-b", 1, 0));
        agg.record(fp(2), &descriptor("/big-a", 1000, 0));
        agg.record(fp(2), &descriptor("/big-b", 1000, 0));

        let result = agg.finalize(Vec::new());
        assert_eq!(result.duplicate_groups[0].size, 1000);
        assert_eq!(result.duplicate_groups[1].size, 1);
    }

    #[test]
    fn test_concurrent_appends_do_not_lose_records() {
        use std::sync::Arc;

        let agg = Arc::new(GroupAggregator::new());
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let agg = Arc::clone(&agg);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = fp(u8::try_from(i % 4).unwrap());
                        agg.record(key, &descriptor(&format!("/t{}/f{}", t, i), 7, i));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let agg = Arc::into_inner(agg).unwrap();
        let result = agg.finalize(Vec::new());
        assert_eq!(result.total_files, 800);
        assert_eq!(result.total_size, 5600);
        assert_eq!(result.duplicate_groups.len(), 4);
    }

    #[test]
    fn test_errors_become_skipped_entries() {
        let agg = GroupAggregator::new();
        agg.record(fp(1), &descriptor("/a", 10, 0));

        let errors = vec![ScanError::NotFound(PathBuf::from("/gone"))];
        let result = agg.finalize(errors);
        assert_eq!(result.skipped_entries, 1);
        assert!(result.is_partial());
    }
}
