//! JSON report with stable field names for scripting.

use serde::Serialize;

use crate::duplicates::ScanResult;

/// Schema version for the JSON report. Bump on breaking field changes.
const REPORT_VERSION: u32 = 1;

/// Serializable wrapper adding a version and derived counters to the raw
/// scan result.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    version: u32,
    total_files: usize,
    total_size: u64,
    saved_size: u64,
    skipped_entries: usize,
    duplicate_group_count: usize,
    redundant_files: usize,
    duplicate_groups: &'a [crate::duplicates::DuplicateGroup],
}

/// Render a scan result as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if the result cannot be encoded, which in
/// practice only happens for non-UTF-8 paths on exotic platforms.
pub fn render_json(result: &ScanResult) -> serde_json::Result<String> {
    let report = JsonReport {
        version: REPORT_VERSION,
        total_files: result.total_files,
        total_size: result.total_size,
        saved_size: result.saved_size,
        skipped_entries: result.skipped_entries,
        duplicate_group_count: result.duplicate_groups.len(),
        redundant_files: result.redundant_files(),
        duplicate_groups: &result.duplicate_groups,
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::DuplicateGroup;
    use crate::scanner::Fingerprint;
    use std::path::PathBuf;

    #[test]
    fn test_json_report_fields() {
        let result = ScanResult {
            duplicate_groups: vec![DuplicateGroup::new(
                Fingerprint::from_bytes(vec![0x01, 0x02]),
                5,
                vec![PathBuf::from("/a/x"), PathBuf::from("/a/y")],
            )],
            total_files: 3,
            total_size: 13,
            saved_size: 5,
            skipped_entries: 1,
            errors: Vec::new(),
        };

        let json = render_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["total_files"], 3);
        assert_eq!(value["total_size"], 13);
        assert_eq!(value["saved_size"], 5);
        assert_eq!(value["skipped_entries"], 1);
        assert_eq!(value["duplicate_group_count"], 1);
        assert_eq!(value["redundant_files"], 1);
        assert_eq!(value["duplicate_groups"][0]["fingerprint"], "0102");
        assert_eq!(value["duplicate_groups"][0]["size"], 5);
        assert_eq!(value["duplicate_groups"][0]["paths"][0], "/a/x");
    }

    #[test]
    fn test_json_report_empty_result() {
        let json = render_json(&ScanResult::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["duplicate_group_count"], 0);
        assert!(value["duplicate_groups"].as_array().unwrap().is_empty());
    }
}
