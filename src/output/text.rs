//! Human-readable text report.

use std::fmt::Write;

use crate::duplicates::ScanResult;

/// Format a byte count as a human-readable string.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Render a scan result as a text report.
///
/// The first member of each group is marked as kept; the rest are marked
/// as removal candidates (dry run) or removed (after relocation).
#[must_use]
pub fn render_text(result: &ScanResult, dry_run: bool) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail, so the results are discarded
    let _ = writeln!(out, "Scan complete.");
    let _ = writeln!(out, "Total files: {}", result.total_files);
    let _ = writeln!(out, "Total size: {}", format_size(result.total_size));
    let _ = writeln!(out, "Reclaimable: {}", format_size(result.saved_size));
    if result.skipped_entries > 0 {
        let _ = writeln!(
            out,
            "Skipped entries: {} (see warnings above)",
            result.skipped_entries
        );
    }
    let _ = writeln!(out);

    if result.duplicate_groups.is_empty() {
        let _ = writeln!(out, "No duplicate files found.");
        return out;
    }

    let _ = writeln!(
        out,
        "Found {} duplicate group(s):",
        result.duplicate_groups.len()
    );
    let _ = writeln!(out);

    for group in &result.duplicate_groups {
        let _ = writeln!(
            out,
            "Fingerprint: {} ({} each)",
            group.fingerprint,
            format_size(group.size)
        );
        for (i, path) in group.paths.iter().enumerate() {
            let marker = if i == 0 {
                "[kept]"
            } else if dry_run {
                "[candidate]"
            } else {
                "[removed]"
            };
            let _ = writeln!(out, "  {} {}", marker, path.display());
        }
        let _ = writeln!(out);
    }

    if dry_run {
        let _ = writeln!(
            out,
            "Hint: this was a dry run. Use --force to relocate the candidates."
        );
    }

    out
}
