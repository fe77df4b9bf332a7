//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Preview duplicates under two directories
//! dedupr ~/Downloads ~/Pictures
//!
//! # SHA-256, 1MB floor, machine-readable output
//! dedupr --hash sha256 --min-size 1MB --output json ~/Downloads
//!
//! # Actually move redundant copies to the trash
//! dedupr --force ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Duplicate file finder with recoverable trash support.
///
/// dedupr scans directory trees, groups files by content hash, and can move
/// redundant copies to the system trash instead of deleting them outright.
#[derive(Debug, Parser)]
#[command(name = "dedupr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan for duplicates
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Hash algorithm (md5 or sha256)
    #[arg(long = "hash", value_name = "ALGO")]
    pub hash: Option<String>,

    /// Minimum file size to consider (e.g. 10MB)
    ///
    /// Supports suffixes B, KB, MB, GB, TB (1024-based). A bare number is
    /// taken as bytes.
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Base-name glob patterns to exclude (can be given multiple times)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// File extensions to include (can be given multiple times)
    ///
    /// When given, only files with these extensions are scanned.
    #[arg(long = "include-type", value_name = "EXT")]
    pub include_types: Vec<String>,

    /// Upper bound on concurrent hashing operations
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Relocate redundant copies instead of just reporting them
    #[arg(short, long)]
    pub force: bool,

    /// Delete permanently instead of moving to the system trash
    ///
    /// Warning: files cannot be recovered after permanent deletion.
    #[arg(long)]
    pub no_trash: bool,

    /// Configuration file path
    ///
    /// If not given, a platform-specific default location is tried.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown output format '{}' (expected text or json)",
                other
            )),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes B, KB, MB, GB, TB (all 1024-based, matching the
/// config file semantics), case-insensitive, fractional values allowed.
/// A bare number is taken as bytes.
///
/// # Examples
///
/// ```
/// use dedupr::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5MB").unwrap(), 1_572_864);
/// ```
///
/// # Errors
///
/// Returns a descriptive message for empty or non-numeric input.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let s = input.trim().to_uppercase();
    if s.is_empty() {
        return Err("size must not be empty".to_string());
    }
    if s == "0" {
        return Ok(0);
    }

    // Longest suffixes first so "B" does not swallow "KB"
    const UNITS: &[(&str, u64)] = &[
        ("TB", 1 << 40),
        ("GB", 1 << 30),
        ("MB", 1 << 20),
        ("KB", 1 << 10),
        ("B", 1),
    ];

    for (suffix, multiplier) in UNITS {
        if let Some(number) = s.strip_suffix(suffix) {
            let value: f64 = number
                .trim()
                .parse()
                .map_err(|_| format!("invalid size value: {}", input))?;
            if value < 0.0 {
                return Err(format!("size must not be negative: {}", input));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Ok((value * *multiplier as f64) as u64);
        }
    }

    let value: f64 = s
        .parse()
        .map_err(|_| format!("invalid size value: {}", input))?;
    if value < 0.0 {
        return Err(format!("size must not be negative: {}", input));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as u64)
}
