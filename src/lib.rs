//! dedupr: a duplicate file finder with recoverable trash support.
//!
//! The crate is organized in layers:
//!
//! - [`scanner`]: directory traversal, eligibility filtering, and content
//!   hashing primitives
//! - [`duplicates`]: the bounded concurrent scan engine and its result types
//! - [`actions`]: relocation of redundant copies to a holding area
//! - [`output`]: text and JSON report rendering
//! - [`cli`] / [`config`]: the command-line and file-based configuration
//!   surfaces
//!
//! The library surface is usable without the CLI:
//!
//! ```no_run
//! use dedupr::duplicates::{EngineConfig, ScanEngine};
//! use std::path::PathBuf;
//!
//! let engine = ScanEngine::new(EngineConfig::default())?;
//! let result = engine.scan(&[PathBuf::from("/data")])?;
//! for group in &result.duplicate_groups {
//!     println!("{} x{}", group.fingerprint, group.len());
//! }
//! # Ok::<(), dedupr::duplicates::EngineError>(())
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod signal;

use anyhow::{Context, Result};

use crate::actions::{holding_area, relocate_redundant};
use crate::cli::{parse_size, Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{EngineConfig, ScanEngine, ScanResult};
use crate::error::ExitCode;
use crate::scanner::HashAlgorithm;

/// Effective settings after merging defaults, the config file, and flags.
struct Settings {
    algorithm: HashAlgorithm,
    min_size: u64,
    exclude_patterns: Vec<String>,
    include_types: Vec<String>,
    concurrency: usize,
    output: OutputFormat,
    dry_run: bool,
    use_trash: bool,
}

impl Settings {
    /// Command-line flags override the config file; the config file
    /// overrides built-in defaults. All parsing happens here so bad
    /// settings fail before any traversal starts.
    fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let algorithm: HashAlgorithm = cli
            .hash
            .as_deref()
            .unwrap_or(&config.hash_algorithm)
            .parse()?;

        let min_size = match cli.min_size {
            Some(bytes) => bytes,
            None => parse_size(&config.min_size)
                .map_err(|e| anyhow::anyhow!("invalid min_size in config: {}", e))?,
        };

        let exclude_patterns = if cli.exclude.is_empty() {
            config.exclude_patterns.clone()
        } else {
            cli.exclude.clone()
        };

        let include_types = if cli.include_types.is_empty() {
            config.include_types.clone()
        } else {
            cli.include_types.clone()
        };

        let output = match cli.output {
            Some(format) => format,
            None => config
                .output_format
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid output_format in config: {}", e))?,
        };

        Ok(Self {
            algorithm,
            min_size,
            exclude_patterns,
            include_types,
            concurrency: cli.concurrency.unwrap_or(config.concurrency),
            output,
            dry_run: !cli.force && config.dry_run,
            use_trash: !cli.no_trash && config.use_trash,
        })
    }
}

/// Run the application with parsed arguments, returning the exit code.
///
/// # Errors
///
/// Returns an error for configuration problems, untraversable roots, and
/// interruption. Per-entry scan problems are reported on the result
/// instead and map to [`ExitCode::PartialSuccess`].
pub fn run_app(cli: &Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(cli, &config)?;

    let shutdown = signal::install_handler().context("failed to install signal handler")?;

    let engine_config = EngineConfig::default()
        .with_algorithm(settings.algorithm)
        .with_min_size(settings.min_size)
        .with_exclude_patterns(settings.exclude_patterns.clone())
        .with_include_types(settings.include_types.clone())
        .with_concurrency(settings.concurrency)
        .with_shutdown_flag(shutdown.get_flag());

    let engine = ScanEngine::new(engine_config)?;
    let result = engine.scan(&cli.paths)?;

    for error in &result.errors {
        log::warn!("skipped: {}", error);
    }

    match settings.output {
        OutputFormat::Text => print!("{}", output::render_text(&result, settings.dry_run)),
        OutputFormat::Json => {
            let json = output::render_json(&result).context("failed to serialize report")?;
            println!("{}", json);
        }
    }

    if !settings.dry_run && result.has_duplicates() {
        relocate(&result, settings.use_trash, settings.output)?;
    }

    Ok(exit_code_for(&result))
}

fn relocate(result: &ScanResult, use_trash: bool, output: OutputFormat) -> Result<()> {
    let area = holding_area(use_trash);
    log::info!("relocating redundant copies ({})", area.describe());
    let summary = relocate_redundant(&result.duplicate_groups, area.as_ref());
    for (path, error) in &summary.failures {
        log::error!("failed to relocate {}: {}", path.display(), error);
    }
    if output == OutputFormat::Text {
        println!("{}", summary.summary());
    }
    Ok(())
}

fn exit_code_for(result: &ScanResult) -> ExitCode {
    if result.is_partial() {
        ExitCode::PartialSuccess
    } else if !result.has_duplicates() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::DuplicateGroup;
    use crate::scanner::{Fingerprint, ScanError};
    use std::path::PathBuf;

    fn result_with(groups: usize, errors: usize) -> ScanResult {
        ScanResult {
            duplicate_groups: (0..groups)
                .map(|i| {
                    DuplicateGroup::new(
                        Fingerprint::from_bytes(vec![i as u8]),
                        4,
                        vec![PathBuf::from("/a"), PathBuf::from("/b")],
                    )
                })
                .collect(),
            total_files: 2 * groups,
            total_size: 8 * groups as u64,
            saved_size: 4 * groups as u64,
            skipped_entries: errors,
            errors: (0..errors)
                .map(|_| ScanError::NotFound(PathBuf::from("/gone")))
                .collect(),
        }
    }

    #[test]
    fn test_exit_code_success_with_duplicates() {
        assert_eq!(exit_code_for(&result_with(1, 0)), ExitCode::Success);
    }

    #[test]
    fn test_exit_code_no_duplicates() {
        assert_eq!(exit_code_for(&result_with(0, 0)), ExitCode::NoDuplicates);
    }

    #[test]
    fn test_exit_code_partial_beats_others() {
        assert_eq!(exit_code_for(&result_with(1, 2)), ExitCode::PartialSuccess);
        assert_eq!(exit_code_for(&result_with(0, 2)), ExitCode::PartialSuccess);
    }

    #[test]
    fn test_settings_cli_overrides_config() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "dedupr",
            "--hash",
            "sha256",
            "--min-size",
            "2KB",
            "--exclude",
            "*.log",
            "--concurrency",
            "3",
            "--output",
            "json",
            "/tmp",
        ])
        .unwrap();
        let config = Config::default();

        let settings = Settings::resolve(&cli, &config).unwrap();
        assert_eq!(settings.algorithm, HashAlgorithm::Sha256);
        assert_eq!(settings.min_size, 2048);
        assert_eq!(settings.exclude_patterns, vec!["*.log".to_string()]);
        assert_eq!(settings.concurrency, 3);
        assert_eq!(settings.output, OutputFormat::Json);
    }

    #[test]
    fn test_settings_fall_back_to_config() {
        let cli = <Cli as clap::Parser>::try_parse_from(["dedupr", "/tmp"]).unwrap();
        let mut config = Config::default();
        config.hash_algorithm = "sha256".to_string();
        config.min_size = "1KB".to_string();
        config.concurrency = 7;

        let settings = Settings::resolve(&cli, &config).unwrap();
        assert_eq!(settings.algorithm, HashAlgorithm::Sha256);
        assert_eq!(settings.min_size, 1024);
        assert_eq!(settings.concurrency, 7);
        assert!(settings.dry_run);
        assert!(settings.use_trash);
    }

    #[test]
    fn test_settings_force_disables_dry_run() {
        let cli =
            <Cli as clap::Parser>::try_parse_from(["dedupr", "--force", "/tmp"]).unwrap();
        let settings = Settings::resolve(&cli, &Config::default()).unwrap();
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_settings_reject_bad_algorithm() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "dedupr", "--hash", "crc32", "/tmp",
        ])
        .unwrap();
        assert!(Settings::resolve(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_settings_reject_bad_config_min_size() {
        let cli = <Cli as clap::Parser>::try_parse_from(["dedupr", "/tmp"]).unwrap();
        let mut config = Config::default();
        config.min_size = "lots".to_string();
        assert!(Settings::resolve(&cli, &config).is_err());
    }
}
