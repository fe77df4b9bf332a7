//! Logging setup.
//!
//! `RUST_LOG` takes precedence over the verbosity flags so developers can
//! request per-module filtering without touching the CLI surface.

use env_logger::Builder;
use log::LevelFilter;
use std::env;

/// Initialize the global logger from the verbosity flags.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    let _ = builder.format_timestamp_secs().try_init();
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
