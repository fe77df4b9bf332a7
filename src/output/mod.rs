//! Output formatters for scan results.
//!
//! - [`text`]: human-readable report for the terminal
//! - [`json`]: machine-readable report with stable field names

pub mod json;
pub mod text;

pub use json::render_json;
pub use text::{format_size, render_text};
