//! Persistent configuration.
//!
//! Settings are stored as TOML in a platform-specific location
//! (`~/.config/dedupr/config.toml` on Linux). Command-line flags always
//! take precedence over the file; the file takes precedence over the
//! built-in defaults.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User-facing settings with built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hash algorithm name ("md5" or "sha256")
    pub hash_algorithm: String,

    /// Minimum file size as a human-readable string (e.g. "10MB")
    pub min_size: String,

    /// Base-name glob patterns to skip during traversal
    pub exclude_patterns: Vec<String>,

    /// File extensions to restrict the scan to (empty = all files)
    pub include_types: Vec<String>,

    /// Upper bound on concurrent hashing operations
    pub concurrency: usize,

    /// Report only; do not relocate anything unless --force is given
    pub dry_run: bool,

    /// Default output format ("text" or "json")
    pub output_format: String,

    /// Move redundant copies to the system trash rather than deleting
    pub use_trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_algorithm: "md5".to_string(),
            min_size: "0".to_string(),
            exclude_patterns: vec![
                "*.tmp".to_string(),
                "*.temp".to_string(),
                "node_modules".to_string(),
                ".git".to_string(),
            ],
            include_types: Vec::new(),
            concurrency: crate::duplicates::DEFAULT_CONCURRENCY,
            dry_run: true,
            output_format: "text".to_string(),
            use_trash: true,
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// With an explicit `path`, the file must exist and parse; any failure
    /// is an error. Without one, the default location is tried and a
    /// missing file silently falls back to defaults. A malformed file is
    /// always an error so typos do not silently revert settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("config file not found: {}", path.display());
            }
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to the default location, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory: {}", parent.display()))?;
        }
        let contents =
            toml::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "dedupr", "dedupr")
            .context("could not determine a config directory for this platform")?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
