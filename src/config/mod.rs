//! Finalizer configuration from `finalizer.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   └── terser     # [assets.terser]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # FinalizerConfig (this file)
//! ```
//!
//! Every field has a default, so a missing config file yields a working
//! configuration that writes into `./public`.

pub mod section;
pub mod types;
mod util;

pub use section::{AssetsConfig, TerserConfig, WritePolicy};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::log;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "finalizer.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `finalizer.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FinalizerConfig {
    /// Absolute path to the config file, empty when running on defaults
    /// (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Public directory artifacts are written under.
    pub public_dir: PathBuf,

    /// Asset settings
    pub assets: AssetsConfig,
}

impl Default for FinalizerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            public_dir: PathBuf::from("public"),
            assets: AssetsConfig::default(),
        }
    }
}

impl FinalizerConfig {
    /// Load configuration for a working directory.
    ///
    /// Searches upward from `cwd` for `config_name`. Without a config file
    /// the defaults apply with `cwd` as root.
    pub fn load(config_name: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(config_name, cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            },
        };

        config.normalize_paths();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    /// Resolve `public_dir` against the root directory.
    fn normalize_paths(&mut self) {
        self.public_dir = util::normalize_path(&self.public_dir, &self.root);
    }

    /// Validate every section, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.assets.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> FinalizerConfig {
    let (parsed, ignored) = FinalizerConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
