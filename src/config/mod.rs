//! Configuration loading and merging
//!
//! Settings come from an optional TOML file and the command line, with
//! precedence CLI (including environment) > file > defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;
pub mod merge;

pub use loader::{default_config_path, load_config};
pub use merge::{merge_cli_with_config, CliOverrides};

/// Tool settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Quiet period before a burst of changes triggers a reload
    pub debounce_ms: u64,
    /// Base directory of the user scope; the home directory when unset
    pub home_dir: Option<PathBuf>,
    /// Base directory of the managed scope; the platform default when unset
    pub managed_dir: Option<PathBuf>,
    pub disable_managed: bool,
    /// Directory name marking a project root
    pub vcs_marker: String,
    /// Watch for changes in `watch` mode; off means print once and exit
    pub watch: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: crate::watch::DEFAULT_DEBOUNCE_MS,
            home_dir: None,
            managed_dir: None,
            disable_managed: false,
            vcs_marker: crate::registry::DEFAULT_VCS_MARKER.to_string(),
            watch: true,
        }
    }
}
