//! CLI/config merging

use super::AppConfig;
use std::path::PathBuf;

/// Values given on the command line or through `CONFIG_LENS_*` variables.
/// `None` leaves the file or default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub debounce_ms: Option<u64>,
    pub home_dir: Option<PathBuf>,
    pub managed_dir: Option<PathBuf>,
    pub no_managed: bool,
    pub no_watch: bool,
}

pub fn merge_cli_with_config(mut config: AppConfig, cli: CliOverrides) -> AppConfig {
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }
    if let Some(dir) = cli.home_dir {
        config.home_dir = Some(dir);
    }
    if let Some(dir) = cli.managed_dir {
        config.managed_dir = Some(dir);
        config.disable_managed = false;
    }
    // Flags can only switch these on; the file may already have.
    if cli.no_managed {
        config.disable_managed = true;
    }
    if cli.no_watch {
        config.watch = false;
    }
    config
}
