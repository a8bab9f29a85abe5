//! Config file loading

use super::AppConfig;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "config-lens";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the config file is looked for when none is given explicitly.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load settings from `config_path`, or from the default location.
///
/// An explicit path must exist and parse. A discovered file that is broken
/// is reported and ignored so the tool still starts.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match config_path {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => load_discovered(&path),
            _ => Ok(AppConfig::default()),
        },
    }
}

fn load_discovered(path: &Path) -> Result<AppConfig, ConfigError> {
    match read_config(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("Failed to load auto-discovered config {}: {}", path.display(), e);
            Ok(AppConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    parse_toml_config(&content, path)
}

fn parse_toml_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "debounce_ms = 120\nvcs_marker = '.hg'\nhome_dir = '/home/alt'\n")
            .expect("write");

        let cfg = load_config(Some(&path)).expect("config");
        assert_eq!(cfg.debounce_ms, 120);
        assert_eq!(cfg.vcs_marker, ".hg");
        assert_eq!(cfg.home_dir, Some(PathBuf::from("/home/alt")));
        assert!(cfg.watch);
        assert!(!cfg.disable_managed);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "").expect("write");

        assert_eq!(load_config(Some(&path)).expect("config"), AppConfig::default());
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "debounce_ms = 'soon'\n").expect("write");

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn test_explicit_config_unknown_key_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "debounce = 10\n").expect("write");

        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_config_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config(Some(&tmp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_discovered_config_soft_fails() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.toml");
        fs::write(&path, "watch = [\n").expect("write");

        let cfg = load_discovered(&path).expect("defaults");
        assert_eq!(cfg, AppConfig::default());
    }
}
