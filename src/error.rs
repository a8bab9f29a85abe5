use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a scan. Missing files and scopes are data, not errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum JsoncError {
    #[error("invalid JSON after normalization: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SectionError {
    #[error("not a section key: {0}")]
    NotVirtual(String),

    #[error("IO error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Jsonc(#[from] JsoncError),

    #[error("section not found: {0}")]
    Missing(String),
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("watcher init failed: {0}")]
    Backend(#[from] notify::Error),

    #[error("failed to spawn watcher worker: {0}")]
    Spawn(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
