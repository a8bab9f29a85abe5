//! Discovery, presentation and live reloading of layered configuration files.
//!
//! The pipeline runs leaf-first: [`registry`] declares where to look,
//! [`scan`] turns that into an [`domain::Artifact`] tree, [`tree`] projects it
//! into a navigable model, and [`watch`] plus [`reload`] keep the model in
//! sync with the filesystem.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod jsonc;
pub mod merge;
pub mod registry;
pub mod reload;
pub mod scan;
pub mod tree;
pub mod utils;
pub mod watch;

pub use domain::{Artifact, ArtifactId, Category, FileFormat, ScanResult, Scope, SectionKey};
pub use error::{ConfigError, JsoncError, ScanError, SectionError, WatchError};
pub use reload::ReloadCoordinator;
pub use scan::ConfigScanner;
pub use tree::{TreeModel, TreeState};
pub use watch::ChangeWatcher;
