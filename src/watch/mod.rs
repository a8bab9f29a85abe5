//! Debounced filesystem change notifications for the scanned locations

pub mod paths;
pub mod watcher;

pub use paths::watch_paths;
pub use watcher::{ChangeWatcher, DEFAULT_DEBOUNCE_MS};
