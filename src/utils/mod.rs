//! Shared helpers

pub mod encoding;
pub mod paths;

pub use encoding::{decode_text, read_text};
pub use paths::{display_path, normalize_path};
