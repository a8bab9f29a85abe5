//! Path display helpers

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Render `path` for humans, abbreviating the home directory to `~`.
pub fn display_path(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home {
        if let Ok(rest) = path.strip_prefix(home) {
            let rest = normalize_path(&rest.to_string_lossy());
            return if rest.is_empty() { "~".to_string() } else { format!("~/{rest}") };
        }
    }
    normalize_path(&path.to_string_lossy())
}
