//! Which directories and files to watch for a set of scope layouts.

use crate::registry::ScopeLayout;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Paths to watch, deduplicated and sorted.
///
/// Directory entries are watched directly. File entries watch their parent
/// so that creation is noticed, plus the file itself when it exists.
pub fn watch_paths(layouts: &[ScopeLayout]) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();

    for layout in layouts {
        for (entry, path) in layout.resolved() {
            if entry.is_dir {
                paths.insert(path);
                continue;
            }
            if let Some(parent) = path.parent() {
                paths.insert(parent.to_path_buf());
            }
            if path.exists() {
                paths.insert(path);
            }
        }
    }

    paths.into_iter().collect()
}
