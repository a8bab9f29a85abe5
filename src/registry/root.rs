//! Project root detection.

use std::path::{Path, PathBuf};

pub const DEFAULT_VCS_MARKER: &str = ".git";

/// Walk up from `start` to the first directory holding a `marker`
/// sub-directory. Reaching the filesystem root yields `None`.
pub fn find_project_root(start: &Path, marker: &str) -> Option<PathBuf> {
    start.ancestors().find(|dir| dir.join(marker).is_dir()).map(Path::to_path_buf)
}
