//! Recursive listing of declared configuration directories.

use crate::domain::{Artifact, ArtifactId, Category, FileFormat, Scope};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List `dir` recursively as artifacts.
///
/// Children come in file-name order, dot-files are skipped and symbolic
/// links are followed. An entry that cannot be stat'ed is left out; a
/// directory that cannot be listed contributes no children. A directory that
/// is already being listed higher up (a symlink cycle) is kept as an entry
/// but not descended into.
pub fn walk_dir(dir: &Path, scope: Scope, category: Category) -> Vec<Artifact> {
    let mut ancestors = Vec::new();
    walk_inner(dir, scope, category, &mut ancestors)
}

fn walk_inner(
    dir: &Path,
    scope: Scope,
    category: Category,
    ancestors: &mut Vec<PathBuf>,
) -> Vec<Artifact> {
    let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    if ancestors.contains(&canonical) {
        tracing::debug!(path = %dir.display(), "not descending into symlink cycle");
        return Vec::new();
    }
    ancestors.push(canonical);

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name();

    let mut children = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "skipping directory entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "stat failed");
                continue;
            }
        };

        let path = entry.path().to_path_buf();
        let grandchildren = if metadata.is_dir() {
            walk_inner(&path, scope, category, ancestors)
        } else {
            Vec::new()
        };

        children.push(Artifact {
            format: FileFormat::from_path(&path),
            id: ArtifactId::real(path),
            scope,
            category,
            exists: true,
            is_dir: metadata.is_dir(),
            size: Some(metadata.len()),
            modified: metadata.modified().ok(),
            label: name,
            children: grandchildren,
        });
    }

    ancestors.pop();
    children
}
