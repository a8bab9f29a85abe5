//! Where configuration lives: per-scope base directories and the entries
//! expected under each of them.

pub mod paths;
pub mod root;

pub use paths::{
    managed_entries, project_entries, resolve_managed_base, resolve_user_base, user_entries,
    BaseDir, PathEntry, ScopeLayout,
};
pub use root::{find_project_root, DEFAULT_VCS_MARKER};
