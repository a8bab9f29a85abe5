//! Static path tables for each configuration scope.

use crate::domain::{Category, Scope};
use std::path::{Path, PathBuf};

/// One location to look for under a scope's base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    /// Relative path using `/` separators
    pub rel_path: &'static str,
    pub label: &'static str,
    pub category: Category,
    /// Scan children when the path turns out to be a directory
    pub is_dir: bool,
}

impl PathEntry {
    const fn file(rel_path: &'static str, label: &'static str, category: Category) -> Self {
        Self { rel_path, label, category, is_dir: false }
    }

    const fn dir(rel_path: &'static str, label: &'static str, category: Category) -> Self {
        Self { rel_path, label, category, is_dir: true }
    }

    /// Absolute path of this entry under `base`.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        self.rel_path.split('/').fold(base.to_path_buf(), |acc, part| acc.join(part))
    }
}

/// How a scope's base directory is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaseDir {
    /// Platform default (managed dir, home dir, or VCS root search).
    #[default]
    Auto,
    At(PathBuf),
    /// Scope disabled.
    Off,
}

/// A scope's resolved base directory together with its entries. A missing
/// base means the scope is inactive for this scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLayout {
    pub scope: Scope,
    pub base: Option<PathBuf>,
    pub entries: &'static [PathEntry],
}

impl ScopeLayout {
    pub fn new(scope: Scope, base: Option<PathBuf>) -> Self {
        let entries = match scope {
            Scope::Managed => managed_entries(),
            Scope::User => user_entries(),
            Scope::Project => project_entries(),
        };
        Self { scope, base, entries }
    }

    pub fn is_active(&self) -> bool {
        self.base.is_some()
    }

    /// Entries paired with their absolute paths; empty when inactive.
    pub fn resolved(&self) -> Vec<(PathEntry, PathBuf)> {
        match &self.base {
            Some(base) => self.entries.iter().map(|e| (*e, e.resolve(base))).collect(),
            None => Vec::new(),
        }
    }
}

const MANAGED_ENTRIES: &[PathEntry] = &[
    PathEntry::file("managed_settings.json", "Managed settings", Category::Settings),
    PathEntry::file("policies.json", "Policy file", Category::Policy),
];

const USER_ENTRIES: &[PathEntry] = &[
    PathEntry::file(".claude/settings.json", "User settings", Category::Settings),
    PathEntry::file(".claude/settings.local.json", "User local settings", Category::Settings),
    PathEntry::file(".claude.json", "Legacy global settings", Category::Settings),
    PathEntry::file(".claude/CLAUDE.md", "User instructions", Category::Instructions),
    PathEntry::file(".mcp.json", "User MCP servers", Category::Mcp),
    PathEntry::dir(".claude/commands", "User commands", Category::Commands),
    PathEntry::dir(".claude/skills", "User skills", Category::Skills),
    PathEntry::dir(".claude/agents", "User agents", Category::Agents),
    PathEntry::file(".claude/keybindings.json", "Keybindings", Category::Keybindings),
];

const PROJECT_ENTRIES: &[PathEntry] = &[
    PathEntry::file(".claude/settings.json", "Project settings", Category::Settings),
    PathEntry::file(".claude/settings.local.json", "Project local settings", Category::Settings),
    PathEntry::file("CLAUDE.md", "Project instructions", Category::Instructions),
    PathEntry::file(
        ".claude/CLAUDE.md",
        "Project instructions (alternate location)",
        Category::Instructions,
    ),
    PathEntry::file(".mcp.json", "Project MCP servers", Category::Mcp),
    PathEntry::dir(".claude/commands", "Project commands", Category::Commands),
    PathEntry::dir(".claude/skills", "Project skills", Category::Skills),
    PathEntry::dir(".claude/agents", "Project agents", Category::Agents),
];

pub fn managed_entries() -> &'static [PathEntry] {
    MANAGED_ENTRIES
}

pub fn user_entries() -> &'static [PathEntry] {
    USER_ENTRIES
}

pub fn project_entries() -> &'static [PathEntry] {
    PROJECT_ENTRIES
}

/// System-managed configuration directory for the current platform.
pub fn default_managed_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        Some(PathBuf::from("/Library/Application Support/ClaudeCode"))
    }
    #[cfg(target_os = "linux")]
    {
        Some(PathBuf::from("/etc/claude-code"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

pub fn resolve_managed_base(setting: &BaseDir) -> Option<PathBuf> {
    match setting {
        BaseDir::Auto => default_managed_dir(),
        BaseDir::At(path) => Some(path.clone()),
        BaseDir::Off => None,
    }
}

pub fn resolve_user_base(setting: &BaseDir) -> Option<PathBuf> {
    match setting {
        BaseDir::Auto => dirs::home_dir(),
        BaseDir::At(path) => Some(path.clone()),
        BaseDir::Off => None,
    }
}
