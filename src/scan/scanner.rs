//! Scope-aware configuration scanner

use crate::config::AppConfig;
use crate::domain::{Artifact, ArtifactId, FileFormat, ScanResult, Scope};
use crate::error::ScanError;
use crate::registry::{
    find_project_root, resolve_managed_base, resolve_user_base, BaseDir, PathEntry, ScopeLayout,
    DEFAULT_VCS_MARKER,
};
use std::path::{Path, PathBuf};

use super::sections::synthesize_sections;
use super::walk::walk_dir;

/// Scanner that discovers configuration artifacts across the managed, user
/// and project scopes.
#[derive(Debug, Clone)]
pub struct ConfigScanner {
    work_dir: Option<PathBuf>,
    managed_dir: BaseDir,
    home_dir: BaseDir,
    vcs_marker: String,
}

impl ConfigScanner {
    /// Create a scanner with platform defaults. Without a `work_dir` the
    /// process working directory is used for project detection.
    pub fn new(work_dir: Option<PathBuf>) -> Self {
        Self {
            work_dir,
            managed_dir: BaseDir::Auto,
            home_dir: BaseDir::Auto,
            vcs_marker: DEFAULT_VCS_MARKER.to_string(),
        }
    }

    /// Build a scanner from loaded configuration.
    pub fn from_config(config: &AppConfig, work_dir: Option<PathBuf>) -> Self {
        let managed_dir = if config.disable_managed {
            BaseDir::Off
        } else {
            config.managed_dir.clone().map(BaseDir::At).unwrap_or_default()
        };
        Self::new(work_dir)
            .managed_dir(managed_dir)
            .home_dir(config.home_dir.clone().map(BaseDir::At).unwrap_or_default())
            .vcs_marker(config.vcs_marker.clone())
    }

    /// Override the managed scope's base directory
    pub fn managed_dir(mut self, base: BaseDir) -> Self {
        self.managed_dir = base;
        self
    }

    /// Override the user scope's base directory (normally the home directory)
    pub fn home_dir(mut self, base: BaseDir) -> Self {
        self.home_dir = base;
        self
    }

    /// Set the directory name that marks a project root
    pub fn vcs_marker(mut self, marker: impl Into<String>) -> Self {
        self.vcs_marker = marker.into();
        self
    }

    /// Directory the project search starts from.
    pub fn work_dir(&self) -> Result<PathBuf, ScanError> {
        match &self.work_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(ScanError::WorkingDir),
        }
    }

    /// Resolve every scope's base directory, in display order. Inactive
    /// scopes are returned with no base.
    pub fn layouts(&self) -> Result<Vec<ScopeLayout>, ScanError> {
        let managed = resolve_managed_base(&self.managed_dir);
        let user = resolve_user_base(&self.home_dir);
        let work_dir = self.work_dir()?;
        let project = find_project_root(&work_dir, &self.vcs_marker);

        Ok(vec![
            ScopeLayout::new(Scope::Managed, managed),
            ScopeLayout::new(Scope::User, user),
            ScopeLayout::new(Scope::Project, project),
        ])
    }

    /// Scan all active scopes.
    ///
    /// Declared paths that do not exist are recorded as placeholders, so the
    /// only failure is an undeterminable working directory.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let layouts = self.layouts()?;
        let mut result = ScanResult::default();

        for layout in &layouts {
            if layout.scope == Scope::Project {
                result.project_root = layout.base.clone();
            }
            let artifacts = scan_layout(layout);
            tracing::debug!(
                scope = %layout.scope,
                base = ?layout.base,
                artifacts = artifacts.len(),
                "scanned scope"
            );
            *result.scope_mut(layout.scope) = artifacts;
        }

        Ok(result)
    }
}

fn scan_layout(layout: &ScopeLayout) -> Vec<Artifact> {
    layout.resolved().iter().map(|(entry, path)| scan_entry(entry, path, layout.scope)).collect()
}

fn scan_entry(entry: &PathEntry, path: &Path, scope: Scope) -> Artifact {
    let mut artifact = Artifact {
        id: ArtifactId::real(path),
        scope,
        format: FileFormat::from_path(path),
        category: entry.category,
        exists: false,
        is_dir: false,
        size: None,
        modified: None,
        label: entry.label.to_string(),
        children: Vec::new(),
    };

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return artifact,
    };

    artifact.exists = true;
    artifact.is_dir = metadata.is_dir();
    artifact.size = Some(metadata.len());
    artifact.modified = metadata.modified().ok();

    if entry.is_dir && metadata.is_dir() {
        artifact.children = walk_dir(path, scope, entry.category);
    } else if entry.category.has_sections() && metadata.is_file() {
        artifact.children = synthesize_sections(path, scope);
    }

    artifact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use std::fs;
    use tempfile::TempDir;

    /// Scanner confined to a temp tree: no managed scope, fake home.
    fn isolated_scanner(work_dir: &Path, home: &Path) -> ConfigScanner {
        ConfigScanner::new(Some(work_dir.to_path_buf()))
            .managed_dir(BaseDir::Off)
            .home_dir(BaseDir::At(home.to_path_buf()))
    }

    fn setup_project(root: &Path) -> PathBuf {
        let project = root.join("project");
        fs::create_dir_all(project.join(".git")).unwrap();
        fs::create_dir_all(project.join(".claude").join("commands")).unwrap();
        fs::write(project.join("CLAUDE.md"), "# Test").unwrap();
        fs::write(project.join(".claude").join("settings.json"), "{}").unwrap();
        project
    }

    #[test]
    fn test_scan_with_project() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        let home = temp_dir.path().join("home");
        fs::create_dir_all(&home).unwrap();

        let result = isolated_scanner(&project.join(".claude"), &home).scan().unwrap();

        assert_eq!(result.project_root.as_deref(), Some(project.as_path()));
        assert_eq!(result.project.len(), 8);
        assert!(result.managed.is_empty());

        let claude_md = result
            .project
            .iter()
            .find(|a| a.path() == project.join("CLAUDE.md"))
            .expect("CLAUDE.md entry");
        assert!(claude_md.exists);
        assert_eq!(claude_md.format, FileFormat::Markdown);
        assert_eq!(claude_md.category, Category::Instructions);
        assert_eq!(claude_md.size, Some(6));
        assert!(claude_md.modified.is_some());
    }

    #[test]
    fn test_scan_without_project() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("plain");
        fs::create_dir_all(&plain).unwrap();

        let result = isolated_scanner(&plain, temp_dir.path())
            .vcs_marker(".no-such-vcs-marker")
            .scan()
            .unwrap();

        assert_eq!(result.project_root, None);
        assert!(result.project.is_empty());
        assert_eq!(result.user.len(), 9);
    }

    #[test]
    fn test_missing_entries_are_placeholders() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());

        let result = isolated_scanner(&project, temp_dir.path()).scan().unwrap();
        let mcp = result
            .project
            .iter()
            .find(|a| a.path() == project.join(".mcp.json"))
            .expect(".mcp.json entry");

        assert!(!mcp.exists);
        assert!(!mcp.is_dir);
        assert_eq!(mcp.size, None);
        assert_eq!(mcp.modified, None);
        assert!(mcp.children.is_empty());
    }

    #[test]
    fn test_settings_file_gets_virtual_sections() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        fs::write(
            project.join(".claude").join("settings.json"),
            r#"{"hooks":{"Stop":[{"command":"x"}]}}"#,
        )
        .unwrap();
        fs::write(project.join(".mcp.json"), r#"{"mcpServers":{"db":{"command":"pg"}}}"#).unwrap();

        let result = isolated_scanner(&project, temp_dir.path()).scan().unwrap();

        let settings = &result.project[0];
        assert_eq!(settings.children.len(), 1);
        assert_eq!(settings.children[0].label, "Hooks (1)");
        assert_eq!(settings.children[0].children[0].label, "Stop");

        let mcp = result.project.iter().find(|a| a.category == Category::Mcp).unwrap();
        assert_eq!(mcp.children.len(), 1);
        let expected = format!("{}#mcpServers", project.join(".mcp.json").display());
        assert_eq!(mcp.children[0].key(), expected);
        assert_eq!(mcp.children[0].children[0].label, "db");
    }

    #[test]
    fn test_mcp_file_groups_servers_like_settings() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        fs::write(
            project.join(".mcp.json"),
            r#"{"mcpServers":{"web":{"type":"sse"},"db":{}},"hooks":{"Stop":{"command":"x"}}}"#,
        )
        .unwrap();

        let result = isolated_scanner(&project, temp_dir.path()).scan().unwrap();
        let mcp = result.project.iter().find(|a| a.category == Category::Mcp).unwrap();

        let groups: Vec<&str> = mcp.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(groups, vec!["Hooks (1)", "MCP Servers (2)"]);
        assert!(mcp.children.iter().all(|g| g.is_dir && g.is_virtual()));
        let servers: Vec<&str> = mcp.children[1].children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(servers, vec!["db", "web"]);
    }

    #[test]
    fn test_directory_entries_are_recursed() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        let commands = project.join(".claude").join("commands");
        fs::write(commands.join("deploy.md"), "deploy").unwrap();
        fs::write(commands.join(".hidden.md"), "hidden").unwrap();

        let result = isolated_scanner(&project, temp_dir.path()).scan().unwrap();
        let node = result.project.iter().find(|a| a.path() == commands).unwrap();

        assert!(node.is_dir);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].label, "deploy.md");
        assert_eq!(node.children[0].category, Category::Commands);
    }

    #[test]
    fn test_consecutive_scans_are_identical() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        fs::write(project.join(".claude").join("commands").join("a.md"), "a").unwrap();
        fs::write(project.join(".mcp.json"), r#"{"mcpServers":{"b":{},"a":{}}}"#).unwrap();

        let scanner = isolated_scanner(&project, temp_dir.path());
        let first = scanner.scan().unwrap();
        let second = scanner.scan().unwrap();

        similar_asserts::assert_eq!(first, second);
    }

    #[test]
    fn test_scope_order_with_all_scopes() {
        let temp_dir = TempDir::new().unwrap();
        let project = setup_project(temp_dir.path());
        let managed = temp_dir.path().join("managed");
        fs::create_dir_all(&managed).unwrap();

        let layouts = isolated_scanner(&project, temp_dir.path())
            .managed_dir(BaseDir::At(managed))
            .layouts()
            .unwrap();

        let scopes: Vec<Scope> = layouts.iter().map(|l| l.scope).collect();
        assert_eq!(scopes, Scope::ALL.to_vec());
        assert!(layouts.iter().all(ScopeLayout::is_active));
    }
}
