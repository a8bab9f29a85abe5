//! Shared CLI utilities.

use chrono::{DateTime, Local};
use console::{style, Color};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::AppConfig;
use crate::domain::{ScanResult, Scope};
use crate::scan::ConfigScanner;
use crate::tree::{TreeModel, TreeNode};
use crate::utils::display_path;

/// Resolved settings for one command invocation.
pub struct Context {
    pub config: AppConfig,
    pub work_dir: Option<PathBuf>,
}

impl Context {
    pub fn new(config: AppConfig, work_dir: Option<PathBuf>) -> Self {
        Self { config, work_dir }
    }

    pub fn scanner(&self) -> ConfigScanner {
        ConfigScanner::from_config(&self.config, self.work_dir.clone())
    }

    /// Directory abbreviated to `~` in displayed paths.
    pub fn home(&self) -> Option<PathBuf> {
        self.config.home_dir.clone().or_else(dirs::home_dir)
    }
}

fn scope_color(scope: Scope) -> Color {
    match scope {
        Scope::Managed => Color::Red,
        Scope::User => Color::Green,
        Scope::Project => Color::Cyan,
    }
}

/// Render the visible rows of `tree`, one per line.
pub fn render_tree(tree: &TreeModel, home: Option<&Path>) -> String {
    let mut out = String::new();
    for node in tree.visible_nodes() {
        out.push_str(&render_node(node, home));
        out.push('\n');
    }
    out
}

fn render_node(node: &TreeNode, home: Option<&Path>) -> String {
    let arrow = if node.expanded { "▼" } else { "▶" };
    let Some(artifact) = &node.artifact else {
        let title = style(node.label.to_uppercase()).bold().fg(scope_color(node.scope));
        return format!("{arrow} {title}");
    };

    let indent = "  ".repeat(node.depth);
    if !node.children.is_empty() {
        return format!("{indent}{arrow} {} ({})", style(&node.label).cyan(), node.children.len());
    }

    let marker = if artifact.exists { style("●").green() } else { style("○").dim() };
    let mut line = format!("{indent}{marker} {}", node.label);
    if node.depth == 1 && !artifact.is_virtual() {
        let _ = write!(line, "  {}", style(display_path(artifact.path(), home)).dim());
    }
    line
}

/// One-line footer: existing vs declared files and scan time.
pub fn render_summary(result: &ScanResult, elapsed: Duration) -> String {
    let (exist, total) = result.file_stats();
    let project = match &result.project_root {
        Some(root) => root.display().to_string(),
        None => "none".to_string(),
    };
    format!(
        "{exist}/{total} files present · project: {project} · scanned in {}ms",
        elapsed.as_millis()
    )
}

pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M:%S").to_string()
}
