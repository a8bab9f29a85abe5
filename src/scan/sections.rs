//! Virtual artifacts for the sections embedded in settings and MCP files.

use crate::domain::{Artifact, ArtifactId, Category, FileFormat, Scope, SectionKey};
use crate::jsonc::{parse_hooks, parse_jsonc, parse_mcp_servers, HOOKS_KEY, MCP_SERVERS_KEY};
use crate::utils::read_text;
use serde_json::Value;
use std::path::Path;

/// Read, normalize and parse `path`, then build its section groups.
///
/// Best effort: an unreadable or unparsable file simply has no sections.
pub fn synthesize_sections(path: &Path, scope: Scope) -> Vec<Artifact> {
    let raw = match read_text(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping sections: unreadable");
            return Vec::new();
        }
    };

    match parse_jsonc(&raw) {
        Ok(doc) => section_groups(path, scope, &doc),
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "skipping sections: invalid JSON"
            );
            Vec::new()
        }
    }
}

/// One group per non-empty section kind (hooks first, then MCP servers),
/// each holding one leaf per item in name order.
pub fn section_groups(path: &Path, scope: Scope, doc: &Value) -> Vec<Artifact> {
    let mut groups = Vec::new();

    let hooks = parse_hooks(doc);
    if !hooks.is_empty() {
        let label = format!("Hooks ({})", hooks.len());
        let items = hooks.into_iter().map(|h| h.event);
        groups.push(group(path, scope, HOOKS_KEY, Category::Hooks, label, items));
    }

    let servers = parse_mcp_servers(doc);
    if !servers.is_empty() {
        let label = format!("MCP Servers ({})", servers.len());
        let items = servers.into_iter().map(|s| s.name);
        groups.push(group(path, scope, MCP_SERVERS_KEY, Category::Mcp, label, items));
    }

    groups
}

fn group(
    owner: &Path,
    scope: Scope,
    key: &str,
    category: Category,
    label: String,
    items: impl Iterator<Item = String>,
) -> Artifact {
    let children = items
        .map(|name| {
            let id = ArtifactId::section(owner, SectionKey::item(key, name.clone()));
            virtual_artifact(id, scope, category, name, false, Vec::new())
        })
        .collect();
    let id = ArtifactId::section(owner, SectionKey::group(key));
    virtual_artifact(id, scope, category, label, true, children)
}

fn virtual_artifact(
    id: ArtifactId,
    scope: Scope,
    category: Category,
    label: String,
    is_dir: bool,
    children: Vec<Artifact>,
) -> Artifact {
    Artifact {
        id,
        scope,
        format: FileFormat::Json,
        category,
        exists: true,
        is_dir,
        size: None,
        modified: None,
        label,
        children,
    }
}
