//! Named sections embedded in settings documents: hook events and MCP servers.

use crate::domain::{ArtifactId, SectionKey};
use crate::error::SectionError;
use crate::utils::read_text;
use serde_json::Value;

use super::parse_jsonc;

pub const HOOKS_KEY: &str = "hooks";
pub const MCP_SERVERS_KEY: &str = "mcpServers";

/// One event under the `hooks` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    pub event: String,
    /// Number of entries registered for the event
    pub count: usize,
    pub commands: Vec<String>,
}

/// One server under the `mcpServers` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerEntry {
    pub name: String,
    pub transport: Option<String>,
    pub command: Option<String>,
}

/// Hook events of a settings document, sorted by event name.
///
/// An event maps to one entry object or a list of them. Commands are read
/// from each entry's `command` field and from matcher groups that nest their
/// own `hooks` list. Events with any other shape are skipped.
pub fn parse_hooks(doc: &Value) -> Vec<HookEntry> {
    let Some(hooks) = doc.get(HOOKS_KEY).and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut entries: Vec<HookEntry> = hooks
        .iter()
        .filter_map(|(event, raw)| {
            let items: Vec<&Value> = match raw {
                Value::Array(list) => list.iter().collect(),
                Value::Object(_) => vec![raw],
                _ => return None,
            };
            let commands = items.iter().flat_map(|item| entry_commands(item)).collect();
            Some(HookEntry { event: event.clone(), count: items.len(), commands })
        })
        .collect();

    entries.sort_by(|a, b| a.event.cmp(&b.event));
    entries
}

fn entry_commands(entry: &Value) -> Vec<String> {
    let mut commands = Vec::new();
    if let Some(cmd) = entry.get("command").and_then(Value::as_str) {
        commands.push(cmd.to_string());
    }
    if let Some(nested) = entry.get(HOOKS_KEY).and_then(Value::as_array) {
        commands.extend(
            nested
                .iter()
                .filter_map(|hook| hook.get("command").and_then(Value::as_str))
                .map(str::to_string),
        );
    }
    commands
}

/// MCP servers of a settings or `.mcp.json` document, sorted by name.
/// A server whose descriptor is not an object is kept with no details.
pub fn parse_mcp_servers(doc: &Value) -> Vec<McpServerEntry> {
    let Some(servers) = doc.get(MCP_SERVERS_KEY).and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut entries: Vec<McpServerEntry> = servers
        .iter()
        .map(|(name, descriptor)| McpServerEntry {
            name: name.clone(),
            transport: descriptor.get("type").and_then(Value::as_str).map(str::to_string),
            command: descriptor.get("command").and_then(Value::as_str).map(str::to_string),
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Navigate to the value a section key points at.
pub fn section_value<'a>(doc: &'a Value, key: &SectionKey) -> Option<&'a Value> {
    let group = doc.get(&key.group)?;
    match &key.item {
        Some(item) => group.get(item),
        None => Some(group),
    }
}

/// Read the owning file of a virtual artifact and return the section it names.
pub fn resolve_section(id: &ArtifactId) -> Result<Value, SectionError> {
    let ArtifactId::Virtual { owner, section } = id else {
        return Err(SectionError::NotVirtual(id.key()));
    };

    let raw = read_text(owner)
        .map_err(|source| SectionError::Read { path: owner.clone(), source })?;
    let doc = parse_jsonc(&raw)?;

    section_value(&doc, section).cloned().ok_or_else(|| SectionError::Missing(section.to_string()))
}
