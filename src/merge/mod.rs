//! Effective settings: every scope's settings files flattened into dotted
//! keys, with later scopes overriding earlier ones.

use crate::domain::{Artifact, Category, FileFormat, ScanResult, Scope};
use crate::jsonc::parse_jsonc;
use crate::utils::read_text;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

const MAX_VALUE_CHARS: usize = 60;

/// A leaf setting and the scope it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcedValue {
    /// Dotted path, e.g. `permissions.allow`
    pub key: String,
    pub value: Value,
    pub scope: Scope,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedConfig {
    /// Sorted by key
    pub values: Vec<SourcedValue>,
}

/// Merge settings files of all scopes, Managed first and Project last.
/// Files that cannot be read or parsed are skipped.
pub fn merge(result: &ScanResult) -> MergedConfig {
    let mut merged = BTreeMap::new();
    for (scope, artifacts) in result.scopes() {
        apply_scope(&mut merged, artifacts, scope);
    }
    MergedConfig { values: merged.into_values().collect() }
}

fn apply_scope(merged: &mut BTreeMap<String, SourcedValue>, artifacts: &[Artifact], scope: Scope) {
    let settings = artifacts.iter().filter(|a| {
        a.exists && !a.is_dir && a.format == FileFormat::Json && a.category == Category::Settings
    });

    for artifact in settings {
        if let Some(Value::Object(obj)) = read_document(artifact.path()) {
            flatten("", &obj, scope, merged);
        }
    }
}

fn read_document(path: &Path) -> Option<Value> {
    let raw = match read_text(path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping unreadable settings");
            return None;
        }
    };
    match parse_jsonc(&raw) {
        Ok(doc) => Some(doc),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping invalid settings");
            None
        }
    }
}

fn flatten(
    prefix: &str,
    obj: &Map<String, Value>,
    scope: Scope,
    out: &mut BTreeMap<String, SourcedValue>,
) {
    for (k, v) in obj {
        let key = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
        match v {
            Value::Object(nested) => flatten(&key, nested, scope, out),
            _ => {
                out.insert(key.clone(), SourcedValue { key, value: v.clone(), scope });
            }
        }
    }
}

impl MergedConfig {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SourcedValue> {
        self.values.iter().find(|v| v.key == key)
    }

    /// Human-readable table of the merged values.
    pub fn render(&self) -> String {
        if self.values.is_empty() {
            return "(no settings to merge)".to_string();
        }

        let mut out = String::new();
        out.push_str("Merged Settings (Project > User > Managed)\n");
        out.push_str(&"─".repeat(50));
        out.push_str("\n\n");

        for v in &self.values {
            let value = truncate(&render_value(&v.value), MAX_VALUE_CHARS);
            let _ = writeln!(out, "  {:<35} = {:<20} [{}]", v.key, value, v.scope);
        }
        out
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars - 3).collect();
    format!("{head}...")
}
