//! Arena-backed tree of scopes and artifacts with cursor, scroll and filter.

use crate::domain::{Artifact, ScanResult, Scope};

use super::state::StateKey;

/// Index of a node in the model's arena.
pub type NodeId = usize;

/// One row of the tree: a scope header or an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub scope: Scope,
    /// Backing artifact without its children; `None` for scope headers
    pub artifact: Option<Artifact>,
    pub expanded: bool,
    pub children: Vec<NodeId>,
    /// 0 for scope headers
    pub depth: usize,
}

impl TreeNode {
    pub fn is_header(&self) -> bool {
        self.artifact.is_none()
    }

    /// Headers always toggle; artifacts only when they have children.
    pub fn is_expandable(&self) -> bool {
        self.is_header() || !self.children.is_empty()
    }

    pub fn state_key(&self) -> StateKey {
        match &self.artifact {
            Some(artifact) => StateKey::Artifact(artifact.id.clone()),
            None => StateKey::Scope(self.scope),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeModel {
    pub(super) nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    pub(super) cursor: usize,
    offset: usize,
    height: usize,
    pub(super) filter: Option<String>,
}

impl TreeModel {
    /// Build the tree with one root per non-empty scope. Only the first root
    /// starts expanded.
    pub fn new(result: &ScanResult) -> Self {
        let mut model = TreeModel::default();

        for (scope, artifacts) in result.scopes() {
            if artifacts.is_empty() {
                continue;
            }
            let root = model.push(TreeNode {
                label: scope.label().to_string(),
                scope,
                artifact: None,
                expanded: false,
                children: Vec::new(),
                depth: 0,
            });
            let children = artifacts.iter().map(|a| model.push_artifact(a, 1)).collect();
            model.nodes[root].children = children;
            model.roots.push(root);
        }

        if let Some(&first) = model.roots.first() {
            model.nodes[first].expanded = true;
        }
        model
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn push_artifact(&mut self, artifact: &Artifact, depth: usize) -> NodeId {
        let id = self.push(TreeNode {
            label: artifact.label.clone(),
            scope: artifact.scope,
            artifact: Some(artifact.shallow()),
            expanded: false,
            children: Vec::new(),
            depth,
        });
        let children = artifact.children.iter().map(|c| self.push_artifact(c, depth + 1)).collect();
        self.nodes[id].children = children;
        id
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Ids of the visible rows in display order.
    ///
    /// Without a filter, expanded nodes reveal their children recursively.
    /// With a filter, each root shows only its direct children whose label
    /// or key contains the filter (case-insensitive), and roots without a
    /// match are dropped. Expansion is ignored while filtering.
    pub fn flatten(&self) -> Vec<NodeId> {
        let mut rows = Vec::new();

        match self.filter.as_deref() {
            Some(filter) => {
                let needle = filter.to_lowercase();
                for &root in &self.roots {
                    let matched: Vec<NodeId> = self.nodes[root]
                        .children
                        .iter()
                        .copied()
                        .filter(|&child| self.matches(child, &needle))
                        .collect();
                    if !matched.is_empty() {
                        rows.push(root);
                        rows.extend(matched);
                    }
                }
            }
            None => {
                for &root in &self.roots {
                    self.flatten_into(root, &mut rows);
                }
            }
        }

        rows
    }

    fn flatten_into(&self, id: NodeId, rows: &mut Vec<NodeId>) {
        rows.push(id);
        let node = &self.nodes[id];
        if node.expanded {
            for &child in &node.children {
                self.flatten_into(child, rows);
            }
        }
    }

    fn matches(&self, id: NodeId, needle: &str) -> bool {
        let node = &self.nodes[id];
        node.label.to_lowercase().contains(needle)
            || node.artifact.as_ref().is_some_and(|a| a.key().to_lowercase().contains(needle))
    }

    pub fn visible_nodes(&self) -> Vec<&TreeNode> {
        self.flatten().into_iter().map(|id| &self.nodes[id]).collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn filter_text(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.adjust_scroll();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.flatten().len() {
            self.cursor += 1;
            self.adjust_scroll();
        }
    }

    /// Flip the expansion of the row under the cursor. Leaves are left alone.
    pub fn toggle(&mut self) {
        let Some(&id) = self.flatten().get(self.cursor) else {
            return;
        };
        if !self.nodes[id].is_expandable() {
            return;
        }
        self.nodes[id].expanded = !self.nodes[id].expanded;
        self.clamp_cursor();
    }

    /// Expand every expandable node.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if node.is_expandable() {
                node.expanded = true;
            }
        }
    }

    /// Filter rows by `text`. An empty filter clears it.
    pub fn filter(&mut self, text: &str) {
        self.filter = (!text.is_empty()).then(|| text.to_string());
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.clamp_cursor();
    }

    /// Artifact under the cursor; `None` on a scope header or an empty tree.
    pub fn selected(&self) -> Option<&Artifact> {
        let id = *self.flatten().get(self.cursor)?;
        self.nodes[id].artifact.as_ref()
    }

    pub fn selected_scope(&self) -> Option<Scope> {
        let id = *self.flatten().get(self.cursor)?;
        Some(self.nodes[id].scope)
    }

    /// Set the number of visible rows.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.adjust_scroll();
    }

    pub(super) fn clamp_cursor(&mut self) {
        let len = self.flatten().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.adjust_scroll();
    }

    /// Keep the cursor within `[offset, offset + height)`.
    fn adjust_scroll(&mut self) {
        if self.height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        }
        if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
    }
}
