//! Snapshot of view state that survives a rebuild of the tree.

use crate::domain::{ArtifactId, Scope};
use std::collections::BTreeMap;

use super::model::TreeModel;

/// Identity of a node that is stable across rescans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Scope(Scope),
    Artifact(ArtifactId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeState {
    /// Expansion of every header and every node with children
    pub expanded: BTreeMap<StateKey, bool>,
    /// Row under the cursor, if there was one
    pub selected: Option<StateKey>,
    pub cursor: usize,
    pub filter: Option<String>,
}

impl TreeModel {
    pub fn capture_state(&self) -> TreeState {
        let expanded = self
            .nodes
            .iter()
            .filter(|node| node.is_expandable())
            .map(|node| (node.state_key(), node.expanded))
            .collect();
        let selected = self.flatten().get(self.cursor).map(|&id| self.nodes[id].state_key());

        TreeState { expanded, selected, cursor: self.cursor, filter: self.filter.clone() }
    }

    /// Overlay a captured state onto a freshly built tree.
    ///
    /// Nodes absent from the snapshot keep their default expansion. The
    /// cursor follows the previously selected node when it still exists and
    /// otherwise stays at the captured index, clamped to the rows available.
    pub fn restore_state(&mut self, state: &TreeState) {
        for node in &mut self.nodes {
            if let Some(&expanded) = state.expanded.get(&node.state_key()) {
                node.expanded = expanded;
            }
        }
        self.filter = state.filter.clone();

        let rows = self.flatten();
        let found = state
            .selected
            .as_ref()
            .and_then(|key| rows.iter().position(|&id| &self.nodes[id].state_key() == key));

        self.cursor = found.unwrap_or(state.cursor);
        self.clamp_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::model::tests::{file, sample_result};

    fn select(model: &mut TreeModel, key: &str) {
        while model.selected().map(|a| a.key()).as_deref() != Some(key) {
            let before = model.cursor();
            model.move_down();
            assert_ne!(before, model.cursor(), "{key} not visible");
        }
    }

    #[test]
    fn test_capture_records_expandable_nodes() {
        let mut model = TreeModel::new(&sample_result());
        model.move_down();
        model.move_down();
        model.toggle();

        let state = model.capture_state();
        assert_eq!(state.expanded.get(&StateKey::Scope(Scope::User)), Some(&true));
        assert_eq!(state.expanded.get(&StateKey::Scope(Scope::Project)), Some(&true));
        let commands = StateKey::Artifact(ArtifactId::real("/p/.claude/commands"));
        assert_eq!(state.expanded.get(&commands), Some(&false));
        let claude_md = StateKey::Artifact(ArtifactId::real("/p/CLAUDE.md"));
        assert!(!state.expanded.contains_key(&claude_md));
        assert_eq!(state.selected, Some(StateKey::Scope(Scope::Project)));
    }

    #[test]
    fn test_restore_expansion_and_selection() {
        let mut model = TreeModel::new(&sample_result());
        model.move_down();
        model.move_down();
        model.toggle();
        select(&mut model, "/p/.claude/commands");
        model.toggle();
        select(&mut model, "/p/.claude/commands/review.md");
        let state = model.capture_state();

        let mut rebuilt = TreeModel::new(&sample_result());
        rebuilt.restore_state(&state);

        assert_eq!(rebuilt.flatten(), model.flatten());
        assert_eq!(
            rebuilt.selected().map(|a| a.key()).as_deref(),
            Some("/p/.claude/commands/review.md")
        );
    }

    #[test]
    fn test_selection_follows_node_after_insert() {
        let mut model = TreeModel::new(&sample_result());
        model.move_down();
        model.move_down();
        model.toggle();
        select(&mut model, "/p/CLAUDE.md");
        let state = model.capture_state();

        let mut result = sample_result();
        result.user.insert(0, file(Scope::User, "/h/.claude.json", "Legacy global settings"));
        let mut rebuilt = TreeModel::new(&result);
        rebuilt.restore_state(&state);

        assert_eq!(rebuilt.cursor(), state.cursor + 1);
        assert_eq!(rebuilt.selected().map(|a| a.key()).as_deref(), Some("/p/CLAUDE.md"));
    }

    #[test]
    fn test_missing_selection_clamps_cursor() {
        let mut model = TreeModel::new(&sample_result());
        model.expand_all();
        select(&mut model, "/p/.claude/commands/review.md");
        let state = model.capture_state();

        let mut result = sample_result();
        result.project[2].children.clear();
        let mut rebuilt = TreeModel::new(&result);
        rebuilt.restore_state(&state);

        let rows = rebuilt.flatten();
        assert_eq!(rebuilt.cursor(), rows.len() - 1);
        assert_eq!(rebuilt.selected().map(|a| a.key()).as_deref(), Some("/p/.claude/commands"));
    }

    #[test]
    fn test_filter_survives_restore() {
        let mut model = TreeModel::new(&sample_result());
        model.filter("commands");
        model.move_down();
        let state = model.capture_state();

        let mut rebuilt = TreeModel::new(&sample_result());
        rebuilt.restore_state(&state);
        assert_eq!(rebuilt.filter_text(), Some("commands"));
        assert_eq!(rebuilt.selected().map(|a| a.key()).as_deref(), Some("/p/.claude/commands"));
    }
}
