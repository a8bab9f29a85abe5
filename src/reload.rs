//! Rescan and rebuild the tree while keeping the user's place in it.

use crate::domain::ScanResult;
use crate::error::ScanError;
use crate::scan::ConfigScanner;
use crate::tree::{TreeModel, TreeState};
use crate::watch::watch_paths;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Owns the current scan and its tree. A reload replaces both wholesale and
/// then overlays the previous view state onto the new tree.
pub struct ReloadCoordinator {
    scanner: ConfigScanner,
    result: ScanResult,
    tree: TreeModel,
    last_scan: Duration,
}

impl ReloadCoordinator {
    /// Run the initial scan.
    pub fn start(scanner: ConfigScanner) -> Result<Self, ScanError> {
        let started = Instant::now();
        let result = scanner.scan()?;
        let tree = TreeModel::new(&result);
        Ok(Self { scanner, result, tree, last_scan: started.elapsed() })
    }

    pub fn capture_state(&self) -> TreeState {
        self.tree.capture_state()
    }

    pub fn restore_state(&mut self, state: &TreeState) {
        self.tree.restore_state(state);
    }

    /// Rescan and swap in a fresh tree carrying over expansion, selection
    /// and filter. On failure the previous scan and tree stay in place.
    pub fn reload(&mut self) -> Result<(), ScanError> {
        let state = self.capture_state();
        let started = Instant::now();
        let result = self.scanner.scan()?;
        self.last_scan = started.elapsed();

        let mut tree = TreeModel::new(&result);
        tree.set_height(self.tree.height());
        tree.restore_state(&state);

        let (exist, total) = result.file_stats();
        tracing::info!(
            exist,
            total,
            elapsed_ms = self.last_scan.as_millis() as u64,
            "configuration reloaded"
        );

        self.result = result;
        self.tree = tree;
        Ok(())
    }

    /// Paths a change watcher should follow for the current layouts.
    pub fn watch_paths(&self) -> Result<Vec<PathBuf>, ScanError> {
        Ok(watch_paths(&self.scanner.layouts()?))
    }

    pub fn result(&self) -> &ScanResult {
        &self.result
    }

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TreeModel {
        &mut self.tree
    }

    pub fn last_scan_duration(&self) -> Duration {
        self.last_scan
    }
}
