//! Debounced change watcher backed by the platform's notify backend.
//!
//! A worker thread folds bursts of filesystem events into a single change
//! notice. Notices and backend errors are delivered through single-slot
//! channels: when a slot is full, newer items are dropped, since one pending
//! notice already means "rescan".

use crate::error::WatchError;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

const WORKER_THREAD_NAME: &str = "config-lens-watch";

enum WorkerMsg {
    Event(notify::Result<Event>),
    Shutdown,
}

/// Watches a set of paths non-recursively and signals debounced changes.
pub struct ChangeWatcher {
    watcher: Option<RecommendedWatcher>,
    watched: BTreeSet<PathBuf>,
    control: Sender<WorkerMsg>,
    changes: Receiver<()>,
    errors: Receiver<notify::Error>,
    worker: Option<JoinHandle<()>>,
}

impl ChangeWatcher {
    /// Start watching `paths`. Paths that are missing or cannot be watched
    /// are logged and skipped; only a backend that fails to initialize is an
    /// error.
    pub fn start(paths: &[PathBuf], debounce: Duration) -> Result<Self, WatchError> {
        let (control, inbox) = mpsc::channel();
        let event_tx = control.clone();
        let watcher = notify::recommended_watcher(move |event| {
            if event_tx.send(WorkerMsg::Event(event)).is_err() {
                debug!("watch event dropped because worker channel is closed");
            }
        })?;

        let (change_tx, changes) = mpsc::sync_channel(1);
        let (error_tx, errors) = mpsc::sync_channel(1);
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(inbox, change_tx, error_tx, debounce))
            .map_err(WatchError::Spawn)?;

        let mut this = Self {
            watcher: Some(watcher),
            watched: BTreeSet::new(),
            control,
            changes,
            errors,
            worker: Some(worker),
        };
        this.update_paths(paths);
        Ok(this)
    }

    /// Re-sync the watch set: unwatch paths no longer wanted and (re)watch
    /// every wanted path that exists. Watches are re-registered even for
    /// paths already in the set, since the OS drops a watch when its path is
    /// deleted and a recreated path needs a fresh one.
    pub fn update_paths(&mut self, paths: &[PathBuf]) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };
        let wanted: BTreeSet<PathBuf> = paths.iter().cloned().collect();

        let stale: Vec<PathBuf> = self.watched.difference(&wanted).cloned().collect();
        for path in stale {
            if let Err(err) = watcher.unwatch(&path) {
                debug!(path = %path.display(), error = %err, "failed to unwatch path");
            }
            self.watched.remove(&path);
        }

        for path in wanted {
            if !path.exists() {
                if self.watched.remove(&path) {
                    debug!(path = %path.display(), "watched path disappeared");
                } else {
                    debug!(path = %path.display(), "not watching missing path");
                }
                continue;
            }
            if let Err(err) = watcher.watch(&path, RecursiveMode::NonRecursive) {
                warn!(path = %path.display(), error = %err, "failed to watch path");
                self.watched.remove(&path);
                continue;
            }
            self.watched.insert(path);
        }

        debug!(watched = self.watched.len(), "watch set updated");
    }

    pub fn watched(&self) -> impl Iterator<Item = &PathBuf> {
        self.watched.iter()
    }

    /// Block until the next debounced change. Returns `false` once the
    /// watcher has been closed.
    pub fn wait_for_change(&self) -> bool {
        self.changes.recv().is_ok()
    }

    /// Like [`wait_for_change`](Self::wait_for_change), giving up after `timeout`.
    pub fn wait_for_change_timeout(&self, timeout: Duration) -> bool {
        self.changes.recv_timeout(timeout).is_ok()
    }

    /// Most recent backend error not yet reported, if any.
    pub fn try_next_error(&self) -> Option<notify::Error> {
        self.errors.try_recv().ok()
    }

    /// Stop the worker and release the OS watch handles. Idempotent.
    pub fn close(&mut self) {
        let _ = self.control.send(WorkerMsg::Shutdown);
        self.watcher.take();
        self.watched.clear();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("watch worker panicked");
            }
        }
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_worker(
    inbox: Receiver<WorkerMsg>,
    changes: SyncSender<()>,
    errors: SyncSender<notify::Error>,
    debounce: Duration,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let msg = match deadline {
            Some(at) => match inbox.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    deadline = None;
                    signal_change(&changes);
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match inbox.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            },
        };

        match msg {
            WorkerMsg::Shutdown => break,
            WorkerMsg::Event(Ok(event)) => {
                if is_relevant(&event.kind) {
                    deadline = Some(Instant::now() + debounce);
                }
            }
            WorkerMsg::Event(Err(err)) => {
                warn!(error = %err, "watch backend error");
                report_error(&errors, err);
            }
        }
    }

    debug!("watch worker stopped");
}

fn report_error(errors: &SyncSender<notify::Error>, err: notify::Error) {
    match errors.try_send(err) {
        Ok(()) => {}
        Err(TrySendError::Full(dropped)) => {
            debug!(error = %dropped, "backend error dropped; one already pending")
        }
        Err(TrySendError::Disconnected(_)) => {}
    }
}

fn signal_change(changes: &SyncSender<()>) {
    match changes.try_send(()) {
        Ok(()) => debug!("change notice sent"),
        Err(TrySendError::Full(())) => debug!("change notice already pending"),
        Err(TrySendError::Disconnected(())) => {}
    }
}

/// Content and namespace changes count; metadata and access events do not.
fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) | EventKind::Other => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RenameMode};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_event_filter() {
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Data(DataChange::Content))));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))));
        assert!(is_relevant(&EventKind::Any));
        assert!(!is_relevant(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))));
        assert!(!is_relevant(&EventKind::Access(AccessKind::Read)));
        assert!(!is_relevant(&EventKind::Other));
    }

    #[test]
    fn test_burst_of_writes_yields_one_notice() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("settings.json");
        fs::write(&file, "{}").unwrap();

        let debounce = Duration::from_millis(DEFAULT_DEBOUNCE_MS);
        let mut watcher = ChangeWatcher::start(&[temp_dir.path().to_path_buf()], debounce).unwrap();

        for i in 0..5 {
            fs::write(&file, format!("{{\"n\": {i}}}")).unwrap();
            thread::sleep(Duration::from_millis(10));
        }

        assert!(watcher.wait_for_change_timeout(debounce + Duration::from_millis(500)));
        assert!(!watcher.wait_for_change_timeout(Duration::from_millis(500)));
        watcher.close();
    }

    #[test]
    fn test_quiet_directory_sends_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let watcher =
            ChangeWatcher::start(&[temp_dir.path().to_path_buf()], Duration::from_millis(50))
                .unwrap();
        assert!(!watcher.wait_for_change_timeout(Duration::from_millis(200)));
    }

    #[test]
    fn test_missing_paths_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().to_path_buf();
        let missing = temp_dir.path().join("does-not-exist");

        let mut watcher =
            ChangeWatcher::start(&[present.clone(), missing.clone()], Duration::from_millis(50))
                .unwrap();
        assert_eq!(watcher.watched().collect::<Vec<_>>(), vec![&present]);

        fs::create_dir(&missing).unwrap();
        watcher.update_paths(&[missing.clone()]);
        assert_eq!(watcher.watched().collect::<Vec<_>>(), vec![&missing]);
    }

    #[test]
    fn test_recreated_directory_is_watched_again() {
        let temp_dir = TempDir::new().unwrap();
        let commands = temp_dir.path().join("commands");
        fs::create_dir(&commands).unwrap();
        let paths = vec![temp_dir.path().to_path_buf(), commands.clone()];

        let debounce = Duration::from_millis(50);
        let mut watcher = ChangeWatcher::start(&paths, debounce).unwrap();

        fs::remove_dir(&commands).unwrap();
        fs::create_dir(&commands).unwrap();
        watcher.update_paths(&paths);
        assert_eq!(watcher.watched().count(), 2);

        // Drain the notice for the delete and recreate itself.
        while watcher.wait_for_change_timeout(Duration::from_millis(300)) {}

        fs::write(commands.join("new.md"), "# new").unwrap();
        assert!(
            watcher.wait_for_change_timeout(Duration::from_millis(1000)),
            "write inside recreated directory not noticed"
        );
    }

    #[test]
    fn test_vanished_path_leaves_watch_set() {
        let temp_dir = TempDir::new().unwrap();
        let agents = temp_dir.path().join("agents");
        fs::create_dir(&agents).unwrap();
        let paths = vec![temp_dir.path().to_path_buf(), agents.clone()];

        let mut watcher = ChangeWatcher::start(&paths, Duration::from_millis(50)).unwrap();
        fs::remove_dir(&agents).unwrap();
        watcher.update_paths(&paths);

        let watched: Vec<&PathBuf> = watcher.watched().collect();
        assert_eq!(watched, vec![&temp_dir.path().to_path_buf()]);
    }

    #[test]
    fn test_backend_errors_are_reported_once_per_slot() {
        let temp_dir = TempDir::new().unwrap();
        let watcher =
            ChangeWatcher::start(&[temp_dir.path().to_path_buf()], Duration::from_millis(50))
                .unwrap();

        for msg in ["first failure", "second failure"] {
            watcher.control.send(WorkerMsg::Event(Err(notify::Error::generic(msg)))).unwrap();
        }

        let mut reported = None;
        for _ in 0..50 {
            reported = watcher.try_next_error();
            if reported.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let reported = reported.expect("backend error reported");
        assert!(reported.to_string().contains("first failure"));

        // The second error arrived while the slot was full and was dropped.
        thread::sleep(Duration::from_millis(50));
        assert!(watcher.try_next_error().is_none());
    }

    #[test]
    fn test_close_unblocks_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut watcher =
            ChangeWatcher::start(&[temp_dir.path().to_path_buf()], Duration::from_millis(50))
                .unwrap();
        watcher.close();
        watcher.close();
        assert!(!watcher.wait_for_change());
    }
}
