//! Watch command implementation

use anyhow::{Context as _, Result};
use clap::Args;
use console::Term;
use std::time::Duration;
use tracing::{info, warn};

use super::utils::{render_summary, render_tree, Context};
use crate::reload::ReloadCoordinator;
use crate::watch::ChangeWatcher;

#[derive(Args)]
pub struct WatchArgs {
    /// Quiet period before a burst of changes triggers a reload
    #[arg(long, value_name = "MS", env = "CONFIG_LENS_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Show only top-level entries whose label or path contains TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Expand every scope, directory and section group
    #[arg(short = 'a', long)]
    pub expand_all: bool,

    /// Print the tree once and exit without watching
    #[arg(long)]
    pub once: bool,
}

pub fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let mut coordinator =
        ReloadCoordinator::start(ctx.scanner()).context("Failed to scan configuration")?;
    let tree = coordinator.tree_mut();
    if args.expand_all {
        tree.expand_all();
    }
    if let Some(filter) = &args.filter {
        tree.filter(filter);
    }

    let term = Term::stdout();
    print_view(&term, &coordinator, ctx);

    if !ctx.config.watch {
        return Ok(());
    }

    let paths = coordinator.watch_paths().context("Failed to resolve watch paths")?;
    let debounce = Duration::from_millis(ctx.config.debounce_ms);
    let mut watcher = match ChangeWatcher::start(&paths, debounce) {
        Ok(watcher) => watcher,
        Err(err) => {
            warn!(error = %err, "file watching unavailable; showing a static view");
            eprintln!("Watching disabled: {}", err);
            return Ok(());
        }
    };
    info!(paths = paths.len(), debounce_ms = ctx.config.debounce_ms, "watching for changes");

    while watcher.wait_for_change() {
        while let Some(err) = watcher.try_next_error() {
            warn!(error = %err, "watch backend reported an error");
        }
        if let Err(err) = coordinator.reload() {
            warn!(error = %err, "reload failed; keeping previous view");
            continue;
        }
        match coordinator.watch_paths() {
            Ok(paths) => watcher.update_paths(&paths),
            Err(err) => warn!(error = %err, "failed to refresh watch paths"),
        }
        print_view(&term, &coordinator, ctx);
    }

    watcher.close();
    Ok(())
}

fn print_view(term: &Term, coordinator: &ReloadCoordinator, ctx: &Context) {
    if term.is_term() {
        let _ = term.clear_screen();
    }
    print!("{}", render_tree(coordinator.tree(), ctx.home().as_deref()));
    println!();
    println!("{}", render_summary(coordinator.result(), coordinator.last_scan_duration()));
}
