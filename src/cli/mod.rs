//! Command-line interface for config-lens
//!
//! Provides `tree`, `watch`, `merged` and `show` subcommands over the scanned
//! configuration scopes.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};

mod merged;
mod show;
mod tree;
mod utils;
mod watch;

use utils::Context;

/// Inspect layered configuration files across managed, user and project scopes
#[derive(Parser)]
#[command(name = "config-lens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to load instead of the default location
    #[arg(long, global = true, value_name = "FILE", env = "CONFIG_LENS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to start project detection from (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Base directory of the user scope (defaults to the home directory)
    #[arg(long, global = true, value_name = "DIR", env = "CONFIG_LENS_HOME_DIR")]
    home_dir: Option<PathBuf>,

    /// Base directory of the managed scope (defaults to the platform location)
    #[arg(long, global = true, value_name = "DIR", env = "CONFIG_LENS_MANAGED_DIR")]
    managed_dir: Option<PathBuf>,

    /// Skip the managed scope entirely
    #[arg(long, global = true, conflicts_with = "managed_dir")]
    no_managed: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configuration tree
    Tree(tree::TreeArgs),

    /// Print the tree and reprint it whenever configuration files change
    Watch(watch::WatchArgs),

    /// Print settings merged across scopes (Project > User > Managed)
    Merged(merged::MergedArgs),

    /// Print one artifact, or one section of a settings file via `<path>#<key>`
    Show(show::ShowArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let file_config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    let overrides = CliOverrides {
        debounce_ms: match &cli.command {
            Commands::Watch(args) => args.debounce_ms,
            _ => None,
        },
        home_dir: cli.home_dir,
        managed_dir: cli.managed_dir,
        no_managed: cli.no_managed,
        no_watch: matches!(&cli.command, Commands::Watch(args) if args.once),
    };
    let ctx = Context::new(merge_cli_with_config(file_config, overrides), cli.cwd);

    match cli.command {
        Commands::Tree(args) => tree::run(args, &ctx),
        Commands::Watch(args) => watch::run(args, &ctx),
        Commands::Merged(args) => merged::run(args, &ctx),
        Commands::Show(args) => show::run(args, &ctx),
    }
}
