//! Tree command implementation

use anyhow::{Context as _, Result};
use clap::Args;
use std::time::Instant;

use super::utils::{render_summary, render_tree, Context};
use crate::tree::TreeModel;

#[derive(Args)]
pub struct TreeArgs {
    /// Show only top-level entries whose label or path contains TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// Expand every scope, directory and section group
    #[arg(short = 'a', long)]
    pub expand_all: bool,

    /// Print the raw scan result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TreeArgs, ctx: &Context) -> Result<()> {
    let started = Instant::now();
    let result = ctx.scanner().scan().context("Failed to scan configuration")?;
    let elapsed = started.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut tree = TreeModel::new(&result);
    if args.expand_all {
        tree.expand_all();
    }
    if let Some(filter) = &args.filter {
        tree.filter(filter);
    }

    if tree.flatten().is_empty() {
        match &args.filter {
            Some(filter) => println!("No entries match '{}'", filter),
            None => println!("No configuration scopes found"),
        }
    } else {
        print!("{}", render_tree(&tree, ctx.home().as_deref()));
    }
    println!();
    println!("{}", render_summary(&result, elapsed));

    Ok(())
}
