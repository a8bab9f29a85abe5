//! Merged command implementation

use anyhow::{Context as _, Result};
use clap::Args;

use super::utils::Context;
use crate::merge::merge;

#[derive(Args)]
pub struct MergedArgs {
    /// Print the merged values as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: MergedArgs, ctx: &Context) -> Result<()> {
    let result = ctx.scanner().scan().context("Failed to scan configuration")?;
    let merged = merge(&result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        println!("{}", merged.render());
    }
    Ok(())
}
