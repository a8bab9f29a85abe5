//! config-lens: browse layered assistant configuration as a live tree
//!
//! Discovers managed, user and project configuration files, shows them as an
//! expandable tree, and keeps that tree current while files change on disk.

use anyhow::Result;

fn main() -> Result<()> {
    config_lens::cli::run()
}
