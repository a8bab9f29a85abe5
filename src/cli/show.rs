//! Show command implementation

use anyhow::{Context as _, Result};
use clap::Args;
use std::fs;
use std::path::Path;

use super::utils::{format_modified, Context};
use crate::domain::{ArtifactId, FileFormat};
use crate::jsonc::{format_jsonc, resolve_section};
use crate::utils::{display_path, read_text};

#[derive(Args)]
pub struct ShowArgs {
    /// File path, or `<path>#<group>[.<item>]` for a section of a settings file
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Print path, format, size and modification time before the content
    #[arg(short, long)]
    pub info: bool,
}

pub fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let id = ArtifactId::parse_key(&args.key);
    let path = id.owner_path();

    if args.info {
        print_info(path, ctx)?;
    }

    if id.is_virtual() {
        let value = resolve_section(&id).with_context(|| format!("Failed to resolve {}", id))?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if path.is_dir() {
        for name in list_dir(path)? {
            println!("{}", name);
        }
        return Ok(());
    }

    let text =
        read_text(path).with_context(|| format!("Failed reading {}", path.display()))?;
    match FileFormat::from_path(path) {
        FileFormat::Json | FileFormat::Jsonc => println!("{}", format_jsonc(&text)),
        FileFormat::Markdown => print!("{}", text),
    }
    Ok(())
}

fn print_info(path: &Path, ctx: &Context) -> Result<()> {
    let meta =
        fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
    println!("Path: {}", display_path(path, ctx.home().as_deref()));
    if meta.is_dir() {
        println!("Type: directory");
    } else {
        println!("Format: {}", FileFormat::from_path(path).label());
        println!("Size: {} bytes", meta.len());
    }
    if let Ok(modified) = meta.modified() {
        println!("Modified: {}", format_modified(modified));
    }
    println!();
    Ok(())
}

/// Entry names sorted, directories suffixed with `/`, hidden entries skipped.
fn list_dir(path: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("Failed listing {}", path.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.path().is_dir() {
            names.push(format!("{name}/"));
        } else {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
