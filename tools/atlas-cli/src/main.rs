//! Atlas Logger - block atlas fixer for resource packs
//!
//! # Commands
//!
//! - `atlas-logger` / `atlas-logger menu` - Interactive menu
//! - `atlas-logger fix <PACK>` - Fix one pack and exit
//! - `atlas-logger list` - List the packs in the working directory
//!
//! # Usage
//!
//! Run from the directory holding your resource packs:
//! ```bash
//! # Pick a pack from the menu
//! atlas-logger
//!
//! # Fix a zipped pack, grouping textures by folder, replacing any atlas
//! atlas-logger fix "My Pack.zip" --mode folders --yes
//! ```
//!
//! # Settings (settings.toml)
//!
//! ```toml
//! [atlas]
//! folder_mode = "Singles"
//!
//! [pack]
//! target_format = 12
//! temp_dir_name = "atlas_logger_temp"
//! ```

mod fix;
mod list;
mod menu;
mod settings;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

/// Atlas Logger - block atlas fixer for resource packs
#[derive(Parser)]
#[command(name = "atlas-logger")]
#[command(about = "Writes block atlases for resource packs updated to pack format 12")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log progress to stderr (-vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu(RootArgs),

    /// Fix a single resource pack
    Fix(fix::FixArgs),

    /// List the resource packs found in the root directory
    List(RootArgs),
}

/// Where packs are looked up.
#[derive(Args, Clone, Default)]
pub struct RootArgs {
    /// Directory holding the resource packs (defaults to current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

impl RootArgs {
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Failed to get current directory"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        None => menu::execute(RootArgs::default()),
        Some(Commands::Menu(args)) => menu::execute(args),
        Some(Commands::Fix(args)) => fix::execute(args),
        Some(Commands::List(args)) => list::execute(args),
    }
}
