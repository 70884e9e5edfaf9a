//! Fix command - one non-interactive fix-up
//!
//! Stages the pack, migrates pack.mcmeta, rewrites the block atlas and
//! rebuilds the archive for zipped packs.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use atlas_core::{FixupOutcome, FolderMode, OverwriteDecision};
use clap::{Args, ValueEnum};

use crate::settings;
use crate::terminal;
use crate::RootArgs;

/// Atlas grouping as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One entry per texture
    Singles,
    /// One entry per texture folder
    Folders,
}

impl From<ModeArg> for FolderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Singles => FolderMode::Singles,
            ModeArg::Folders => FolderMode::Folders,
        }
    }
}

/// Arguments for the fix command
#[derive(Args)]
pub struct FixArgs {
    /// Resource pack folder or .zip (relative to the root directory)
    pub pack: PathBuf,

    /// Atlas grouping (defaults to the saved folder mode)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Overwrite an existing block atlas without asking
    #[arg(short, long, conflicts_with = "no")]
    pub yes: bool,

    /// Keep an existing block atlas without asking
    #[arg(long)]
    pub no: bool,

    /// pack_format to raise pack.mcmeta to (defaults to the saved setting)
    #[arg(long)]
    pub pack_format: Option<i64>,

    #[command(flatten)]
    pub root: RootArgs,
}

/// Execute the fix command
pub fn execute(args: FixArgs) -> Result<()> {
    let root = args.root.resolve()?;
    let settings = settings::load();

    let mut config = settings.fixup_config(&root);
    if let Some(format) = args.pack_format {
        config.target_pack_format = format;
    }
    let mode = args
        .mode
        .map(FolderMode::from)
        .unwrap_or(settings.atlas.folder_mode);

    let mut ask = |atlas: &Path| {
        terminal::confirm_overwrite(&mut io::stdin().lock(), &mut io::stdout().lock(), atlas)
    };
    let mut answer = args.yes;
    let decision: &mut dyn OverwriteDecision = if args.yes || args.no {
        &mut answer
    } else {
        &mut ask
    };

    let report = atlas_core::fixup(&config, &args.pack, mode, decision);
    print!("{}", terminal::report_lines(&report));

    match report.result {
        Ok(FixupOutcome::Completed(summary)) => {
            if let Some(archive) = summary.archive {
                tracing::info!("Updated {}", archive.display());
            }
            Ok(())
        }
        Ok(FixupOutcome::Declined) => Ok(()),
        Err(_) => bail!("Failed to fix {}", args.pack.display()),
    }
}
