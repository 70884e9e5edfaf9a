//! List command - print the resource packs found in the root directory

use anyhow::{Context, Result};
use atlas_core::list_packs;

use crate::settings;
use crate::RootArgs;

/// Execute the list command
pub fn execute(args: RootArgs) -> Result<()> {
    let root = args.resolve()?;
    let config = settings::load().fixup_config(&root);

    let packs = list_packs(&config)
        .with_context(|| format!("Failed to read {}", root.display()))?;

    if packs.is_empty() {
        println!("No resource packs found in {}", root.display());
        return Ok(());
    }
    for pack in packs {
        println!("{pack}");
    }
    Ok(())
}
