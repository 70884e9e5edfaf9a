//! atlas-core - block atlas compiler for resource packs
//!
//! Scans the model documents of a resource pack, collects every custom
//! texture they reference and writes `assets/minecraft/atlases/blocks.json`
//! so the pack keeps rendering under the atlas loading rules of pack format 12.
//!
//! The entry point is [`fixup::fixup`], which stages the pack (extracting it
//! when zipped), migrates `pack.mcmeta`, compiles the atlas, re-archives and
//! always cleans up its temporary directory.

pub mod atlas;
mod error;
pub mod fixup;
mod json;
pub mod metadata;
pub mod pack;
pub mod scanner;
pub mod staging;
pub mod texture;
pub mod warning;

pub use atlas::{compile, AtlasManifest, AtlasSource, FolderMode};
pub use fixup::{
    fixup, FixupConfig, FixupError, FixupOutcome, FixupReport, FixupSummary, OverwriteDecision,
};
pub use metadata::{migrate_pack_format, MigrationOutcome};
pub use pack::{list_packs, validate_pack_name, PackNameError};
pub use scanner::{scan_models, ScanResult};
pub use texture::{TextureCatalog, TextureReference, DEFAULT_NAMESPACE};
pub use warning::PackWarning;

/// Pack metadata file, relative to the pack root.
pub const PACK_METADATA_FILE: &str = "pack.mcmeta";

/// Assets root, relative to the pack root.
pub const ASSETS_DIR: &str = "assets";

/// Block atlas location, relative to the pack root.
pub const BLOCK_ATLAS_PATH: [&str; 4] = ["assets", "minecraft", "atlases", "blocks.json"];
