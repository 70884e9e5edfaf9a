//! Pack fix-up workflow
//!
//! A fix-up moves through an explicit state machine:
//!
//! ```text
//! Idle -> Staged -> Validated -> [AwaitingOverwriteDecision] -> Updating -> Repackaged -> CleanedUp
//! ```
//!
//! Any failure, a declined overwrite, or a pack missing its required
//! structure short-cuts to `CleanedUp`. Every path into `CleanedUp` releases
//! the staging directory first.

use std::path::{Component, Path, PathBuf};

use crate::atlas::{compile, FolderMode};
use crate::metadata::{migrate_pack_format, MigrationOutcome};
use crate::scanner::scan_models;
use crate::staging::{stage, Staging};
use crate::warning::PackWarning;
use crate::{ASSETS_DIR, BLOCK_ATLAS_PATH, PACK_METADATA_FILE};

pub use crate::error::FixupError;

/// Pack format introduced alongside atlas files.
pub const DEFAULT_PACK_FORMAT: i64 = 12;

/// Name of the staging directory for zipped packs.
pub const DEFAULT_TEMP_DIR_NAME: &str = "atlas_logger_temp";

/// Settings a fix-up runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupConfig {
    /// Directory packs are looked up in and the staging directory is created in.
    pub root: PathBuf,
    /// `pack.pack_format` is raised to this value.
    pub target_pack_format: i64,
    /// Staging directory name, created under `root`.
    pub temp_dir_name: String,
}

impl FixupConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Reject a staging directory name that is not a single plain name.
    pub fn validate(&self) -> Result<(), FixupError> {
        if is_valid_temp_dir_name(&self.temp_dir_name) {
            Ok(())
        } else {
            Err(FixupError::InvalidTempDirName(self.temp_dir_name.clone()))
        }
    }

    /// Whether `name` is a staging directory created under `root`.
    pub fn is_staging_dir_name(&self, name: &str) -> bool {
        name.starts_with(&self.temp_dir_name)
    }

    /// Resolve a pack reference; relative references are taken from `root`.
    pub fn resolve_pack(&self, pack: &Path) -> PathBuf {
        if pack.is_absolute() {
            pack.to_path_buf()
        } else {
            self.root.join(pack)
        }
    }
}

/// A staging directory name must be exactly one normal path component.
pub fn is_valid_temp_dir_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            target_pack_format: DEFAULT_PACK_FORMAT,
            temp_dir_name: DEFAULT_TEMP_DIR_NAME.to_string(),
        }
    }
}

/// Asked whether an existing block atlas may be replaced.
pub trait OverwriteDecision {
    fn confirm_overwrite(&mut self, atlas: &Path) -> bool;
}

impl<F: FnMut(&Path) -> bool> OverwriteDecision for F {
    fn confirm_overwrite(&mut self, atlas: &Path) -> bool {
        self(atlas)
    }
}

impl OverwriteDecision for bool {
    fn confirm_overwrite(&mut self, _atlas: &Path) -> bool {
        *self
    }
}

/// What a completed update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupSummary {
    pub migration: MigrationOutcome,
    /// Number of distinct textures found in the models.
    pub textures: usize,
    /// Number of atlas sources written; zero when no atlas was written.
    pub sources: usize,
    /// Atlas location inside the pack, if one was written.
    pub atlas: Option<PathBuf>,
    /// The rebuilt archive, for zipped packs.
    pub archive: Option<PathBuf>,
}

/// How a fix-up that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupOutcome {
    Completed(FixupSummary),
    /// An atlas already existed and the caller kept it. Nothing was modified.
    Declined,
}

/// Everything the caller needs to report a fix-up.
#[derive(Debug)]
pub struct FixupReport {
    pub warnings: Vec<PackWarning>,
    pub result: Result<FixupOutcome, FixupError>,
}

impl FixupReport {
    pub fn is_success(&self) -> bool {
        matches!(self.result, Ok(FixupOutcome::Completed(_)))
    }

    /// One-line message for the user.
    pub fn message(&self) -> String {
        match &self.result {
            Ok(FixupOutcome::Completed(summary)) if summary.atlas.is_some() => {
                "Atlas successfully compiled!".to_string()
            }
            Ok(FixupOutcome::Completed(_)) => {
                "Atlas successfully compiled! No custom textures found, so no atlas was written."
                    .to_string()
            }
            Ok(FixupOutcome::Declined) => "Kept the existing block atlas.".to_string(),
            Err(e) => format!("ERROR: {e}"),
        }
    }
}

/// Location of the block atlas inside a pack.
pub fn atlas_path(pack_root: &Path) -> PathBuf {
    BLOCK_ATLAS_PATH
        .iter()
        .fold(pack_root.to_path_buf(), |path, part| path.join(part))
}

/// Fix the pack at `pack` (relative to `config.root` unless absolute).
///
/// `decision` is consulted only when the pack already has a block atlas.
pub fn fixup(
    config: &FixupConfig,
    pack: impl AsRef<Path>,
    folder_mode: FolderMode,
    decision: &mut dyn OverwriteDecision,
) -> FixupReport {
    let pack = config.resolve_pack(pack.as_ref());
    tracing::info!("Fixing {} ({} mode)", pack.display(), folder_mode);

    let mut fixup = Fixup {
        config,
        pack,
        folder_mode,
        decision,
        warnings: Vec::new(),
    };

    let mut state = FixupState::Idle;
    let result = loop {
        state = match state {
            FixupState::CleanedUp(result) => break result,
            state => {
                tracing::debug!("Fix-up state: {}", state.name());
                fixup.advance(state)
            }
        };
    };

    FixupReport {
        warnings: fixup.warnings,
        result,
    }
}

/// Fix-up states. Each non-terminal state owns the staging directory, so
/// it cannot leak past `CleanedUp`.
enum FixupState {
    Idle,
    Staged(Staging),
    Validated(Staging),
    AwaitingOverwriteDecision(Staging),
    Updating(Staging),
    /// The pack is updated; zipped packs still need rebuilding.
    Repackaged(Staging, FixupSummary),
    CleanedUp(Result<FixupOutcome, FixupError>),
}

impl FixupState {
    fn name(&self) -> &'static str {
        match self {
            FixupState::Idle => "Idle",
            FixupState::Staged(_) => "Staged",
            FixupState::Validated(_) => "Validated",
            FixupState::AwaitingOverwriteDecision(_) => "AwaitingOverwriteDecision",
            FixupState::Updating(_) => "Updating",
            FixupState::Repackaged(..) => "Repackaged",
            FixupState::CleanedUp(_) => "CleanedUp",
        }
    }
}

struct Fixup<'a> {
    config: &'a FixupConfig,
    pack: PathBuf,
    folder_mode: FolderMode,
    decision: &'a mut dyn OverwriteDecision,
    warnings: Vec<PackWarning>,
}

impl Fixup<'_> {
    fn advance(&mut self, state: FixupState) -> FixupState {
        match state {
            FixupState::Idle => {
                let staged = self.config.validate().and_then(|()| {
                    stage(&self.pack, &self.config.root, &self.config.temp_dir_name)
                });
                match staged {
                    Ok(staging) => FixupState::Staged(staging),
                    // A failed stage never leaves a staging directory behind
                    Err(e) => FixupState::CleanedUp(Err(e)),
                }
            }

            FixupState::Staged(staging) => match validate(staging.root()) {
                Ok(()) => FixupState::Validated(staging),
                Err(e) => clean_up(staging, Err(e)),
            },

            FixupState::Validated(staging) => {
                if atlas_path(staging.root()).exists() {
                    FixupState::AwaitingOverwriteDecision(staging)
                } else {
                    FixupState::Updating(staging)
                }
            }

            FixupState::AwaitingOverwriteDecision(staging) => {
                if self
                    .decision
                    .confirm_overwrite(&atlas_path(staging.root()))
                {
                    FixupState::Updating(staging)
                } else {
                    tracing::info!("Keeping existing block atlas");
                    clean_up(staging, Ok(FixupOutcome::Declined))
                }
            }

            FixupState::Updating(staging) => match self.update(staging.root()) {
                Ok(summary) => FixupState::Repackaged(staging, summary),
                Err(e) => clean_up(staging, Err(e)),
            },

            FixupState::Repackaged(staging, mut summary) => match staging.repackage() {
                Ok(archive) => {
                    summary.archive = archive;
                    clean_up(staging, Ok(FixupOutcome::Completed(summary)))
                }
                Err(e) => clean_up(staging, Err(e)),
            },

            done @ FixupState::CleanedUp(_) => done,
        }
    }

    /// Migrate the metadata, scan the models and rewrite the atlas.
    fn update(&mut self, root: &Path) -> Result<FixupSummary, FixupError> {
        let metadata_path = root.join(PACK_METADATA_FILE);
        let migration = migrate_pack_format(&metadata_path, self.config.target_pack_format)
            .map_err(FixupError::io("write", &metadata_path))?;
        if let MigrationOutcome::Skipped(warning) = &migration {
            self.warnings.push(warning.clone());
        }

        let scan = scan_models(root).map_err(FixupError::io("scan", &root.join(ASSETS_DIR)))?;
        self.warnings.extend(scan.warnings);

        let atlas = atlas_path(root);
        if atlas.exists() {
            std::fs::remove_file(&atlas).map_err(FixupError::io("remove", &atlas))?;
        }

        let mut summary = FixupSummary {
            migration,
            textures: scan.catalog.len(),
            sources: 0,
            atlas: None,
            archive: None,
        };

        if scan.catalog.is_empty() {
            tracing::info!("No custom textures found, no atlas written");
            return Ok(summary);
        }

        let manifest = compile(&scan.catalog, self.folder_mode);
        manifest
            .write(&atlas)
            .map_err(FixupError::io("write", &atlas))?;
        tracing::info!(
            "Wrote {} atlas sources to {}",
            manifest.sources.len(),
            atlas.display()
        );

        summary.sources = manifest.sources.len();
        summary.atlas = Some(atlas);
        Ok(summary)
    }
}

/// Require the metadata file and the assets directory at the pack root.
fn validate(root: &Path) -> Result<(), FixupError> {
    if !root.join(PACK_METADATA_FILE).is_file() {
        return Err(FixupError::MissingStructure {
            entry: PACK_METADATA_FILE,
        });
    }
    if !root.join(ASSETS_DIR).is_dir() {
        return Err(FixupError::MissingStructure { entry: ASSETS_DIR });
    }
    Ok(())
}

fn clean_up(staging: Staging, result: Result<FixupOutcome, FixupError>) -> FixupState {
    if let Err(e) = staging.release() {
        tracing::warn!("Failed to remove staging directory: {}", e);
    }
    FixupState::CleanedUp(result)
}
