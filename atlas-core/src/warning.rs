//! Non-fatal diagnostics collected during a fix-up.

use std::path::PathBuf;

/// A problem that was skipped over without stopping the fix-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackWarning {
    #[error("{} could not be read: {reason}", path.display())]
    UnreadableModel { path: PathBuf, reason: String },

    #[error("{} is not properly formatted: {reason}", path.display())]
    MalformedModel { path: PathBuf, reason: String },

    #[error("{} has incorrectly listed textures", path.display())]
    MalformedTextures { path: PathBuf },

    #[error("{} has an incorrect texture listed in slot \"{slot}\"", path.display())]
    MalformedTextureEntry { path: PathBuf, slot: String },

    #[error("pack.mcmeta is not formatted correctly: {reason}")]
    MalformedMetadata { reason: String },
}
