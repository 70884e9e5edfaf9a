use std::io;
use std::path::{Path, PathBuf};

use zip::result::ZipError;

/// Why a fix-up stopped before completing.
#[derive(Debug, thiserror::Error)]
pub enum FixupError {
    #[error("Resource pack does not exist: {}", .0.display())]
    PackNotFound(PathBuf),

    /// The staging directory name is not a plain directory name.
    #[error("Invalid staging directory name: \"{0}\"")]
    InvalidTempDirName(String),

    /// A required entry is missing from the pack root. Nothing was modified.
    #[error("\"{entry}\" does not exist!")]
    MissingStructure { entry: &'static str },

    #[error("Failed to extract {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Failed to archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FixupError {
    /// `map_err` adapter for filesystem failures on `path`.
    pub(crate) fn io<'a>(
        action: &'static str,
        path: &'a Path,
    ) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| FixupError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the pack was left untouched because it is not a valid pack.
    pub fn is_structural(&self) -> bool {
        matches!(self, FixupError::MissingStructure { .. })
    }
}
