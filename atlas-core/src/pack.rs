//! Finding resource packs in the working root.

use std::path::PathBuf;

use crate::fixup::FixupConfig;
use crate::staging::is_archive;
use crate::PACK_METADATA_FILE;

/// Characters that may not appear in a typed pack name.
const ILLEGAL_NAME_CHARS: [char; 8] = ['/', '\\', '?', '<', '>', ':', '"', '|'];

/// Why a typed pack name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackNameError {
    #[error("Cannot use an empty string!")]
    Empty,

    #[error("Cannot use illegal characters in file names! ('{0}')")]
    IllegalCharacter(char),

    /// `.`, `..` and other all-dot names point at the root or its parents.
    #[error("Cannot use \"{0}\" as a resource pack name!")]
    OnlyDots(String),

    #[error("Resource pack does not exist!")]
    NotFound(String),
}

/// Names of the packs in the working root: folders holding a
/// `pack.mcmeta`, and zip files. Sorted by name.
pub fn list_packs(config: &FixupConfig) -> std::io::Result<Vec<String>> {
    let mut packs = Vec::new();

    for entry in std::fs::read_dir(&config.root)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if config.is_staging_dir_name(&name) {
            continue;
        }

        let is_folder_pack = path.is_dir() && path.join(PACK_METADATA_FILE).is_file();
        let is_zip_pack = path.is_file() && is_archive(&path);
        if is_folder_pack || is_zip_pack {
            packs.push(name);
        }
    }

    packs.sort();
    Ok(packs)
}

/// Check a pack name typed by the user and resolve it against the root.
pub fn validate_pack_name(config: &FixupConfig, name: &str) -> Result<PathBuf, PackNameError> {
    if name.is_empty() {
        return Err(PackNameError::Empty);
    }
    if let Some(c) = name.chars().find(|c| ILLEGAL_NAME_CHARS.contains(c)) {
        return Err(PackNameError::IllegalCharacter(c));
    }
    if name.chars().all(|c| c == '.') {
        return Err(PackNameError::OnlyDots(name.to_string()));
    }

    let path = config.root.join(name);
    if !path.exists() {
        return Err(PackNameError::NotFound(name.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_packs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Folder Pack")).unwrap();
        std::fs::write(root.join("Folder Pack/pack.mcmeta"), "{}").unwrap();
        std::fs::create_dir_all(root.join("not-a-pack")).unwrap();
        std::fs::write(root.join("Zipped.zip"), b"").unwrap();
        std::fs::write(root.join("readme.txt"), b"").unwrap();
        std::fs::create_dir_all(root.join("atlas_logger_tempA1b2C3")).unwrap();
        std::fs::write(root.join("atlas_logger_tempA1b2C3/pack.mcmeta"), "{}").unwrap();

        let config = FixupConfig::new(root);
        assert_eq!(list_packs(&config).unwrap(), vec!["Folder Pack", "Zipped.zip"]);
    }

    #[test]
    fn test_validate_pack_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pack.zip"), b"").unwrap();
        let config = FixupConfig::new(dir.path());

        assert_eq!(
            validate_pack_name(&config, "pack.zip"),
            Ok(dir.path().join("pack.zip"))
        );
        assert_eq!(validate_pack_name(&config, ""), Err(PackNameError::Empty));
        assert_eq!(
            validate_pack_name(&config, "../pack.zip"),
            Err(PackNameError::IllegalCharacter('/'))
        );
        assert_eq!(
            validate_pack_name(&config, "c:pack"),
            Err(PackNameError::IllegalCharacter(':'))
        );
        assert_eq!(
            validate_pack_name(&config, "."),
            Err(PackNameError::OnlyDots(".".to_string()))
        );
        assert_eq!(
            validate_pack_name(&config, ".."),
            Err(PackNameError::OnlyDots("..".to_string()))
        );
        assert_eq!(
            validate_pack_name(&config, "missing.zip"),
            Err(PackNameError::NotFound("missing.zip".to_string()))
        );
    }
}
