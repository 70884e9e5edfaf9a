//! `pack.mcmeta` migration
//!
//! Raises `pack.pack_format` to the target version. The value is never
//! lowered, and a file that cannot be understood is left alone with a
//! warning instead of failing the fix-up.

use std::path::Path;

use serde_json::Value;

use crate::json::{decode_text, to_pretty_json};
use crate::warning::PackWarning;

/// Result of a migration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The format was below the target and has been rewritten.
    Raised { from: i64, to: i64 },
    /// The format was already at or above the target; the file is untouched.
    Current(i64),
    /// The file could not be migrated; the file is untouched.
    Skipped(PackWarning),
}

/// Migrate the metadata file at `path` to `target` pack format.
///
/// Only a failed write is returned as an error.
pub fn migrate_pack_format(path: &Path, target: i64) -> std::io::Result<MigrationOutcome> {
    let mut contents = match read_metadata(path) {
        Ok(contents) => contents,
        Err(warning) => return Ok(skip(warning)),
    };

    let Some(format) = contents.pointer_mut("/pack/pack_format") else {
        return Ok(skip(malformed("missing \"pack.pack_format\"")));
    };
    let Some(current) = format.as_i64() else {
        return Ok(skip(malformed("\"pack.pack_format\" is not an integer")));
    };

    if current >= target {
        tracing::debug!("pack_format {} is already current", current);
        return Ok(MigrationOutcome::Current(current));
    }

    *format = Value::from(target);
    std::fs::write(path, to_pretty_json(&contents)?)?;
    tracing::info!("Raised pack_format {} -> {}", current, target);

    Ok(MigrationOutcome::Raised {
        from: current,
        to: target,
    })
}

fn read_metadata(path: &Path) -> Result<Value, PackWarning> {
    let bytes = std::fs::read(path).map_err(|e| malformed(e.to_string()))?;
    serde_json::from_str(&decode_text(&bytes)).map_err(|e| malformed(e.to_string()))
}

fn malformed(reason: impl Into<String>) -> PackWarning {
    PackWarning::MalformedMetadata {
        reason: reason.into(),
    }
}

fn skip(warning: PackWarning) -> MigrationOutcome {
    tracing::warn!("{}", warning);
    MigrationOutcome::Skipped(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TARGET: i64 = 12;

    fn write_metadata(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("pack.mcmeta");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_raises_old_format() {
        let dir = tempdir().unwrap();
        let path = write_metadata(
            dir.path(),
            r#"{"pack": {"pack_format": 9, "description": "My pack"}, "language": {}}"#,
        );

        let outcome = migrate_pack_format(&path, TARGET).unwrap();
        assert_eq!(outcome, MigrationOutcome::Raised { from: 9, to: 12 });

        let text = std::fs::read_to_string(&path).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["pack"]["pack_format"], 12);
        assert_eq!(json["pack"]["description"], "My pack");
        assert!(json["language"].is_object());

        // Field order survives the rewrite
        assert!(text.find("pack_format").unwrap() < text.find("description").unwrap());
        assert!(text.find("\"pack\"").unwrap() < text.find("\"language\"").unwrap());
    }

    #[test]
    fn test_byte_order_mark_is_accepted() {
        let dir = tempdir().unwrap();
        let path = write_metadata(
            dir.path(),
            "\u{feff}{\"pack\": {\"pack_format\": 9, \"description\": \"BOM\"}}",
        );

        let outcome = migrate_pack_format(&path, TARGET).unwrap();
        assert_eq!(outcome, MigrationOutcome::Raised { from: 9, to: 12 });

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["pack"]["pack_format"], 12);
        assert_eq!(json["pack"]["description"], "BOM");
    }

    #[test]
    fn test_current_format_is_untouched() {
        let dir = tempdir().unwrap();
        let original = r#"{"pack":{"pack_format":12,"description":"x"}}"#;
        let path = write_metadata(dir.path(), original);

        let outcome = migrate_pack_format(&path, TARGET).unwrap();
        assert_eq!(outcome, MigrationOutcome::Current(12));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_newer_format_is_never_lowered() {
        let dir = tempdir().unwrap();
        let original = r#"{"pack":{"pack_format":34}}"#;
        let path = write_metadata(dir.path(), original);

        let outcome = migrate_pack_format(&path, TARGET).unwrap();
        assert_eq!(outcome, MigrationOutcome::Current(34));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_unparsable_metadata_is_skipped() {
        let dir = tempdir().unwrap();
        let original = r#"{"pack": {"pack_format": 9,"#;
        let path = write_metadata(dir.path(), original);

        let outcome = migrate_pack_format(&path, TARGET).unwrap();
        assert!(matches!(
            outcome,
            MigrationOutcome::Skipped(PackWarning::MalformedMetadata { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_or_non_integer_format_is_skipped() {
        let dir = tempdir().unwrap();
        for original in [
            r#"{"pack": {"description": "no format"}}"#,
            r#"{"pack": {"pack_format": "12"}}"#,
            r#"{"pack": {"pack_format": 9.5}}"#,
            r#"{"pack": 3}"#,
            r#"[]"#,
        ] {
            let path = write_metadata(dir.path(), original);
            let outcome = migrate_pack_format(&path, TARGET).unwrap();
            assert!(
                matches!(outcome, MigrationOutcome::Skipped(_)),
                "{original} should be skipped"
            );
            assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        }
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempdir().unwrap();
        let outcome = migrate_pack_format(&dir.path().join("pack.mcmeta"), TARGET).unwrap();
        assert!(matches!(outcome, MigrationOutcome::Skipped(_)));
    }
}
