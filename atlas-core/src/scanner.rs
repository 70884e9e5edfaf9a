//! Model scanner
//!
//! Walks `assets/<namespace>/models/**/*.json` and collects every concrete
//! texture the models reference. A model that cannot be read or parsed is
//! reported as a [`PackWarning`] and skipped; only failing to list the
//! assets directory itself is an error.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::json::decode_text;
use crate::texture::{TextureCatalog, TextureReference};
use crate::warning::PackWarning;
use crate::ASSETS_DIR;

/// Extension of model documents.
const MODEL_EXTENSION: &str = "json";

/// Prefix of a texture value that aliases another slot.
const SLOT_REFERENCE_MARKER: char = '#';

/// Textures and diagnostics gathered from one pack.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub catalog: TextureCatalog,
    pub warnings: Vec<PackWarning>,
    /// Number of model documents visited.
    pub models: usize,
}

impl ScanResult {
    fn warn(&mut self, warning: PackWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// A parsed model, kept only while its textures are read.
struct ModelDocument {
    path: PathBuf,
    textures: Option<Map<String, Value>>,
}

impl ModelDocument {
    fn parse(path: PathBuf, content: &str) -> Result<Self, PackWarning> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| PackWarning::MalformedModel {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let Value::Object(mut root) = value else {
            return Err(PackWarning::MalformedModel {
                path,
                reason: "expected a JSON object".to_string(),
            });
        };

        let textures = match root.remove("textures") {
            None => None,
            Some(Value::Object(textures)) => Some(textures),
            Some(_) => return Err(PackWarning::MalformedTextures { path }),
        };

        Ok(Self { path, textures })
    }
}

/// Scan every model in the pack rooted at `pack_root`.
pub fn scan_models(pack_root: &Path) -> io::Result<ScanResult> {
    let mut result = ScanResult::default();

    for namespace in list_namespaces(&pack_root.join(ASSETS_DIR))? {
        let models_dir = namespace.join("models");
        if !models_dir.is_dir() {
            continue;
        }
        tracing::debug!("Scanning models in {}", models_dir.display());

        for entry in WalkDir::new(&models_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(models_dir.as_path());
                    result.warn(PackWarning::UnreadableModel {
                        path: relative_to(pack_root, path),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !is_model_file(path) {
                continue;
            }

            result.models += 1;
            scan_model(pack_root, path, &mut result);
        }
    }

    tracing::info!(
        "Scanned {} models, found {} textures",
        result.models,
        result.catalog.len()
    );
    Ok(result)
}

/// Immediate subdirectories of the assets root, sorted by name.
fn list_namespaces(assets_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut namespaces = Vec::new();
    for entry in std::fs::read_dir(assets_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            namespaces.push(path);
        }
    }
    namespaces.sort();
    Ok(namespaces)
}

fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == MODEL_EXTENSION)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

fn scan_model(pack_root: &Path, path: &Path, result: &mut ScanResult) {
    let display_path = relative_to(pack_root, path);

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.warn(PackWarning::UnreadableModel {
                path: display_path,
                reason: e.to_string(),
            });
            return;
        }
    };

    let model = match ModelDocument::parse(display_path, &decode_text(&bytes)) {
        Ok(model) => model,
        Err(warning) => {
            result.warn(warning);
            return;
        }
    };

    let Some(textures) = model.textures else {
        return;
    };

    for (slot, value) in textures {
        let raw = match value {
            Value::String(raw) if !raw.is_empty() => raw,
            _ => {
                result.warn(PackWarning::MalformedTextureEntry {
                    path: model.path.clone(),
                    slot,
                });
                continue;
            }
        };

        if raw.starts_with(SLOT_REFERENCE_MARKER) {
            continue;
        }

        let texture = TextureReference::normalize(&raw);
        if texture.is_reserved() {
            continue;
        }
        if result.catalog.insert(texture) {
            tracing::debug!("{}: {} -> {}", model.path.display(), slot, raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_model(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn catalog_ids(result: &ScanResult) -> Vec<String> {
        result.catalog.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_scan_single_model() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/foo.json",
            r#"{"parent": "block/cube_all", "textures": {"all": "custom/bar"}}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(catalog_ids(&result), vec!["minecraft:custom/bar"]);
        assert!(result.warnings.is_empty());
        assert_eq!(result.models, 1);
    }

    #[test]
    fn test_scan_model_with_byte_order_mark() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/bom.json",
            "\u{feff}{\"textures\": {\"all\": \"custom/bom\"}}",
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(catalog_ids(&result), vec!["minecraft:custom/bom"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_slot_references_and_reserved_folders() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/mixed.json",
            r##"{"textures": {
                "particle": "#side",
                "side": "block/stone",
                "top": "minecraft:item/apple",
                "bottom": "block",
                "front": "mypack:block/ore"
            }}"##,
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(catalog_ids(&result), vec!["minecraft:block"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_deduplicates_across_namespaces() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/a.json",
            r#"{"textures": {"all": "custom/bar"}}"#,
        );
        write_model(
            dir.path(),
            "assets/mypack/models/item/nested/b.json",
            r#"{"textures": {"layer0": "minecraft:custom/bar", "layer1": "mypack:gear"}}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(
            catalog_ids(&result),
            vec!["minecraft:custom/bar", "mypack:gear"]
        );
        assert_eq!(result.models, 2);
    }

    #[test]
    fn test_scan_ignores_non_model_files_and_namespaces_without_models() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/notes.txt",
            r#"{"textures": {"all": "custom/ignored"}}"#,
        );
        write_model(
            dir.path(),
            "assets/other/textures/custom/bar.png.mcmeta",
            "{}",
        );
        std::fs::write(dir.path().join("assets/stray.json"), "{}").unwrap();

        let result = scan_models(dir.path()).unwrap();
        assert!(result.catalog.is_empty());
        assert_eq!(result.models, 0);
    }

    #[test]
    fn test_malformed_model_is_a_warning() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/broken.json",
            r#"{"textures": {"all": "custom/bar""#,
        );
        write_model(
            dir.path(),
            "assets/minecraft/models/block/good.json",
            r#"{"textures": {"all": "custom/good"}}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(catalog_ids(&result), vec!["minecraft:custom/good"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            PackWarning::MalformedModel { path, .. }
                if path == Path::new("assets/minecraft/models/block/broken.json")
        ));
    }

    #[test]
    fn test_non_object_textures_is_a_warning() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/list.json",
            r#"{"textures": ["custom/bar"]}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert!(result.catalog.is_empty());
        assert!(matches!(
            result.warnings.as_slice(),
            [PackWarning::MalformedTextures { .. }]
        ));
    }

    #[test]
    fn test_non_string_texture_entry_is_a_warning() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/block/entries.json",
            r#"{"textures": {"all": 5, "side": "", "top": "custom/top"}}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert_eq!(catalog_ids(&result), vec!["minecraft:custom/top"]);
        assert_eq!(result.warnings.len(), 2);
        assert!(result
            .warnings
            .iter()
            .all(|w| matches!(w, PackWarning::MalformedTextureEntry { .. })));
    }

    #[test]
    fn test_model_without_textures_is_silent() {
        let dir = tempdir().unwrap();
        write_model(
            dir.path(),
            "assets/minecraft/models/item/plain.json",
            r#"{"parent": "item/generated"}"#,
        );

        let result = scan_models(dir.path()).unwrap();
        assert!(result.catalog.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.models, 1);
    }

    #[test]
    fn test_missing_assets_dir_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(scan_models(dir.path()).is_err());
    }
}
