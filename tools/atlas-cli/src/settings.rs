//! Settings management (settings.toml in the platform config directory)
//!
//! Holds the folder mode chosen in the menu and the fix-up constants.
//! Missing or unreadable settings fall back to defaults.

use std::path::{Path, PathBuf};

use atlas_core::fixup::{is_valid_temp_dir_name, DEFAULT_PACK_FORMAT, DEFAULT_TEMP_DIR_NAME};
use atlas_core::{FixupConfig, FolderMode};
use serde::{Deserialize, Serialize};

/// Persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub atlas: AtlasSettings,
    #[serde(default)]
    pub pack: PackSettings,
}

/// Atlas generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AtlasSettings {
    /// Singles or Folders (default: Singles)
    #[serde(default)]
    pub folder_mode: FolderMode,
}

/// Pack handling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSettings {
    /// pack_format written to pack.mcmeta (default: 12)
    #[serde(default = "default_target_format")]
    pub target_format: i64,
    /// Staging directory for zipped packs (default: atlas_logger_temp)
    #[serde(default = "default_temp_dir_name")]
    pub temp_dir_name: String,
}

fn default_target_format() -> i64 {
    DEFAULT_PACK_FORMAT
}

fn default_temp_dir_name() -> String {
    DEFAULT_TEMP_DIR_NAME.to_string()
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            target_format: default_target_format(),
            temp_dir_name: default_temp_dir_name(),
        }
    }
}

impl Settings {
    /// Fix-up configuration for packs under `root`.
    pub fn fixup_config(&self, root: &Path) -> FixupConfig {
        FixupConfig {
            root: root.to_path_buf(),
            target_pack_format: self.pack.target_format,
            temp_dir_name: self.pack.temp_dir_name.clone(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/atlas-logger`
///
/// Returns `None` if the home directory cannot be determined.
fn settings_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "Dominexis", "atlas-logger")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the settings file path, if a config directory is available.
pub fn settings_file() -> Option<PathBuf> {
    settings_dir().map(|dir| dir.join("settings.toml"))
}

/// Loads settings from disk, or defaults if absent or unparsable.
pub fn load() -> Settings {
    settings_file()
        .map(|path| load_from(&path))
        .unwrap_or_default()
}

pub fn load_from(path: &Path) -> Settings {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Settings::default();
    };
    let mut settings: Settings = match toml::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            return Settings::default();
        }
    };
    if !is_valid_temp_dir_name(&settings.pack.temp_dir_name) {
        tracing::warn!(
            "Ignoring invalid temp_dir_name {:?} in {}",
            settings.pack.temp_dir_name,
            path.display()
        );
        settings.pack.temp_dir_name = default_temp_dir_name();
    }
    settings
}

/// Saves settings to `path`, creating the directory if needed.
pub fn save_to(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write settings: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.atlas.folder_mode, FolderMode::Singles);
        assert_eq!(settings.pack.target_format, 12);
        assert_eq!(settings.pack.temp_dir_name, "atlas_logger_temp");
    }

    #[test]
    fn test_settings_deserialize_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings = toml::from_str(
            r#"
[atlas]
folder_mode = "Folders"
"#,
        )
        .unwrap();
        assert_eq!(settings.atlas.folder_mode, FolderMode::Folders);
        assert_eq!(settings.pack.target_format, 12); // default
    }

    #[test]
    fn test_settings_invalid_folder_mode() {
        let result: Result<Settings, _> = toml::from_str(
            r#"
[atlas]
folder_mode = "Everything"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/settings.toml");
        let settings = Settings {
            atlas: AtlasSettings {
                folder_mode: FolderMode::Folders,
            },
            pack: PackSettings {
                target_format: 15,
                temp_dir_name: "staging".to_string(),
            },
        };

        save_to(&path, &settings).unwrap();
        assert_eq!(load_from(&path), settings);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("missing.toml")), Settings::default());

        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[atlas\nfolder_mode =").unwrap();
        assert_eq!(load_from(&path), Settings::default());
    }

    #[test]
    fn test_load_resets_unsafe_temp_dir_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        for name in ["", "..", "../outside", "nested/dir"] {
            std::fs::write(
                &path,
                format!("[atlas]\nfolder_mode = \"Folders\"\n\n[pack]\ntemp_dir_name = {name:?}\n"),
            )
            .unwrap();

            let settings = load_from(&path);
            assert_eq!(settings.pack.temp_dir_name, "atlas_logger_temp", "{name:?}");
            assert_eq!(settings.atlas.folder_mode, FolderMode::Folders);
        }
    }

    #[test]
    fn test_fixup_config_from_settings() {
        let mut settings = Settings::default();
        settings.pack.target_format = 13;

        let config = settings.fixup_config(Path::new("/packs"));
        assert_eq!(config.root, Path::new("/packs"));
        assert_eq!(config.target_pack_format, 13);
        assert_eq!(config.temp_dir_name, "atlas_logger_temp");
    }
}
