//! Atlas compiler
//!
//! Turns a [`TextureCatalog`] into the `sources` list of a block atlas.
//! Directory sources always come before single sources so folder wildcards
//! are declared ahead of individual textures.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::json::to_pretty_json;
use crate::texture::TextureCatalog;

/// How textures are grouped into atlas sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FolderMode {
    /// One `single` source per texture. Nothing unwanted gets stitched,
    /// at the cost of a longer file.
    #[default]
    Singles,
    /// One `directory` source per top-level texture folder. Shorter and
    /// easier to edit, but stitches every texture in those folders.
    Folders,
}

impl FolderMode {
    pub fn name(self) -> &'static str {
        match self {
            FolderMode::Singles => "Singles",
            FolderMode::Folders => "Folders",
        }
    }
}

impl fmt::Display for FolderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the atlas `sources` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AtlasSource {
    /// Every texture under `source`, registered with `prefix`.
    Directory { source: String, prefix: String },
    /// Exactly one texture.
    Single { resource: String },
}

impl AtlasSource {
    pub fn directory(folder: &str) -> Self {
        AtlasSource::Directory {
            source: folder.to_string(),
            prefix: format!("{folder}/"),
        }
    }

    pub fn single(resource: impl Into<String>) -> Self {
        AtlasSource::Single {
            resource: resource.into(),
        }
    }
}

/// Contents of `assets/minecraft/atlases/blocks.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub sources: Vec<AtlasSource>,
}

impl AtlasManifest {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        to_pretty_json(self)
    }

    /// Write the manifest, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let bytes = self.to_json()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)
    }
}

/// Build the atlas sources for a catalog.
pub fn compile(catalog: &TextureCatalog, mode: FolderMode) -> AtlasManifest {
    let mut folders = BTreeSet::new();
    let mut singles = Vec::new();

    for texture in catalog {
        match (mode, texture.folder()) {
            (FolderMode::Folders, Some(folder)) => {
                folders.insert(folder);
            }
            _ => singles.push(AtlasSource::single(texture.as_str())),
        }
    }

    let mut sources: Vec<AtlasSource> = folders.into_iter().map(AtlasSource::directory).collect();
    sources.extend(singles);

    AtlasManifest { sources }
}
