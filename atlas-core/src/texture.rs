//! Texture references and the catalog they are collected into.

use std::collections::BTreeSet;
use std::fmt;

/// Namespace assumed when a reference omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Top-level texture folders already stitched by the runtime's default atlas.
const RESERVED_FOLDERS: [&str; 2] = ["block", "item"];

/// A normalized `namespace:path` texture identifier.
///
/// Ordering and equality are those of the normalized string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureReference {
    id: String,
    separator: usize,
}

impl TextureReference {
    /// Normalize a raw texture string from a model, adding the default
    /// namespace when none is given.
    pub fn normalize(raw: &str) -> Self {
        match raw.find(':') {
            Some(separator) => Self {
                id: raw.to_string(),
                separator,
            },
            None => Self {
                id: format!("{DEFAULT_NAMESPACE}:{raw}"),
                separator: DEFAULT_NAMESPACE.len(),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        &self.id[..self.separator]
    }

    /// Path relative to the namespace's `textures/` directory.
    pub fn path(&self) -> &str {
        &self.id[self.separator + 1..]
    }

    /// First segment of the path, if the path has more than one segment.
    pub fn folder(&self) -> Option<&str> {
        self.path().split_once('/').map(|(folder, _)| folder)
    }

    /// Whether the runtime's default atlas already covers this texture.
    ///
    /// A bare `block` or `item` texture is not inside either folder and is
    /// therefore not covered.
    pub fn is_reserved(&self) -> bool {
        self.folder()
            .is_some_and(|folder| RESERVED_FOLDERS.contains(&folder))
    }
}

impl fmt::Display for TextureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Unique texture references found during one scan, iterated in
/// lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureCatalog {
    entries: BTreeSet<TextureReference>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reference. Returns `false` if it was already present.
    pub fn insert(&mut self, texture: TextureReference) -> bool {
        self.entries.insert(texture)
    }

    pub fn contains(&self, texture: &TextureReference) -> bool {
        self.entries.contains(texture)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureReference> {
        self.entries.iter()
    }
}

impl FromIterator<TextureReference> for TextureCatalog {
    fn from_iter<I: IntoIterator<Item = TextureReference>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TextureCatalog {
    type Item = &'a TextureReference;
    type IntoIter = std::collections::btree_set::Iter<'a, TextureReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
