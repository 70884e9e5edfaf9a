//! Pack staging
//!
//! A directory pack is worked on in place. A zipped pack is extracted into a
//! freshly created temporary directory inside the working root, rebuilt from
//! it afterwards, and the temporary directory is removed when the
//! [`Staging`] is released or dropped. Directories that already existed are
//! never removed.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::FixupError;

/// Extension of zipped packs.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Whether `path` names a zipped pack.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// The directory a fix-up operates on.
#[derive(Debug)]
pub struct Staging {
    root: PathBuf,
    archive: Option<PathBuf>,
    temp: Option<TempDir>,
}

impl Staging {
    /// Pack root that all relative pack paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The archive this staging was extracted from, if any.
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    /// Rebuild the original archive from the staging directory.
    ///
    /// Returns the archive path, or `None` for a directory pack.
    pub fn repackage(&self) -> Result<Option<PathBuf>, FixupError> {
        let Some(archive) = &self.archive else {
            return Ok(None);
        };

        let partial = archive.with_extension(format!("{ARCHIVE_EXTENSION}.partial"));
        if let Err(e) = write_archive(&self.root, &partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
        std::fs::rename(&partial, archive).map_err(FixupError::io("replace", archive))?;

        tracing::info!("Repackaged {}", archive.display());
        Ok(Some(archive.clone()))
    }

    /// Remove the temporary directory, if one was created.
    pub fn release(mut self) -> io::Result<()> {
        match self.temp.take() {
            Some(temp) => temp.close(),
            None => Ok(()),
        }
    }
}

/// Stage `pack` for a fix-up.
///
/// Archives are extracted into a new directory under `parent` whose name
/// starts with `prefix`.
pub fn stage(pack: &Path, parent: &Path, prefix: &str) -> Result<Staging, FixupError> {
    if pack.is_dir() {
        tracing::debug!("Staging directory pack {}", pack.display());
        return Ok(Staging {
            root: pack.to_path_buf(),
            archive: None,
            temp: None,
        });
    }

    if !(pack.is_file() && is_archive(pack)) {
        return Err(FixupError::PackNotFound(pack.to_path_buf()));
    }

    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(parent)
        .map_err(FixupError::io("create a staging directory in", parent))?;
    extract_archive(pack, temp.path())?;
    tracing::debug!("Extracted {} into {}", pack.display(), temp.path().display());

    Ok(Staging {
        root: temp.path().to_path_buf(),
        archive: Some(pack.to_path_buf()),
        temp: Some(temp),
    })
}

fn extract_archive(archive: &Path, dest: &Path) -> Result<(), FixupError> {
    let file = File::open(archive).map_err(FixupError::io("open", archive))?;
    let extract_error = |source| FixupError::Extract {
        path: archive.to_path_buf(),
        source,
    };

    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(extract_error)?;
    zip.extract(dest).map_err(extract_error)
}

/// Zip every entry under `root` into `dest` with `/`-separated names, in
/// sorted order.
fn write_archive(root: &Path, dest: &Path) -> Result<(), FixupError> {
    let archive_error = |source| FixupError::Archive {
        path: dest.to_path_buf(),
        source,
    };

    let file = File::create(dest).map_err(FixupError::io("create", dest))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            FixupError::Io {
                action: "read",
                path,
                source: e.into(),
            }
        })?;
        let path = entry.path();
        let name = entry_name(path.strip_prefix(root).unwrap_or(path));

        if entry.file_type().is_dir() {
            writer.add_directory(name, options).map_err(archive_error)?;
        } else if path.is_file() {
            writer.start_file(name, options).map_err(archive_error)?;
            let mut input = File::open(path).map_err(FixupError::io("read", path))?;
            io::copy(&mut input, &mut writer).map_err(FixupError::io("archive", path))?;
        }
    }

    writer
        .finish()
        .map_err(archive_error)?
        .flush()
        .map_err(FixupError::io("write", dest))
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
