//! Filesystem plumbing: reading content files and writing generated pages.
//!
//! Nothing here knows about sites, sections, or posts. The config parser uses
//! [`read_file`] and [`read_dir_files`] to eagerly load section sources; the
//! generator uses [`clean_and_recreate`] once and then [`write_page`] per
//! rendered artifact.
//!
//! Directory reads are single-level and sorted by file name so that every run
//! sees the same order regardless of what the OS returns.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot list directory {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A content file loaded into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    /// Full path the file was read from.
    pub path: PathBuf,
    /// Final path component, extension included (`my-post.md`).
    pub file_name: String,
    pub contents: String,
}

/// Read one file into a [`FileData`].
pub fn read_file(path: &Path) -> Result<FileData, FileError> {
    let contents = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FileData {
        path: path.to_path_buf(),
        file_name,
        contents,
    })
}

/// Read every regular file directly inside `dir`, sorted by file name.
///
/// Subdirectories are ignored (non-recursive). Hidden files (leading `.`) are
/// skipped so editor swap files and `.DS_Store` never become posts. The first
/// unreadable file aborts the whole listing.
pub fn read_dir_files(dir: &Path) -> Result<Vec<FileData>, FileError> {
    let list_err = |source| FileError::List {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|p| read_file(p)).collect()
}

/// Remove `dir` with everything in it, then create it empty.
///
/// Must run once before any page is written.
pub fn clean_and_recreate(dir: &Path) -> Result<(), FileError> {
    let write_err = |source| FileError::Write {
        path: dir.to_path_buf(),
        source,
    };
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(write_err)?;
    }
    fs::create_dir_all(dir).map_err(write_err)
}

/// Write `contents` to `location` below `base`, creating parent directories.
///
/// `location` is a site path such as `/blog/my-post.html`; the leading slash
/// is dropped so the file always lands inside `base`. Returns the full path
/// written.
pub fn write_page(base: &Path, location: &str, contents: &str) -> Result<PathBuf, FileError> {
    let full_path = base.join(location.trim_start_matches('/'));
    let write_err = |source| FileError::Write {
        path: full_path.clone(),
        source,
    };
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(&full_path, contents).map_err(write_err)?;
    Ok(full_path)
}
