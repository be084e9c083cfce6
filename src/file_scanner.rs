use crate::error::EngineError;
use crate::grammar::is_video_file;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One file in the target directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub modified: SystemTime,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            modified,
        }
    }
}

/// The filesystem calls the engine needs.
pub trait Filesystem {
    fn list_entries(&self, dir: &Path) -> Result<Vec<DirEntry>, EngineError>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), EngineError>;
    fn remove(&self, path: &Path) -> Result<(), EngineError>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Absolute form of an existing directory, as stored in the config.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, EngineError>;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn list_entries(&self, dir: &Path) -> Result<Vec<DirEntry>, EngineError> {
        let list_err = |source| EngineError::ListFailed {
            path: dir.to_path_buf(),
            source,
        };

        if !dir.is_dir() {
            return Err(EngineError::NotADirectory(dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let path_buf = entry.path();
            if !path_buf.is_file() {
                continue;
            }
            let Some(name) = path_buf.file_name().and_then(|n| n.to_str()) else {
                debug!("Skipping non UTF-8 file name {}", path_buf.display());
                continue;
            };
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(e) => {
                    warn!("No modification time for {}: {}", path_buf.display(), e);
                    UNIX_EPOCH
                }
            };
            entries.push(DirEntry::new(name, modified));
        }
        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), EngineError> {
        fs::rename(from, to).map_err(|source| EngineError::RenameFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
    }

    fn remove(&self, path: &Path) -> Result<(), EngineError> {
        fs::remove_file(path).map_err(|source| EngineError::RemoveFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, EngineError> {
        dunce::canonicalize(path).map_err(|source| EngineError::ListFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Video files in `video_dir`, newest name first.
pub fn scan_video_files<F: Filesystem + ?Sized>(
    fs: &F,
    video_dir: &Path,
) -> Result<Vec<DirEntry>, EngineError> {
    let mut files: Vec<DirEntry> = fs
        .list_entries(video_dir)?
        .into_iter()
        .filter(|e| is_video_file(&e.name))
        .collect();

    files.sort_by(|a, b| b.name.cmp(&a.name));

    Ok(files)
}
