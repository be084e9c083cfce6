//! In-memory filesystem for unit tests.

use crate::error::EngineError;
use crate::file_scanner::{DirEntry, Filesystem};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Default)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, SystemTime>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    locked: HashSet<PathBuf>,
    pub calls: RefCell<Vec<String>>,
}

impl MemoryFs {
    pub fn with_files(dir: &Path, names: &[&str]) -> Self {
        let fs = Self::default();
        fs.add_dir(dir);
        for (i, name) in names.iter().enumerate() {
            fs.add(dir, name, i as u64);
        }
        fs
    }

    pub fn add(&self, dir: &Path, name: &str, secs: u64) {
        self.files
            .borrow_mut()
            .insert(dir.join(name), UNIX_EPOCH + Duration::from_secs(secs));
    }

    pub fn add_dir(&self, dir: &Path) {
        self.dirs.borrow_mut().insert(dir.to_path_buf());
    }

    /// Any rename or remove touching `path` fails.
    pub fn lock(&mut self, path: PathBuf) {
        self.locked.insert(path);
    }

    pub fn names(&self) -> Vec<String> {
        self.files
            .borrow()
            .keys()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect()
    }

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "file in use")
    }
}

impl Filesystem for MemoryFs {
    fn list_entries(&self, dir: &Path) -> Result<Vec<DirEntry>, EngineError> {
        Ok(self
            .files
            .borrow()
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .filter_map(|(p, t)| {
                let name = p.file_name()?.to_str()?;
                Some(DirEntry::new(name, *t))
            })
            .collect())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), EngineError> {
        self.calls
            .borrow_mut()
            .push(format!("rename {} -> {}", from.display(), to.display()));
        let fail = |source| EngineError::RenameFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        };
        if self.locked.contains(from) || self.locked.contains(to) {
            return Err(fail(Self::denied()));
        }
        let mut files = self.files.borrow_mut();
        let time = files
            .remove(from)
            .ok_or_else(|| fail(io::Error::from(io::ErrorKind::NotFound)))?;
        files.insert(to.to_path_buf(), time);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), EngineError> {
        self.calls
            .borrow_mut()
            .push(format!("remove {}", path.display()));
        let fail = |source| EngineError::RemoveFailed {
            path: path.to_path_buf(),
            source,
        };
        if self.locked.contains(path) {
            return Err(fail(Self::denied()));
        }
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| fail(io::Error::from(io::ErrorKind::NotFound)))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, EngineError> {
        if self.is_dir(path) {
            Ok(path.to_path_buf())
        } else {
            Err(EngineError::ListFailed {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
        }
    }
}
