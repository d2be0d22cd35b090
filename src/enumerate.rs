//! Expansion of command-line paths into the files to minify
//!
//! Directories are walked recursively in name order, symlinks are followed
//! to their real target, and every file is reported once by its canonical
//! path, even when it is reachable through several roots or links.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::infra::{FileSystem, RealFileSystem};

/// Errors that can occur while enumerating files
#[derive(Error, Debug)]
pub enum EnumerateError {
    /// A path given by the user does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A directory or entry could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Walks roots into a flat, de-duplicated list of files
pub struct FileEnumerator<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl FileEnumerator<RealFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for FileEnumerator<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Walk {
    visited_dirs: HashSet<PathBuf>,
    seen_files: HashSet<PathBuf>,
    files: Vec<PathBuf>,
}

impl<FS: FileSystem> FileEnumerator<FS> {
    /// Create an enumerator with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Expand `roots` into absolute file paths
    ///
    /// Files come out in root order, then in directory-walk order.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerateError::NotFound`] when a root does not exist and
    /// [`EnumerateError::Io`] when a directory cannot be listed.
    pub fn enumerate<P: AsRef<Path>>(&self, roots: &[P]) -> Result<Vec<PathBuf>, EnumerateError> {
        let mut walk = Walk::default();

        for root in roots {
            let root = root.as_ref();
            let canonical = self.fs.canonicalize(root).map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    EnumerateError::NotFound(root.to_path_buf())
                } else {
                    EnumerateError::Io {
                        path: root.to_path_buf(),
                        source,
                    }
                }
            })?;
            self.visit(canonical, &mut walk)?;
        }

        Ok(walk.files)
    }

    fn visit(&self, path: PathBuf, walk: &mut Walk) -> Result<(), EnumerateError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| EnumerateError::Io { path, source }
        };

        let metadata = self.fs.symlink_metadata(&path).map_err(io_err(&path))?;

        if metadata.is_file() {
            if walk.seen_files.insert(path.clone()) {
                walk.files.push(path);
            }
            return Ok(());
        }

        if !metadata.is_dir() {
            log::debug!("Skipping {}: not a regular file", path.display());
            return Ok(());
        }

        if !walk.visited_dirs.insert(path.clone()) {
            log::debug!("Already visited {}", path.display());
            return Ok(());
        }

        let mut entries = self
            .fs
            .read_dir(&path)
            .map_err(io_err(&path))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(io_err(&path))?;
        entries.sort();

        for entry in entries {
            match self.fs.canonicalize(&entry) {
                Ok(target) => self.visit(target, walk)?,
                Err(e) => log::warn!("Skipping {}: {e}", entry.display()),
            }
        }

        Ok(())
    }
}
