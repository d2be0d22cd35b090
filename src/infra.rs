//! Infrastructure traits for abstracting I/O operations.
//!
//! This module provides trait abstractions for filesystem and command execution operations,
//! so the guard, the compactors and the tool runner can be exercised against mocks.

use std::fs::{Metadata, ReadDir};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Trait for abstracting filesystem operations.
///
/// Every mutation goes through [`FileSystem::write_atomic`]: a file is either
/// replaced as a whole or left as it was.
pub trait FileSystem {
    /// Read the entire contents of a file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of a file in one step.
    fn write_atomic(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()>;

    /// Copy a file from one location to another.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Get metadata for a path without following symlinks.
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Resolve a path to its canonical, absolute form with all symlinks resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Read the contents of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<ReadDir>;
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        // Replacing a symlink would detach it from its target
        let target = match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => std::fs::canonicalize(path)?,
            _ => path.to_path_buf(),
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(contents.as_ref())?;
        temp.as_file().sync_all()?;

        if let Ok(meta) = std::fs::metadata(&target) {
            std::fs::set_permissions(temp.path(), meta.permissions())?;
        }

        temp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        std::fs::symlink_metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<ReadDir> {
        std::fs::read_dir(path)
    }
}

/// Trait for abstracting command execution.
///
/// External minifiers are only ever run through this trait, so adapters can
/// be tested without the tools being installed.
pub trait CommandExecutor {
    /// Execute a command and return its output (stdout, stderr, status).
    fn output(&self, cmd: &mut Command) -> io::Result<Output>;

    /// Execute a command built with a closure and return its output.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use uniminify::infra::{CommandExecutor, RealCommandExecutor};
    ///
    /// let executor = RealCommandExecutor;
    /// let output = executor.execute(|cmd| cmd.arg("--version"), "terser")?;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn execute<F>(&self, builder: F, program: impl AsRef<std::ffi::OsStr>) -> io::Result<Output>
    where
        F: FnOnce(&mut Command) -> &mut Command,
    {
        let mut cmd = Command::new(program);
        builder(&mut cmd);
        self.output(&mut cmd)
    }
}

/// Real command executor that delegates to std::process::Command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealCommandExecutor;

impl CommandExecutor for RealCommandExecutor {
    fn output(&self, cmd: &mut Command) -> io::Result<Output> {
        cmd.output()
    }
}

/// Create an ExitStatus with the given exit code for use in test mocks.
///
/// This avoids spawning actual processes (like `Command::new("true")`) in tests.
#[cfg(all(test, unix))]
pub fn mock_exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8) // Unix stores exit code in upper bits
}

#[cfg(all(test, windows))]
pub fn mock_exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    // FileSystem tests

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.yml");
        std::fs::write(&file_path, "old: contents\n").unwrap();

        let fs = RealFileSystem;
        fs.write_atomic(&file_path, b"new: 1").unwrap();

        assert_eq!(fs.read_to_string(&file_path).unwrap(), "new: 1");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("notes.txt");
        std::fs::write(&file_path, "a").unwrap();

        RealFileSystem.write_atomic(&file_path, "b").unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_atomic_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fresh.txt");

        RealFileSystem.write_atomic(&file_path, "hello").unwrap();

        assert_eq!(std::fs::read(&file_path).unwrap(), b"hello");
    }

    #[test]
    #[cfg(unix)]
    fn test_write_atomic_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("run.sh");
        std::fs::write(&file_path, "echo   1").unwrap();
        std::fs::set_permissions(&file_path, std::fs::Permissions::from_mode(0o755)).unwrap();

        RealFileSystem.write_atomic(&file_path, "echo 1").unwrap();

        let mode = std::fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    #[cfg(unix)]
    fn test_write_atomic_through_symlink_updates_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.yml");
        let link = temp_dir.path().join("link.yml");
        std::fs::write(&target, "a: 1\n").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        RealFileSystem.write_atomic(&link, "a: 2").unwrap();

        assert!(std::fs::symlink_metadata(&link)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "a: 2");
    }

    #[test]
    fn test_real_filesystem_read_nonexistent_file_returns_error() {
        let fs = RealFileSystem;
        let result = fs.read(Path::new("/nonexistent/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_real_filesystem_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.txt");
        let dest = temp_dir.path().join("dest.txt");

        let fs = RealFileSystem;
        fs.write_atomic(&source, b"test content").unwrap();

        let bytes_copied = fs.copy(&source, &dest).unwrap();
        assert_eq!(bytes_copied, 12); // "test content" is 12 bytes
        assert_eq!(fs.read_to_string(&dest).unwrap(), "test content");
    }

    // CommandExecutor tests

    #[test]
    #[cfg(unix)]
    fn test_real_command_executor_output_captures_stdout() {
        let executor = RealCommandExecutor;
        let output = executor.execute(|cmd| cmd.arg("hello"), "echo").unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[test]
    fn test_real_command_executor_nonexistent_command_returns_error() {
        let executor = RealCommandExecutor;
        let mut cmd = Command::new("nonexistent_command_xyz_123");

        let result = executor.output(&mut cmd);
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_mock_exit_status_reports_code() {
        assert!(mock_exit_status(0).success());
        assert_eq!(mock_exit_status(3).code(), Some(3));
    }
}
