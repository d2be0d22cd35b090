//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .uniminify.toml in the given directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use uniminify::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Loaded config with preset: {:?}", config.preset);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(project_root: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        // Read file atomically - no TOCTOU race window
        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .uniminify.toml");
            }
        };

        Self::parse(&contents, project_root)
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))
    }

    /// Load an explicitly named config file; it must exist
    pub fn load_file(path: &Path) -> Result<ConfigFile> {
        Self::load_file_with_fs(path, &RealFileSystem)
    }

    /// Load an explicitly named config file with a custom filesystem implementation
    pub fn load_file_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<ConfigFile> {
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, base_dir)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    fn parse(contents: &str, base_dir: &Path) -> Result<ConfigFile> {
        let mut config: ConfigFile =
            toml_edit::de::from_str(contents).context("Failed to parse TOML")?;

        config.validate()?;
        config.resolve_relative_paths(base_dir);

        Ok(config)
    }
}
