//! File type detection
//!
//! Maps a path to the minifier that handles it, by extension only.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{Preset, PresetSelection};

/// Kind of file, as decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    Yaml,
    Xml,
    Svg,
    Text,
    Markdown,
    JavaScript,
    Python,
    Shell,
    Unsupported,
}

impl FileType {
    /// Detect the type from the extension of the final path segment
    ///
    /// # Examples
    ///
    /// ```
    /// use uniminify::pipeline::FileType;
    /// use std::path::Path;
    ///
    /// assert_eq!(FileType::detect(Path::new("ci/deploy.YML")), FileType::Yaml);
    /// assert_eq!(FileType::detect(Path::new("icon.svg")), FileType::Svg);
    /// assert_eq!(FileType::detect(Path::new("Makefile")), FileType::Unsupported);
    /// ```
    pub fn detect(path: &Path) -> Self {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Self::Unsupported;
        };

        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Self::Yaml,
            "xml" => Self::Xml,
            "svg" => Self::Svg,
            "txt" | "text" => Self::Text,
            "md" | "mdown" | "markdown" => Self::Markdown,
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "py" => Self::Python,
            "bash" | "sh" | "zsh" => Self::Shell,
            _ => Self::Unsupported,
        }
    }

    /// Human-readable name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Xml => "XML",
            Self::Svg => "SVG",
            Self::Text => "Text",
            Self::Markdown => "Markdown",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Shell => "Shell",
            Self::Unsupported => "Unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        *self != Self::Unsupported
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One file scheduled for a guard cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub file_type: FileType,
    pub preset: Preset,
}

impl FileTask {
    /// Classify a path and pick its preset
    pub fn new(path: impl Into<PathBuf>, presets: &PresetSelection) -> Self {
        let path = path.into();
        let file_type = FileType::detect(&path);
        Self {
            preset: presets.for_type(file_type),
            path,
            file_type,
        }
    }
}
