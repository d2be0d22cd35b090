//! Minification presets

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::minifier::yaml::YamlVersion;
use crate::pipeline::dispatch::FileType;

/// How aggressively a file is minified
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No extra trimming beyond what is always safe
    Safe,
    /// Moderate trimming
    #[default]
    #[value(alias = "medium")]
    #[serde(alias = "medium")]
    Default,
    /// Aggressive trimming
    Brute,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Default => "default",
            Self::Brute => "brute",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// YAML version to resolve and write under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
pub enum YamlVersionChoice {
    #[value(name = "1.1")]
    #[serde(rename = "1.1")]
    V1_1,
    #[value(name = "1.2")]
    #[serde(rename = "1.2")]
    V1_2,
    /// Follow the file's own `%YAML` preamble
    #[default]
    #[value(name = "unset")]
    #[serde(rename = "unset")]
    Unset,
}

impl YamlVersionChoice {
    /// The version forced on every file, if any
    pub fn forced(self) -> Option<YamlVersion> {
        match self {
            Self::V1_1 => Some(YamlVersion::V1_1),
            Self::V1_2 => Some(YamlVersion::V1_2),
            Self::Unset => None,
        }
    }
}

/// Global preset plus per-type overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSelection {
    pub global: Preset,
    /// Override for JavaScript
    pub js: Option<Preset>,
    /// Override for XML and SVG
    pub xml: Option<Preset>,
}

impl PresetSelection {
    /// Pick the preset that applies to a file type
    ///
    /// # Examples
    ///
    /// ```
    /// use uniminify::config::{Preset, PresetSelection};
    /// use uniminify::pipeline::FileType;
    ///
    /// let presets = PresetSelection {
    ///     global: Preset::Safe,
    ///     js: Some(Preset::Brute),
    ///     xml: None,
    /// };
    /// assert_eq!(presets.for_type(FileType::JavaScript), Preset::Brute);
    /// assert_eq!(presets.for_type(FileType::Svg), Preset::Safe);
    /// ```
    pub fn for_type(&self, file_type: FileType) -> Preset {
        let specific = match file_type {
            FileType::JavaScript => self.js,
            FileType::Xml | FileType::Svg => self.xml,
            _ => None,
        };
        specific.unwrap_or(self.global)
    }
}
