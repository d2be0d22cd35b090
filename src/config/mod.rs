//! Configuration for uniminify
//!
//! This module provides:
//! - .uniminify.toml config file support
//! - Presets and per-type preset overrides
//! - YAML version and boolean quoting choices

pub mod file;
pub mod loader;
pub mod preset;

pub use file::{ConfigFile, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
pub use preset::{Preset, PresetSelection, YamlVersionChoice};
