//! Command handlers for the uniminify CLI
//!
//! `minify` is the presentation layer, `workflow` the logic behind it.

pub mod minify;
pub mod workflow;

// Re-export command functions for convenient access
pub use minify::{cmd_list_tools, cmd_minify, OutputMode};
pub use workflow::{MinifyOptions, MinifyWorkflow, RunReport};
