//! Per-file minify pipeline
//!
//! Implements the guarded cycle every file goes through:
//! 1. detect the file type and preset
//! 2. snapshot and normalize line endings
//! 3. run the dispatched minifier (in process or an external tool)
//! 4. commit the result, or revert when it grew or failed

pub mod dispatch;
pub mod error;
pub mod guard;
pub mod metrics;
pub mod tool_runner;

pub use dispatch::{FileTask, FileType};
pub use error::PipelineError;
pub use guard::{GuardOutcome, GuardReport, GuardState, RevertReason, SafeMinifyGuard};
pub use metrics::SizeMetrics;
pub use tool_runner::ToolRunner;
