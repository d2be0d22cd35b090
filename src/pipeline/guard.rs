//! Safe-minify guard
//!
//! Wraps every minifier run in a snapshot/validate/commit-or-revert cycle:
//!
//! `Start -> Normalized -> Minified -> Validated -> {Committed | Reverted}`
//!
//! A file is never left larger than it was, and never left half-written
//! when the minifier or the filesystem fails.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::infra::{FileSystem, RealFileSystem};
use crate::minifier::{newline, Minifier};

use super::dispatch::{FileTask, FileType};
use super::error::PipelineError;
use super::metrics::SizeMetrics;

/// Steps of one guard cycle, logged at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Start,
    Normalized,
    Minified,
    Validated,
    Committed,
    Reverted,
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Normalized => "normalized",
            Self::Minified => "minified",
            Self::Validated => "validated",
            Self::Committed => "committed",
            Self::Reverted => "reverted",
        };
        f.write_str(name)
    }
}

/// Why a minified result was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevertReason {
    SizeIncreased,
}

/// What happened to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GuardOutcome {
    /// The minified file was kept (equal size included)
    Committed(SizeMetrics),
    /// The original bytes were written back
    Reverted {
        reason: RevertReason,
        metrics: SizeMetrics,
    },
    /// No minifier handles this file type
    Skipped,
}

impl GuardOutcome {
    pub fn metrics(&self) -> Option<SizeMetrics> {
        match self {
            Self::Committed(metrics) | Self::Reverted { metrics, .. } => Some(*metrics),
            Self::Skipped => None,
        }
    }
}

/// Result of one guard cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardReport {
    pub path: PathBuf,
    pub file_type: FileType,
    pub outcome: GuardOutcome,
}

/// Runs minifiers under the safe-minify contract
pub struct SafeMinifyGuard<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl SafeMinifyGuard<RealFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for SafeMinifyGuard<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> SafeMinifyGuard<FS> {
    /// Create a guard with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Run one guard cycle for `task`
    ///
    /// # Errors
    ///
    /// - [`PipelineError::MinifyFailed`] when the minifier reports failure
    /// - [`PipelineError::Io`] when the file cannot be read or written
    /// - [`PipelineError::RestoreFailed`] when the snapshot cannot be written
    ///   back after one of the above
    ///
    /// In the first two cases the file holds its original bytes again.
    pub fn run<M: Minifier>(
        &self,
        task: &FileTask,
        minifier: &M,
    ) -> Result<GuardReport, PipelineError> {
        let path = task.path.as_path();
        let report = |outcome| GuardReport {
            path: task.path.clone(),
            file_type: task.file_type,
            outcome,
        };

        if !task.file_type.is_supported() {
            log::debug!("Skipping {}: unsupported file type", path.display());
            return Ok(report(GuardOutcome::Skipped));
        }

        let original = self.fs.read(path)?;
        trace(path, GuardState::Start);

        let metrics = match self.minify(task, minifier, &original) {
            Ok(metrics) => metrics,
            Err(err) => {
                self.restore(path, &original)?;
                trace(path, GuardState::Reverted);
                return Err(err);
            }
        };
        trace(path, GuardState::Validated);

        if metrics.grew() {
            self.restore(path, &original)?;
            log::debug!(
                "Reverting {}: size increased ({} -> {} bytes)",
                path.display(),
                metrics.before_bytes,
                metrics.after_bytes
            );
            trace(path, GuardState::Reverted);
            return Ok(report(GuardOutcome::Reverted {
                reason: RevertReason::SizeIncreased,
                metrics,
            }));
        }

        trace(path, GuardState::Committed);
        Ok(report(GuardOutcome::Committed(metrics)))
    }

    /// Normalize, minify and measure; the caller restores on error
    fn minify<M: Minifier>(
        &self,
        task: &FileTask,
        minifier: &M,
        original: &[u8],
    ) -> Result<SizeMetrics, PipelineError> {
        let path = task.path.as_path();

        if let Cow::Owned(normalized) = newline::normalize(original) {
            self.fs.write_atomic(path, normalized)?;
        }
        trace(path, GuardState::Normalized);

        let outcome = minifier.minify(task, &self.fs);
        if !outcome.success {
            return Err(PipelineError::MinifyFailed {
                path: task.path.clone(),
                diagnostic: outcome.diagnostic,
            });
        }
        trace(path, GuardState::Minified);

        let after = self.fs.read(path)?;
        Ok(SizeMetrics {
            before_bytes: original.len() as u64,
            after_bytes: after.len() as u64,
        })
    }

    fn restore(&self, path: &Path, original: &[u8]) -> Result<(), PipelineError> {
        self.fs
            .write_atomic(path, original)
            .map_err(|source| PipelineError::RestoreFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn trace(path: &Path, state: GuardState) {
    log::debug!("{}: {state}", path.display());
}
