//! Minify workflow orchestration
//!
//! This module holds the logic behind the CLI, separate from presentation so
//! a run can be driven programmatically:
//!
//! 1. **Settings**: `.uniminify.toml` (or `--config`) merged with CLI flags.
//! 2. **Enumeration**: command-line paths expanded into unique files.
//! 3. **Guarded minification**: every file goes through
//!    [`SafeMinifyGuard`], sequentially or on a rayon pool with `--jobs`.
//!
//! A file that fails is reported and the run moves on; the caller decides
//! what the failures mean for the exit status.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use uniminify::cmd::workflow::{MinifyOptions, MinifyWorkflow};
//!
//! let workflow = MinifyWorkflow::new(Path::new("."));
//! let options = MinifyOptions {
//!     paths: vec![PathBuf::from("config")],
//!     ..Default::default()
//! };
//! let report = workflow.execute(&options)?;
//! println!("{} files committed", report.committed());
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ConfigFile, ConfigLoader, Preset, PresetSelection, YamlVersionChoice};
use crate::enumerate::FileEnumerator;
use crate::error::MinifyError;
use crate::fmt::format_change;
use crate::infra::{FileSystem, RealFileSystem};
use crate::minifier::yaml::YamlOptions;
use crate::minifier::{required_tools, MinifierSet};
use crate::pipeline::{
    FileTask, GuardOutcome, GuardReport, PipelineError, SafeMinifyGuard, SizeMetrics, ToolRunner,
};
use crate::tools::{ToolKind, ToolPaths};

/// Options taken from the command line
#[derive(Debug, Clone, Default)]
pub struct MinifyOptions {
    /// Files and directories to minify
    pub paths: Vec<PathBuf>,
    /// Minify temporary copies and leave the originals untouched
    pub dry_run: bool,
    pub preset: Option<Preset>,
    pub js_preset: Option<Preset>,
    pub xml_preset: Option<Preset>,
    pub yaml_version: Option<YamlVersionChoice>,
    /// Quote every YAML string a 1.1 reader would take as a boolean
    pub yaml_quote_booleans: bool,
    pub jobs: Option<usize>,
    /// Explicit config file instead of `.uniminify.toml`
    pub config: Option<PathBuf>,
}

/// Effective settings after merging config file and CLI flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub presets: PresetSelection,
    pub yaml: YamlOptions,
    pub jobs: usize,
    pub tool_paths: ToolPaths,
    pub terser_config: Option<PathBuf>,
}

impl Settings {
    /// CLI values win over config file values
    pub fn merge(config: ConfigFile, options: &MinifyOptions) -> Self {
        let tool_paths = config.tool_paths();
        Self {
            presets: PresetSelection {
                global: options.preset.or(config.preset).unwrap_or_default(),
                js: options.js_preset.or(config.js_preset),
                xml: options.xml_preset.or(config.xml_preset),
            },
            yaml: YamlOptions {
                version: options
                    .yaml_version
                    .or(config.yaml_version)
                    .unwrap_or_default()
                    .forced(),
                quote_booleans: options.yaml_quote_booleans
                    || config.yaml_always_quote_booleans.unwrap_or(false),
            },
            jobs: options.jobs.or(config.jobs).unwrap_or(1).max(1),
            tool_paths,
            terser_config: config.terser_config,
        }
    }
}

/// A file that could not be minified
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
    /// Required tools that could not be resolved for this file
    #[serde(skip)]
    pub missing_tools: Vec<ToolKind>,
}

/// Result of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub files: Vec<GuardReport>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    /// Number of files enumerated
    pub fn total(&self) -> usize {
        self.files.len() + self.failures.len()
    }

    pub fn committed(&self) -> usize {
        self.count(|outcome| matches!(outcome, GuardOutcome::Committed(_)))
    }

    pub fn reverted(&self) -> usize {
        self.count(|outcome| matches!(outcome, GuardOutcome::Reverted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, GuardOutcome::Skipped))
    }

    /// Combined sizes of all committed files
    pub fn committed_metrics(&self) -> SizeMetrics {
        self.files
            .iter()
            .filter_map(|report| match report.outcome {
                GuardOutcome::Committed(metrics) => Some(metrics),
                _ => None,
            })
            .fold(
                SizeMetrics {
                    before_bytes: 0,
                    after_bytes: 0,
                },
                |total, metrics| SizeMetrics {
                    before_bytes: total.before_bytes + metrics.before_bytes,
                    after_bytes: total.after_bytes + metrics.after_bytes,
                },
            )
    }

    /// The error the run ends with, if any file failed
    ///
    /// A failure whose tool could not be found becomes
    /// [`MinifyError::ToolMissing`] so the fix is named directly.
    pub fn failure_error(&self) -> Option<MinifyError> {
        if self.failures.is_empty() {
            return None;
        }

        let missing = self
            .failures
            .iter()
            .flat_map(|failure| failure.missing_tools.iter())
            .next();

        Some(match missing {
            Some(kind) => MinifyError::ToolMissing {
                tool: kind.name().to_string(),
                install_hint: kind.install_hint().to_string(),
            },
            None => MinifyError::FilesFailed {
                failed: self.failures.len(),
                total: self.total(),
            },
        })
    }

    fn count(&self, predicate: impl Fn(&GuardOutcome) -> bool) -> usize {
        self.files
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Minify workflow orchestrator
pub struct MinifyWorkflow {
    working_dir: PathBuf,
}

impl MinifyWorkflow {
    /// Create a workflow that looks for `.uniminify.toml` in `working_dir`
    pub fn new(working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Load the config file and apply CLI overrides
    pub fn settings(&self, options: &MinifyOptions) -> Result<Settings> {
        let config = match &options.config {
            Some(path) => ConfigLoader::load_file(&self.working_dir.join(path))?,
            None => ConfigLoader::load(&self.working_dir)?,
        };
        Ok(Settings::merge(config, options))
    }

    /// Run without progress reporting
    pub fn execute(&self, options: &MinifyOptions) -> Result<RunReport> {
        self.execute_with_progress(options, &ProgressBar::hidden())
    }

    /// Run, ticking `progress` once per file
    ///
    /// # Errors
    ///
    /// Fails before any file is touched when the configuration is invalid or
    /// a path does not exist. Per-file failures are collected in the report.
    pub fn execute_with_progress(
        &self,
        options: &MinifyOptions,
        progress: &ProgressBar,
    ) -> Result<RunReport> {
        let settings = self.settings(options)?;

        let files = FileEnumerator::new()
            .enumerate(&options.paths)
            .map_err(MinifyError::from)?;
        let tasks: Vec<FileTask> = files
            .into_iter()
            .map(|path| FileTask::new(path, &settings.presets))
            .collect();
        log::debug!("Enumerated {} files", tasks.len());
        if tasks.len() < 2 {
            progress.set_draw_target(ProgressDrawTarget::hidden());
        }
        progress.set_length(tasks.len() as u64);

        let minifiers = MinifierSet::new(
            ToolRunner::new(settings.tool_paths.clone())
                .with_terser_config(settings.terser_config.clone()),
        )
        .with_yaml_options(settings.yaml);
        let guard = SafeMinifyGuard::new();
        let dry_run = options.dry_run;

        let process = |task: &FileTask| {
            progress.set_message(file_label(&task.path));
            let result = if dry_run {
                run_on_copy(&guard, task, &minifiers)
            } else {
                guard.run(task, &minifiers)
            };
            progress.inc(1);
            result
        };

        let results: Vec<Result<GuardReport, PipelineError>> = if settings.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.jobs)
                .build()
                .context("Failed to start worker threads")?;
            pool.install(|| tasks.par_iter().map(process).collect())
        } else {
            tasks.iter().map(process).collect()
        };
        progress.finish_and_clear();

        let mut report = RunReport {
            dry_run,
            ..Default::default()
        };
        for (task, result) in tasks.iter().zip(results) {
            match result {
                Ok(guard_report) => {
                    log_result(&guard_report);
                    report.files.push(guard_report);
                }
                Err(err) => {
                    log::error!("{err}");
                    let missing_tools = missing_tools(task, &settings.tool_paths);
                    report.failures.push(FileFailure {
                        path: task.path.clone(),
                        error: err.to_string(),
                        missing_tools,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Guard a scratch copy of the file; the original is only read
fn run_on_copy(
    guard: &SafeMinifyGuard,
    task: &FileTask,
    minifiers: &MinifierSet,
) -> Result<GuardReport, PipelineError> {
    let scratch = tempfile::TempDir::new()?;
    let name = task
        .path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("file"));
    let copy = scratch.path().join(name);
    RealFileSystem.copy(&task.path, &copy)?;

    let copy_task = FileTask {
        path: copy,
        ..task.clone()
    };
    let report = guard.run(&copy_task, minifiers);

    report
        .map(|report| GuardReport {
            path: task.path.clone(),
            ..report
        })
        .map_err(|err| match err {
            PipelineError::MinifyFailed { diagnostic, .. } => PipelineError::MinifyFailed {
                path: task.path.clone(),
                diagnostic,
            },
            other => other,
        })
}

fn missing_tools(task: &FileTask, paths: &ToolPaths) -> Vec<ToolKind> {
    required_tools(task)
        .into_iter()
        .filter(|kind| paths.resolve(*kind).is_err())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn log_result(report: &GuardReport) {
    let path = report.path.display();
    match &report.outcome {
        GuardOutcome::Committed(metrics) => {
            log::info!("{path}: {}", format_change(metrics));
        }
        GuardOutcome::Reverted { metrics, .. } => {
            log::info!(
                "{path}: kept original, minified output was larger ({})",
                format_change(metrics)
            );
        }
        GuardOutcome::Skipped => log::debug!("{path}: skipped"),
    }
}
