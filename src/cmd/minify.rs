//! Minify command implementation
//!
//! Thin presentation layer for the minify command.
//! Business logic lives in `workflow::MinifyWorkflow`.

use std::env;

use anyhow::Result;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cmd::workflow::{MinifyOptions, MinifyWorkflow, RunReport};
use crate::fmt::{
    emoji, format_bytes, format_change, CHART, CROSSMARK, INFO, ROCKET, SPARKLES, WARNING,
};
use crate::tools::{print_tool_report, ToolChecker};

/// How results are shown
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    /// Print the run report as JSON instead of the summary
    pub json: bool,
    /// Only errors are shown
    pub quiet: bool,
}

/// Main minify command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use uniminify::cmd::minify::{cmd_minify, OutputMode};
/// use uniminify::cmd::workflow::MinifyOptions;
///
/// let options = MinifyOptions {
///     paths: vec![PathBuf::from("docs")],
///     dry_run: true,
///     ..Default::default()
/// };
/// cmd_minify(&options, OutputMode::default())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_minify(options: &MinifyOptions, output: OutputMode) -> Result<()> {
    let show_text = !output.json && !output.quiet;
    if show_text {
        let mode = if options.dry_run { " (dry run)" } else { "" };
        println!("{}{}{}", emoji(ROCKET), style("uniminify").bold(), mode);
    }

    let workflow = MinifyWorkflow::new(&env::current_dir()?);
    let progress = progress_bar(show_text)?;
    let report = workflow.execute_with_progress(options, &progress)?;

    if output.json {
        present_json_report(&report)?;
    } else if !output.quiet {
        present_summary(&report);
    }

    match report.failure_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Print the availability of every external tool
pub fn cmd_list_tools(options: &MinifyOptions) -> Result<()> {
    let workflow = MinifyWorkflow::new(&env::current_dir()?);
    let settings = workflow.settings(options)?;

    let report = ToolChecker::new(&settings.tool_paths).check_all();
    print_tool_report(&report);
    Ok(())
}

/// A progress bar on an interactive stderr, hidden otherwise
///
/// The workflow hides it again when there is at most one file.
fn progress_bar(enabled: bool) -> Result<ProgressBar> {
    if !enabled || !Term::stderr().is_term() {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

/// Present the run summary
fn present_summary(report: &RunReport) {
    println!();

    for failure in &report.failures {
        println!(
            "   {} {}",
            emoji(CROSSMARK),
            style(failure.path.display()).red()
        );
    }

    println!(
        "{} {} committed, {} reverted, {} skipped, {} failed",
        emoji(CHART),
        style(report.committed()).green().bold(),
        style(report.reverted()).yellow(),
        style(report.skipped()).dim(),
        style(report.failures.len()).red()
    );

    let totals = report.committed_metrics();
    if totals.before_bytes > 0 {
        println!("   Total: {}", style(format_change(&totals)).green());
        println!(
            "   Saved: {}",
            style(format_bytes(totals.reduction_bytes().max(0) as u64)).green().bold()
        );
    }

    if report.reverted() > 0 {
        println!(
            "   {} Files whose minified output was larger were left as they were",
            emoji(WARNING)
        );
    }
    if report.dry_run {
        println!("   {} Dry run: no file was modified", emoji(INFO));
    }

    println!();
    if report.failures.is_empty() {
        println!("{} {}", emoji(SPARKLES), style("Done").bold());
    } else {
        println!(
            "{} Done with {} failure(s)",
            emoji(WARNING),
            report.failures.len()
        );
    }
}

/// Present JSON report for scripts and CI
fn present_json_report(report: &RunReport) -> Result<()> {
    let totals = report.committed_metrics();
    let json = serde_json::json!({
        "dry_run": report.dry_run,
        "total": report.total(),
        "committed": report.committed(),
        "reverted": report.reverted(),
        "skipped": report.skipped(),
        "failed": report.failures.len(),
        "before_bytes": totals.before_bytes,
        "after_bytes": totals.after_bytes,
        "files": report.files,
        "failures": report.failures,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
