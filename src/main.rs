use clap::Parser;
use std::path::PathBuf;
use std::process;
use uniminify::cmd::{self, MinifyOptions, OutputMode};
use uniminify::config::{Preset, YamlVersionChoice};

/// Safe in-place file minifier
///
/// uniminify shrinks YAML, XML, SVG, JavaScript, Python, shell, Markdown and
/// text files in place, and never leaves a file larger or broken.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to minify (directories are walked recursively)
    #[arg(value_name = "PATH", required_unless_present = "list_tools")]
    paths: Vec<PathBuf>,

    /// Show per-step debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,

    /// Minify temporary copies and report the result without touching files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Preset for all file types
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Preset for JavaScript files
    #[arg(long, value_enum)]
    js_preset: Option<Preset>,

    /// Preset for XML and SVG files
    #[arg(long, value_enum)]
    xml_preset: Option<Preset>,

    /// Force a YAML version instead of following each file's preamble
    #[arg(long, value_enum, value_name = "VERSION")]
    yaml_version: Option<YamlVersionChoice>,

    /// Quote every YAML string that could be read as a boolean
    #[arg(long)]
    yaml_always_quote_booleans: bool,

    /// Number of files minified in parallel
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    jobs: Option<u64>,

    /// Config file to use instead of ./.uniminify.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a machine-readable report on stdout
    #[arg(long)]
    json: bool,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long)]
    no_emoji: bool,

    /// Show which external minifiers are available and exit
    #[arg(long)]
    list_tools: bool,
}

fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };

    // RUST_LOG still overrides the level picked from the flags
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli);

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let options = MinifyOptions {
        paths: cli.paths.clone(),
        dry_run: cli.dry_run,
        preset: cli.preset,
        js_preset: cli.js_preset,
        xml_preset: cli.xml_preset,
        yaml_version: cli.yaml_version,
        yaml_quote_booleans: cli.yaml_always_quote_booleans,
        jobs: cli.jobs.map(|jobs| jobs as usize),
        config: cli.config.clone(),
    };

    let result = if cli.list_tools {
        cmd::cmd_list_tools(&options)
    } else {
        cmd::cmd_minify(
            &options,
            OutputMode {
                json: cli.json,
                quiet: cli.quiet,
            },
        )
    };

    if let Err(e) = result {
        use uniminify::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn test_medium_is_an_alias_for_default() {
        let cli = Cli::try_parse_from(["uniminify", "--preset", "medium", "a.yml"]).unwrap();
        assert_eq!(cli.preset, Some(Preset::Default));
    }

    #[test]
    fn test_yaml_version_accepts_dotted_names() {
        let cli = Cli::try_parse_from(["uniminify", "--yaml-version", "1.1", "a.yml"]).unwrap();
        assert_eq!(cli.yaml_version, Some(YamlVersionChoice::V1_1));
        let cli = Cli::try_parse_from(["uniminify", "--yaml-version", "unset", "a.yml"]).unwrap();
        assert_eq!(cli.yaml_version, Some(YamlVersionChoice::Unset));
        assert!(Cli::try_parse_from(["uniminify", "--yaml-version", "1.3", "a.yml"]).is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["uniminify", "-v", "-q", "a.yml"]).is_err());
    }

    #[test]
    fn test_paths_optional_with_list_tools() {
        assert!(Cli::try_parse_from(["uniminify", "--list-tools"]).is_ok());
        assert!(Cli::try_parse_from(["uniminify"]).is_err());
    }

    #[test]
    fn test_jobs_must_be_positive() {
        assert!(Cli::try_parse_from(["uniminify", "-j", "0", "a.yml"]).is_err());
        let cli = Cli::try_parse_from(["uniminify", "-j", "4", "a.yml"]).unwrap();
        assert_eq!(cli.jobs, Some(4));
    }
}
