//! Safe-minify guard integration tests
//!
//! Runs the guard against real files: with the built-in minifiers, and with
//! minifiers that misbehave on purpose.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;
use uniminify::config::PresetSelection;
use uniminify::infra::{FileSystem, RealFileSystem};
use uniminify::minifier::{Minifier, MinifierSet, MinifyOutcome};
use uniminify::pipeline::{
    FileTask, GuardOutcome, PipelineError, RevertReason, SafeMinifyGuard, ToolRunner,
};
use uniminify::tools::ToolPaths;

mod common;
use common::fixtures;

fn minifiers() -> MinifierSet {
    MinifierSet::new(ToolRunner::new(ToolPaths::new()))
}

fn task(path: &Path) -> FileTask {
    FileTask::new(path, &PresetSelection::default())
}

/// Replaces the file with fixed bytes
struct Overwrite(Vec<u8>);

impl Minifier for Overwrite {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        match fs.write_atomic(&task.path, &self.0) {
            Ok(()) => MinifyOutcome::ok(),
            Err(e) => MinifyOutcome::failed(e.to_string()),
        }
    }
}

/// Truncates the file, then reports failure
struct HalfWrite;

impl Minifier for HalfWrite {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        let _ = fs.write_atomic(&task.path, b"par");
        MinifyOutcome::failed("crashed halfway")
    }
}

mod builtin {
    use super::*;

    #[test]
    fn test_yaml_file_is_committed() {
        let (_dir, path) = fixtures::write_file("ci.yml", fixtures::CI_YAML).unwrap();

        let report = SafeMinifyGuard::new().run(&task(&path), &minifiers()).unwrap();

        let GuardOutcome::Committed(metrics) = report.outcome else {
            panic!("expected commit, got {:?}", report.outcome);
        };
        assert_eq!(metrics.before_bytes, fixtures::CI_YAML.len() as u64);
        assert_eq!(metrics.after_bytes, fixtures::CI_YAML_COMPACT.len() as u64);
        assert_eq!(fs::read_to_string(&path).unwrap(), fixtures::CI_YAML_COMPACT);
    }

    #[test]
    fn test_already_compact_yaml_commits_unchanged() {
        let (_dir, path) = fixtures::write_file("ci.yml", fixtures::CI_YAML_COMPACT).unwrap();

        let report = SafeMinifyGuard::new().run(&task(&path), &minifiers()).unwrap();

        assert!(matches!(report.outcome, GuardOutcome::Committed(m) if !m.grew()));
        assert_eq!(fs::read_to_string(&path).unwrap(), fixtures::CI_YAML_COMPACT);
    }

    #[test]
    fn test_crlf_text_is_normalized_then_compacted() {
        let (_dir, path) = fixtures::write_file("notes.txt", "a  \r\n\r\n\r\nb\r\n").unwrap();

        let report = SafeMinifyGuard::new().run(&task(&path), &minifiers()).unwrap();

        assert!(matches!(report.outcome, GuardOutcome::Committed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn test_invalid_yaml_fails_and_keeps_bytes() {
        let source = "key: [unterminated\r\n";
        let (_dir, path) = fixtures::write_file("bad.yaml", source).unwrap();

        let err = SafeMinifyGuard::new()
            .run(&task(&path), &minifiers())
            .unwrap_err();

        assert!(matches!(err, PipelineError::MinifyFailed { .. }), "{err}");
        // The CRLF original comes back, not the normalized copy
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn test_non_utf8_text_fails_and_keeps_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        let bytes = b"caf\xe9  \n\n\n\n".to_vec();
        fs::write(&path, &bytes).unwrap();

        assert!(SafeMinifyGuard::new().run(&task(&path), &minifiers()).is_err());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_unknown_extension_is_skipped_untouched() {
        let (_dir, path) = fixtures::write_file("Makefile", "all:  \n\n\n").unwrap();

        let report = SafeMinifyGuard::new().run(&task(&path), &minifiers()).unwrap();

        assert_eq!(report.outcome, GuardOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "all:  \n\n\n");
    }

    #[test]
    fn test_missing_external_tool_leaves_file_alone() {
        let source = "<root>\n  <child/>\n</root>\n";
        let (dir, path) = fixtures::write_file("data.xml", source).unwrap();
        let paths = ToolPaths::new().with_path(
            uniminify::tools::ToolKind::MinifyXml,
            dir.path().join("missing-minify-xml"),
        );

        let result =
            SafeMinifyGuard::new().run(&task(&path), &MinifierSet::new(ToolRunner::new(paths)));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }
}

mod misbehaving {
    use super::*;

    #[test]
    fn test_growing_output_is_reverted() {
        let (_dir, path) = fixtures::write_file("a.txt", "short\n").unwrap();

        let report = SafeMinifyGuard::new()
            .run(&task(&path), &Overwrite(b"much much longer\n".to_vec()))
            .unwrap();

        assert!(matches!(
            report.outcome,
            GuardOutcome::Reverted {
                reason: RevertReason::SizeIncreased,
                ..
            }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_failed_minifier_output_is_rolled_back() {
        let (_dir, path) = fixtures::write_file("a.txt", "original contents\n").unwrap();

        let err = SafeMinifyGuard::new().run(&task(&path), &HalfWrite).unwrap_err();

        assert!(err.to_string().contains("crashed halfway"), "{err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "original contents\n");
    }

    #[test]
    fn test_emptied_file_is_committed() {
        let (_dir, path) = fixtures::write_file("a.txt", "\n\n\n").unwrap();

        let report = SafeMinifyGuard::new()
            .run(&task(&path), &Overwrite(Vec::new()))
            .unwrap();

        assert!(matches!(report.outcome, GuardOutcome::Committed(m) if m.after_bytes == 0));
        assert!(fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn test_real_filesystem_guard_matches_default() {
        let (_dir, path) = fixtures::write_file("a.md", "# A \n").unwrap();

        let report = SafeMinifyGuard::with_fs(RealFileSystem)
            .run(&task(&path), &minifiers())
            .unwrap();

        assert!(matches!(report.outcome, GuardOutcome::Committed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# A\n");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_text_file_never_grows(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.txt");
        fs::write(&path, &bytes).unwrap();

        let result = SafeMinifyGuard::new().run(&task(&path), &minifiers());
        let after = fs::read(&path).unwrap();

        match result {
            Ok(_) => prop_assert!(after.len() <= bytes.len()),
            Err(_) => prop_assert_eq!(after, bytes),
        }
    }

    #[test]
    fn test_arbitrary_output_is_kept_only_when_not_larger(
        original in prop::collection::vec(any::<u8>(), 0..64),
        output in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.txt");
        fs::write(&path, &original).unwrap();

        let report = SafeMinifyGuard::new()
            .run(&task(&path), &Overwrite(output.clone()))
            .unwrap();
        let after = fs::read(&path).unwrap();

        if output.len() > original.len() {
            prop_assert!(
                matches!(report.outcome, GuardOutcome::Reverted { .. }),
                "unexpected outcome {:?}",
                report.outcome
            );
            prop_assert_eq!(after, original);
        } else {
            prop_assert!(matches!(report.outcome, GuardOutcome::Committed(_)));
            prop_assert_eq!(after, output);
        }
    }
}
