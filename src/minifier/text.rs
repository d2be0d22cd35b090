//! Plain-text and Markdown compaction
//!
//! Strips trailing whitespace from every line and collapses runs of blank
//! lines. Markdown hard line breaks (two or more trailing spaces after
//! content) survive as exactly two spaces.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::{Minifier, MinifyOutcome};
use crate::infra::FileSystem;
use crate::pipeline::dispatch::FileTask;
use crate::pipeline::error::PipelineError;

/// Which line rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFlavor {
    /// Every trailing blank is insignificant
    Plain,
    /// Trailing double spaces are a hard line break
    Markdown,
}

fn blank_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank-run regex is valid"))
}

/// Compact a text document.
///
/// ```
/// use uniminify::minifier::text::{compact_text, TextFlavor};
///
/// assert_eq!(compact_text("foo \nbar\n\n", TextFlavor::Plain), "foo\nbar\n");
/// assert_eq!(compact_text("a\n\n\n\nb", TextFlavor::Plain), "a\n\nb");
/// ```
pub fn compact_text(input: &str, flavor: TextFlavor) -> String {
    let trimmed = input
        .split('\n')
        .map(|line| trim_line(line, flavor))
        .collect::<Vec<_>>()
        .join("\n");

    let mut collapsed = blank_run_regex()
        .replace_all(&trimmed, "\n\n")
        .into_owned();

    if collapsed.ends_with("\n\n") {
        collapsed.pop();
    }
    collapsed
}

fn trim_line(line: &str, flavor: TextFlavor) -> String {
    let content = line.trim_end();
    let hard_break = flavor == TextFlavor::Markdown
        && !content.is_empty()
        && line.ends_with("  ");

    if hard_break {
        format!("{content}  ")
    } else {
        content.to_string()
    }
}

/// In-process minifier for `.txt` and Markdown files
#[derive(Debug, Clone, Copy)]
pub struct TextMinifier {
    flavor: TextFlavor,
}

impl TextMinifier {
    pub fn new(flavor: TextFlavor) -> Self {
        Self { flavor }
    }

    fn compact_file<FS: FileSystem>(&self, path: &Path, fs: &FS) -> Result<(), PipelineError> {
        // Non-UTF-8 input surfaces as InvalidData and the guard reverts
        let input = fs.read_to_string(path)?;
        let output = compact_text(&input, self.flavor);
        if output != input {
            fs.write_atomic(path, output)?;
        }
        Ok(())
    }
}

impl Minifier for TextMinifier {
    fn minify<FS: FileSystem>(&self, task: &FileTask, fs: &FS) -> MinifyOutcome {
        self.compact_file(&task.path, fs).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod plain {
        use super::*;

        #[test]
        fn test_single_trailing_blank_line_is_dropped() {
            assert_eq!(compact_text("foo\n\n", TextFlavor::Plain), "foo\n");
        }

        #[test]
        fn test_two_trailing_blank_lines_are_dropped() {
            assert_eq!(compact_text("foo\n\n\n", TextFlavor::Plain), "foo\n");
        }

        #[test]
        fn test_trailing_spaces_are_removed() {
            assert_eq!(compact_text("foo \nbar\n", TextFlavor::Plain), "foo\nbar\n");
        }

        #[test]
        fn test_trailing_tabs_are_removed() {
            assert_eq!(compact_text("foo\t\t\nbar", TextFlavor::Plain), "foo\nbar");
        }

        #[test]
        fn test_inner_blank_runs_collapse_to_one() {
            assert_eq!(
                compact_text("a\n\n\n\n\nb\n", TextFlavor::Plain),
                "a\n\nb\n"
            );
        }

        #[test]
        fn test_whitespace_only_lines_count_as_blank() {
            assert_eq!(compact_text("a\n  \n\t\n \nb", TextFlavor::Plain), "a\n\nb");
        }

        #[test]
        fn test_leading_indentation_is_kept() {
            assert_eq!(compact_text("  a\n    b  \n", TextFlavor::Plain), "  a\n    b\n");
        }

        #[test]
        fn test_plain_drops_double_space_breaks() {
            assert_eq!(compact_text("line  \nnext", TextFlavor::Plain), "line\nnext");
        }

        #[test]
        fn test_empty_input_stays_empty() {
            assert_eq!(compact_text("", TextFlavor::Plain), "");
        }
    }

    mod markdown {
        use super::*;

        #[test]
        fn test_hard_break_is_kept_as_two_spaces() {
            assert_eq!(
                compact_text("line    \nnext", TextFlavor::Markdown),
                "line  \nnext"
            );
        }

        #[test]
        fn test_single_trailing_space_is_removed() {
            assert_eq!(compact_text("line \nnext", TextFlavor::Markdown), "line\nnext");
        }

        #[test]
        fn test_blank_line_with_spaces_is_emptied() {
            assert_eq!(compact_text("a\n    \nb", TextFlavor::Markdown), "a\n\nb");
        }

        #[test]
        fn test_tab_before_single_space_is_not_a_hard_break() {
            assert_eq!(compact_text("a\t \nb", TextFlavor::Markdown), "a\nb");
        }
    }

    fn flavor_strategy() -> impl Strategy<Value = TextFlavor> {
        prop_oneof![Just(TextFlavor::Plain), Just(TextFlavor::Markdown)]
    }

    proptest! {
        #[test]
        fn prop_compact_text_is_idempotent(input in "[a-z \t\n]{0,64}", flavor in flavor_strategy()) {
            let once = compact_text(&input, flavor);
            let twice = compact_text(&once, flavor);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_compact_text_never_grows(input in "[a-z \t\n]{0,64}", flavor in flavor_strategy()) {
            prop_assert!(compact_text(&input, flavor).len() <= input.len());
        }
    }
}
