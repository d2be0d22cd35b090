//! Scalar writer
//!
//! Picks the shortest legal single-line form for a string: plain when it
//! re-resolves to the same string, otherwise single- or double-quoted,
//! whichever is shorter.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use super::parse::{parse_body, yaml11_bool};
use super::value::{YamlValue, YamlVersion};

/// Where a scalar is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Top-level node or value/key of the top-level mapping
    Block,
    /// Inside `[...]` or `{...}`
    Flow,
}

/// What a plain string must survive when read back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarRules {
    /// Version the output is resolved under
    pub version: Option<YamlVersion>,
    /// Quote every YAML 1.1 boolean word, whatever the version
    pub quote_booleans: bool,
}

impl From<Option<YamlVersion>> for ScalarRules {
    fn from(version: Option<YamlVersion>) -> Self {
        Self {
            version,
            quote_booleans: false,
        }
    }
}

const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];
const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}'];

/// Patterns a YAML 1.1 reader resolves to something other than a string
fn yaml11_implicit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:",
            // null
            r"~|null|Null|NULL",
            // int: binary, octal, decimal, hex, sexagesimal
            r"|[-+]?0b[01_]+",
            r"|[-+]?0[0-7_]+",
            r"|[-+]?(?:0|[1-9][0-9_]*)",
            r"|[-+]?0x[0-9a-fA-F_]+",
            r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+",
            // float
            r"|[-+]?(?:[0-9][0-9_]*)?\.[0-9.]*(?:[eE][-+][0-9]+)?",
            r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
            r"|[-+]?\.(?:inf|Inf|INF)",
            r"|\.(?:nan|NaN|NAN)",
            // merge, value
            r"|<<|=",
            // timestamp
            r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:(?:[Tt]|[ \t]+).*)?",
            r")$"
        ))
        .expect("YAML 1.1 implicit type regex is valid")
    })
}

/// Characters YAML treats as line breaks
fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// YAML `c-printable`, minus the byte-order mark
fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{7E}' | '\u{85}'
        | '\u{A0}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
        && c != '\u{FEFF}'
}

/// Write a string scalar in its shortest legal form.
pub fn write_string(s: &str, ctx: Context, version: Option<YamlVersion>) -> String {
    write_string_with(s, ctx, version.into())
}

/// Write a string scalar under explicit [`ScalarRules`].
pub fn write_string_with(s: &str, ctx: Context, rules: ScalarRules) -> String {
    if plain_safe(s, ctx, rules) {
        return s.to_string();
    }

    let double = double_quoted(s);
    match single_quoted(s) {
        Some(single) if single.len() < double.len() => single,
        _ => double,
    }
}

/// Check whether `s` can be written without quotes.
pub fn is_plain_safe(s: &str, ctx: Context, version: Option<YamlVersion>) -> bool {
    plain_safe(s, ctx, version.into())
}

fn plain_safe(s: &str, ctx: Context, rules: ScalarRules) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };

    if s.starts_with([' ', '\t']) || s.ends_with([' ', '\t']) {
        return false;
    }
    if s.chars().any(|c| c == '\t' || is_line_break(c) || !is_printable(c)) {
        return false;
    }

    if INDICATORS.contains(&first) {
        let next = s[first.len_utf8()..].chars().next();
        let continues = match next {
            Some(c) => c != ' ' && !(ctx == Context::Flow && FLOW_INDICATORS.contains(&c)),
            None => false,
        };
        if !matches!(first, '-' | '?' | ':') || !continues {
            return false;
        }
        // `?` always opens an explicit key inside a flow collection
        if first == '?' && ctx == Context::Flow {
            return false;
        }
    }

    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    if ctx == Context::Flow && s.contains([',', '[', ']', '{', '}', ':']) {
        return false;
    }
    if s.starts_with("---") || s.starts_with("...") {
        return false;
    }
    if rules.version == Some(YamlVersion::V1_1) && yaml11_implicit_regex().is_match(s) {
        return false;
    }
    if rules.quote_booleans && yaml11_bool(s, Some(YamlVersion::V1_1)).is_some() {
        return false;
    }

    // The candidate must come back as the very same string in every
    // position it can be written in
    let text = YamlValue::Str(s.to_owned());
    let pair = YamlValue::Mapping(vec![(text.clone(), text.clone())]);
    match ctx {
        Context::Block => {
            reads_back(s, rules.version, &text)
                && reads_back(&format!("{s}: {s}"), rules.version, &pair)
        }
        Context::Flow => reads_back(
            &format!("[{s},{{{s}: {s}}}]"),
            rules.version,
            &YamlValue::Sequence(vec![text, pair]),
        ),
    }
}

fn reads_back(source: &str, version: Option<YamlVersion>, expected: &YamlValue) -> bool {
    matches!(parse_body(source, version), Ok(Some(ref parsed)) if parsed == expected)
}

/// Single-quoted form, when every character can appear inside one
fn single_quoted(s: &str) -> Option<String> {
    if s.chars().any(|c| is_line_break(c) || !is_printable(c)) {
        return None;
    }
    Some(format!("'{}'", s.replace('\'', "''")))
}

/// Double-quoted form with escapes for everything that is not printable
pub fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{1B}' => out.push_str("\\e"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if !is_printable(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const V11: Option<YamlVersion> = Some(YamlVersion::V1_1);

    mod plain {
        use super::*;

        #[test]
        fn test_simple_words_stay_plain() {
            assert_eq!(write_string("foo", Context::Block, None), "foo");
            assert_eq!(write_string("foo bar", Context::Flow, None), "foo bar");
        }

        #[test]
        fn test_inner_quotes_stay_plain() {
            assert_eq!(
                write_string("this \"is\" 'sparta'", Context::Block, None),
                "this \"is\" 'sparta'"
            );
        }

        #[test]
        fn test_dash_followed_by_text_stays_plain() {
            assert_eq!(write_string("-foo", Context::Block, None), "-foo");
        }

        #[test]
        fn test_url_stays_plain_in_block_context() {
            assert_eq!(
                write_string("http://example.com", Context::Block, None),
                "http://example.com"
            );
        }

        #[test]
        fn test_hash_without_space_stays_plain() {
            assert_eq!(write_string("a#b", Context::Block, None), "a#b");
        }
    }

    mod quoted {
        use super::*;

        #[test]
        fn test_empty_string_is_double_quoted() {
            assert_eq!(write_string("", Context::Block, None), "\"\"");
        }

        #[test]
        fn test_reserved_words_are_quoted() {
            assert_eq!(write_string("null", Context::Block, None), "\"null\"");
            assert_eq!(write_string("true", Context::Block, None), "\"true\"");
            assert_eq!(write_string("123", Context::Block, None), "\"123\"");
            assert_eq!(write_string("~", Context::Block, None), "\"~\"");
        }

        #[test]
        fn test_yaml11_words_are_quoted_only_under_1_1() {
            assert_eq!(write_string("yes", Context::Block, None), "yes");
            assert_eq!(write_string("yes", Context::Block, V11), "\"yes\"");
            assert_eq!(write_string("0777", Context::Block, V11), "\"0777\"");
            assert_eq!(write_string("1:30", Context::Block, V11), "\"1:30\"");
        }

        #[test]
        fn test_leading_space_is_quoted() {
            assert_eq!(write_string(" a", Context::Block, None), "\" a\"");
        }

        #[test]
        fn test_colon_space_is_quoted() {
            assert_eq!(write_string("a: b", Context::Block, None), "\"a: b\"");
        }

        #[test]
        fn test_flow_indicators_are_quoted_in_flow_context() {
            assert_eq!(write_string("a,b", Context::Block, None), "a,b");
            assert_eq!(write_string("a,b", Context::Flow, None), "\"a,b\"");
        }

        #[test]
        fn test_indicator_start_is_quoted() {
            assert_eq!(write_string("*ref", Context::Block, None), "\"*ref\"");
            assert_eq!(write_string("- a", Context::Block, None), "\"- a\"");
        }

        #[test]
        fn test_double_quotes_prefer_single_quoting() {
            assert_eq!(write_string("\"x\"", Context::Block, None), "'\"x\"'");
        }

        #[test]
        fn test_newline_forces_double_quotes() {
            assert_eq!(write_string("a\nb", Context::Block, None), "\"a\\nb\"");
        }

        #[test]
        fn test_question_mark_start_is_quoted_in_flow_context() {
            assert_eq!(write_string("?foo", Context::Block, None), "?foo");
            assert_eq!(write_string("?foo", Context::Flow, None), "\"?foo\"");
            assert_eq!(write_string("?x", Context::Flow, V11), "\"?x\"");
        }

        #[test]
        fn test_dash_and_colon_starts_in_flow_context_survive_reparse() {
            for s in ["-foo", ":foo"] {
                let written = write_string(s, Context::Flow, None);
                let parsed = parse_body(&format!("[{written}]"), None).unwrap();
                assert_eq!(parsed, Some(YamlValue::Sequence(vec![YamlValue::Str(s.into())])));
            }
        }

        #[test]
        fn test_quote_booleans_covers_every_yaml11_word() {
            let rules = ScalarRules {
                version: None,
                quote_booleans: true,
            };
            for word in ["y", "Yes", "ON", "off", "No", "n"] {
                assert_eq!(
                    write_string_with(word, Context::Block, rules),
                    format!("\"{word}\"")
                );
            }
            assert_eq!(write_string_with("yesterday", Context::Flow, rules), "yesterday");
        }

        #[test]
        fn test_document_markers_are_quoted() {
            assert_eq!(write_string("---", Context::Block, None), "\"---\"");
            assert_eq!(write_string("...", Context::Block, None), "\"...\"");
        }
    }

    #[test]
    fn test_double_quoted_escapes_control_characters() {
        assert_eq!(double_quoted("\u{1}\u{7F}\u{FEFF}"), "\"\\x01\\x7F\\uFEFF\"");
        assert_eq!(double_quoted("\\\""), "\"\\\\\\\"\"");
    }

    #[test]
    fn test_single_quoted_rejects_line_breaks() {
        assert_eq!(single_quoted("a\u{2028}b"), None);
        assert_eq!(single_quoted("it's"), Some("'it''s'".to_string()));
    }
}
