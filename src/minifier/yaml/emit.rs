//! Compact YAML serialization
//!
//! The top-level mapping stays in block style, one `key: value` per line.
//! Everything below it is written in flow style without optional spaces.

use super::parse::YamlDocument;
use super::scalar::{write_string_with, Context, ScalarRules};
use super::value::{YamlValue, YamlVersion};

/// Serialize a value at the given nesting depth.
///
/// # Examples
///
/// ```
/// use uniminify::minifier::yaml::{serialize, YamlValue};
///
/// let value = YamlValue::Mapping(vec![(
///     YamlValue::Str("foo".into()),
///     YamlValue::Sequence(vec![YamlValue::Str("a".into()), YamlValue::Null]),
/// )]);
/// assert_eq!(serialize(&value, 0, None), "foo: [a,null]");
/// assert_eq!(serialize(&value, 1, None), "{foo: [a,null]}");
/// ```
pub fn serialize(value: &YamlValue, depth: usize, version: Option<YamlVersion>) -> String {
    serialize_with(value, depth, version.into())
}

/// Serialize a value under explicit [`ScalarRules`].
pub fn serialize_with(value: &YamlValue, depth: usize, rules: ScalarRules) -> String {
    let ctx = if depth == 0 {
        Context::Block
    } else {
        Context::Flow
    };
    let mut out = String::new();
    write_node(&mut out, value, depth, ctx, rules);
    out
}

fn write_node(
    out: &mut String,
    value: &YamlValue,
    depth: usize,
    ctx: Context,
    rules: ScalarRules,
) {
    match value {
        YamlValue::Null => out.push_str("null"),
        YamlValue::Bool(b) => out.push_str(bool_token(*b, rules.version)),
        YamlValue::Number(n) => out.push_str(&n.to_string()),
        YamlValue::Str(s) => out.push_str(&write_string_with(s, ctx, rules)),
        YamlValue::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(out, item, depth + 1, Context::Flow, rules);
            }
            out.push(']');
        }
        YamlValue::Mapping(entries) if depth == 0 && !entries.is_empty() => {
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_node(out, key, depth + 1, Context::Block, rules);
                out.push_str(": ");
                write_node(out, val, depth + 1, Context::Block, rules);
            }
        }
        YamlValue::Mapping(entries) => {
            out.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(out, key, depth + 1, Context::Flow, rules);
                out.push_str(": ");
                write_node(out, val, depth + 1, Context::Flow, rules);
            }
            out.push('}');
        }
    }
}

fn bool_token(b: bool, version: Option<YamlVersion>) -> &'static str {
    match (version, b) {
        (Some(YamlVersion::V1_1), true) => "y",
        (Some(YamlVersion::V1_1), false) => "n",
        (_, true) => "true",
        (_, false) => "false",
    }
}

/// Render a whole document, preamble included.
pub fn render_document(doc: &YamlDocument) -> String {
    render_document_with(doc, false)
}

/// Render a whole document, optionally quoting every YAML 1.1 boolean word.
pub fn render_document_with(doc: &YamlDocument, quote_booleans: bool) -> String {
    let mut out = String::new();
    if let Some(version) = doc.version {
        out.push_str("%YAML ");
        out.push_str(version.as_str());
        out.push_str("\n---\n");
    }
    if let Some(root) = &doc.root {
        let rules = ScalarRules {
            version: doc.version,
            quote_booleans,
        };
        let body = serialize_with(root, 0, rules);
        let terminate = doc.trailing_newline && !body.is_empty();
        out.push_str(&body);
        if terminate {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minifier::yaml::YamlNumber;

    fn s(v: &str) -> YamlValue {
        YamlValue::Str(v.to_string())
    }

    #[test]
    fn test_top_level_mapping_is_block_style() {
        let value = YamlValue::Mapping(vec![
            (s("a"), YamlValue::Number(YamlNumber::Int(1))),
            (s("b"), YamlValue::Mapping(vec![(s("c"), s("d"))])),
        ]);
        assert_eq!(serialize(&value, 0, None), "a: 1\nb: {c: d}");
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(serialize(&YamlValue::Mapping(vec![]), 0, None), "{}");
        assert_eq!(serialize(&YamlValue::Sequence(vec![]), 0, None), "[]");
        let nested = YamlValue::Mapping(vec![(s("a"), YamlValue::Mapping(vec![]))]);
        assert_eq!(serialize(&nested, 0, None), "a: {}");
    }

    #[test]
    fn test_top_level_sequence_is_flow_style() {
        let value = YamlValue::Sequence(vec![
            s("foo"),
            YamlValue::Mapping(vec![(s("key"), s("val"))]),
        ]);
        assert_eq!(serialize(&value, 0, None), "[foo,{key: val}]");
    }

    #[test]
    fn test_booleans_follow_version() {
        let value = YamlValue::Bool(true);
        assert_eq!(serialize(&value, 0, None), "true");
        assert_eq!(serialize(&value, 0, Some(YamlVersion::V1_2)), "true");
        assert_eq!(serialize(&value, 0, Some(YamlVersion::V1_1)), "y");
        assert_eq!(serialize(&YamlValue::Bool(false), 0, Some(YamlVersion::V1_1)), "n");
    }

    #[test]
    fn test_null_key_and_value() {
        let value = YamlValue::Mapping(vec![(YamlValue::Null, YamlValue::Null)]);
        assert_eq!(serialize(&value, 0, None), "null: null");
    }

    #[test]
    fn test_flow_strings_are_quoted_when_ambiguous() {
        let value = YamlValue::Sequence(vec![s("a,b"), s("c")]);
        assert_eq!(serialize(&value, 0, None), "[\"a,b\",c]");
    }

    #[test]
    fn test_flow_strings_opening_with_question_mark_are_quoted() {
        let value = YamlValue::Sequence(vec![s("?foo"), s("bar")]);
        assert_eq!(serialize(&value, 0, None), "[\"?foo\",bar]");

        let value = YamlValue::Mapping(vec![(
            s("a"),
            YamlValue::Mapping(vec![(s("?x"), YamlValue::Number(YamlNumber::Int(1)))]),
        )]);
        assert_eq!(serialize(&value, 0, None), "a: {\"?x\": 1}");
    }

    #[test]
    fn test_render_quotes_boolean_words_on_request() {
        let doc = YamlDocument {
            root: Some(YamlValue::Mapping(vec![
                (s("on"), s("off")),
                (s("list"), YamlValue::Sequence(vec![s("yes"), YamlValue::Bool(true)])),
            ])),
            version: None,
            trailing_newline: true,
        };
        assert_eq!(render_document(&doc), "on: off\nlist: [yes,true]\n");
        assert_eq!(
            render_document_with(&doc, true),
            "\"on\": \"off\"\nlist: [\"yes\",true]\n"
        );
    }

    #[test]
    fn test_render_empty_document_with_preamble() {
        let doc = YamlDocument {
            root: None,
            version: Some(YamlVersion::V1_1),
            trailing_newline: false,
        };
        assert_eq!(render_document(&doc), "%YAML 1.1\n---\n");
    }

    #[test]
    fn test_render_keeps_trailing_newline() {
        let doc = YamlDocument {
            root: Some(s("x")),
            version: None,
            trailing_newline: true,
        };
        assert_eq!(render_document(&doc), "x\n");
    }
}
