//! YAML document parsing
//!
//! The body is read as a `yaml-rust2` event stream and folded into a
//! [`YamlValue`] tree. Only plain scalars go through type resolution, so a
//! quoted `'no'` stays a string even under YAML 1.1.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use yaml_rust2::parser::{Event, EventReceiver, Parser, Tag};
use yaml_rust2::scanner::TScalarStyle;

use super::value::{YamlNumber, YamlValue, YamlVersion};
use super::YamlError;

const YAML11_TRUE: [&str; 4] = ["y", "yes", "on", "true"];
const YAML11_FALSE: [&str; 4] = ["n", "no", "off", "false"];

/// A parsed YAML document
#[derive(Debug, Clone, PartialEq)]
pub struct YamlDocument {
    /// Root node; `None` for a zero-length body
    pub root: Option<YamlValue>,
    /// Version from the `%YAML` preamble, if any
    pub version: Option<YamlVersion>,
    /// Whether the body ended with a newline
    pub trailing_newline: bool,
}

/// Split off a `%YAML 1.1` / `%YAML 1.2` preamble.
///
/// The directive line and an immediately following `---` line are removed.
/// Anything else is returned untouched as the body.
pub fn split_preamble(source: &str) -> (Option<YamlVersion>, &str) {
    let (first, rest) = split_line(source);
    let version = first
        .trim()
        .strip_prefix("%YAML")
        .filter(|tail| tail.starts_with([' ', '\t']))
        .and_then(|tail| YamlVersion::from_directive(tail.trim()));

    let Some(version) = version else {
        return (None, source);
    };

    let (marker, after_marker) = split_line(rest);
    let body = if marker.trim_end() == "---" {
        after_marker
    } else {
        rest
    };
    (Some(version), body)
}

/// Split at the first `\n`, dropping it.
fn split_line(text: &str) -> (&str, &str) {
    text.split_once('\n').unwrap_or((text, ""))
}

/// Parse a full document, preamble included.
pub fn parse_document(source: &str) -> Result<YamlDocument, YamlError> {
    parse_document_as(source, None)
}

/// Parse a full document, resolving under `forced` instead of the preamble
/// version when one is given.
pub fn parse_document_as(
    source: &str,
    forced: Option<YamlVersion>,
) -> Result<YamlDocument, YamlError> {
    let (declared, body) = split_preamble(source);
    let version = forced.or(declared);
    Ok(YamlDocument {
        root: parse_body(body, version)?,
        version,
        trailing_newline: body.ends_with('\n'),
    })
}

/// Parse a document body under the given version.
///
/// Returns `None` for a zero-length body and `Null` for a body holding only
/// blank lines, comments and document markers.
pub fn parse_body(body: &str, version: Option<YamlVersion>) -> Result<Option<YamlValue>, YamlError> {
    if body.is_empty() {
        return Ok(None);
    }
    if is_blank_body(body) {
        return Ok(Some(YamlValue::Null));
    }

    let mut log = EventLog::default();
    Parser::new_from_str(body).load(&mut log, true)?;
    TreeBuilder::new(log.0, version).document().map(Some)
}

fn is_blank_body(body: &str) -> bool {
    body.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Resolve a plain scalar: core schema, plus YAML 1.1 booleans when asked.
pub(crate) fn resolve_plain(text: &str, version: Option<YamlVersion>) -> Result<YamlValue, YamlError> {
    if let Some(b) = yaml11_bool(text, version) {
        return Ok(YamlValue::Bool(b));
    }
    Ok(match text {
        "" | "~" | "null" | "Null" | "NULL" => YamlValue::Null,
        "true" | "True" | "TRUE" => YamlValue::Bool(true),
        "false" | "False" | "FALSE" => YamlValue::Bool(false),
        _ => match resolve_number(text)? {
            Some(n) => YamlValue::Number(n),
            None => YamlValue::Str(text.to_owned()),
        },
    })
}

fn core_float_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?$")
            .expect("core float regex is valid")
    })
}

fn resolve_number(text: &str) -> Result<Option<YamlNumber>, YamlError> {
    let out_of_range = || YamlError::IntegerOutOfRange(text.to_owned());

    for (prefix, radix) in [("0x", 16), ("0o", 8)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return Ok(None);
            }
            let n = u64::from_str_radix(digits, radix).map_err(|_| out_of_range())?;
            return Ok(Some(unsigned(n)));
        }
    }

    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let n = if text.starts_with('-') {
            text.parse().map(YamlNumber::Int)
        } else {
            digits.parse().map(unsigned)
        };
        return n.map(Some).map_err(|_| out_of_range());
    }

    let special = match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ if core_float_regex().is_match(text) => text.parse().ok(),
        _ => None,
    };
    Ok(special.map(YamlNumber::Float))
}

fn unsigned(n: u64) -> YamlNumber {
    i64::try_from(n).map_or(YamlNumber::UInt(n), YamlNumber::Int)
}

/// Resolve a plain string to a boolean under YAML 1.1 rules.
pub(crate) fn yaml11_bool(s: &str, version: Option<YamlVersion>) -> Option<bool> {
    if version != Some(YamlVersion::V1_1) {
        return None;
    }
    if YAML11_TRUE.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if YAML11_FALSE.iter().any(|t| s.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

#[derive(Default)]
struct EventLog(Vec<Event>);

impl EventReceiver for EventLog {
    fn on_event(&mut self, event: Event) {
        self.0.push(event);
    }
}

/// Folds a recorded event stream into one value tree
struct TreeBuilder {
    events: std::vec::IntoIter<Event>,
    /// Anchor id to finished node, for alias expansion
    anchors: HashMap<usize, YamlValue>,
    version: Option<YamlVersion>,
}

impl TreeBuilder {
    fn new(events: Vec<Event>, version: Option<YamlVersion>) -> Self {
        Self {
            events: events.into_iter(),
            anchors: HashMap::new(),
            version,
        }
    }

    fn document(mut self) -> Result<YamlValue, YamlError> {
        let mut root = None;
        while let Some(event) = self.events.next() {
            if let Event::DocumentStart { .. } = event {
                if root.is_some() {
                    return Err(YamlError::MultipleDocuments);
                }
                let first = self.next_event()?;
                root = Some(self.node(first)?);
            }
        }
        Ok(root.unwrap_or(YamlValue::Null))
    }

    fn next_event(&mut self) -> Result<Event, YamlError> {
        self.events.next().ok_or(YamlError::UnexpectedEnd)
    }

    fn node(&mut self, event: Event) -> Result<YamlValue, YamlError> {
        let (anchor, value) = match event {
            Event::Scalar(text, style, anchor, tag) => {
                reject_tag(tag)?;
                let value = match style {
                    TScalarStyle::Plain => resolve_plain(&text, self.version)?,
                    _ => YamlValue::Str(text),
                };
                (anchor, value)
            }
            Event::SequenceStart(anchor, tag) => {
                reject_tag(tag)?;
                let mut items = Vec::new();
                loop {
                    match self.next_event()? {
                        Event::SequenceEnd => break,
                        event => items.push(self.node(event)?),
                    }
                }
                (anchor, YamlValue::Sequence(items))
            }
            Event::MappingStart(anchor, tag) => {
                reject_tag(tag)?;
                let mut entries = Vec::new();
                loop {
                    let key = match self.next_event()? {
                        Event::MappingEnd => break,
                        event => self.node(event)?,
                    };
                    if key.is_collection() {
                        return Err(YamlError::ComplexKey);
                    }
                    let value = self.next_event()?;
                    entries.push((key, self.node(value)?));
                }
                (anchor, YamlValue::Mapping(entries))
            }
            Event::Alias(id) => {
                return self.anchors.get(&id).cloned().ok_or(YamlError::UndefinedAlias);
            }
            _ => return Err(YamlError::UnexpectedEnd),
        };

        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
        Ok(value)
    }
}

fn reject_tag(tag: Option<Tag>) -> Result<(), YamlError> {
    match tag {
        Some(tag) => Err(YamlError::UnsupportedTag(format!("{}{}", tag.handle, tag.suffix))),
        None => Ok(()),
    }
}
