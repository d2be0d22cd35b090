//! YAML value tree

use std::fmt;

/// YAML version announced by a `%YAML` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YamlVersion {
    /// YAML 1.1: `y`/`n`/`yes`/`no`/`on`/`off` are booleans
    V1_1,
    /// YAML 1.2 core schema
    V1_2,
}

impl YamlVersion {
    /// Get the version as it appears in the directive
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
        }
    }

    /// Parse the version part of a `%YAML` directive
    pub fn from_directive(version: &str) -> Option<Self> {
        match version {
            "1.1" => Some(Self::V1_1),
            "1.2" => Some(Self::V1_2),
            _ => None,
        }
    }
}

impl fmt::Display for YamlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A YAML number
///
/// Equality is numeric: `Int(1) == Float(1.0)`, and two NaNs are equal.
#[derive(Debug, Clone, Copy)]
pub enum YamlNumber {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl YamlNumber {
    fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::Int(i) => Some(i128::from(i)),
            Self::UInt(u) => Some(i128::from(u)),
            Self::Float(_) => None,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(i) => i as f64,
            Self::UInt(u) => u as f64,
            Self::Float(f) => f,
        }
    }
}

impl PartialEq for YamlNumber {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return a == b;
        }
        let (a, b) = (self.as_f64(), other.as_f64());
        a == b || (a.is_nan() && b.is_nan())
    }
}

impl fmt::Display for YamlNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => f.write_str(&format_float(x)),
        }
    }
}

/// Shortest round-trip rendering of a float.
///
/// Magnitudes at or above 1e16 and below 1e-5 are written as `m.de±x` so the
/// text stays a float under both YAML 1.1 and 1.2 resolution.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        return ".nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0" }.to_string();
    }

    let magnitude = x.abs();
    if !(1e-5..1e16).contains(&magnitude) {
        let raw = format!("{x:e}");
        let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{mantissa}.0")
        };
        let exponent = if exponent.starts_with('-') {
            exponent.to_string()
        } else {
            format!("+{exponent}")
        };
        return format!("{mantissa}e{exponent}");
    }

    format!("{x}")
}

/// A parsed YAML node
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Bool(bool),
    Number(YamlNumber),
    Str(String),
    Sequence(Vec<YamlValue>),
    /// Entries in source order; duplicate keys are kept
    Mapping(Vec<(YamlValue, YamlValue)>),
}

impl YamlValue {
    /// Check whether this node is a sequence or a mapping
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }
}
