//! Field descriptors produced by the line parser.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A literal from an enum list: a number where parseable, else text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Parse a token, treating it as a number iff it fully parses as a finite float.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match parse_number(token) {
            Some(n) => Self::Number(n),
            None => Self::Text(token.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Value of a single entry in an args block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Bare flag such as `{opt}`.
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ArgValue {
    /// Parse the value half of a `key: value` token.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match parse_number(token) {
            Some(n) => Self::Number(n),
            None => Self::Text(token.to_string()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

pub(crate) fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Options parsed from a `{...}` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    /// Reserved key: skip the field when its value is missing.
    pub const OPTIONAL: &'static str = "opt";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ArgValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether a flag is present and truthy.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(ArgValue::is_truthy)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value rendered as text, whatever its parsed kind.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    pub fn is_optional(&self) -> bool {
        self.flag(Self::OPTIONAL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(k, v)| match v {
                ArgValue::Bool(true) => k.to_string(),
                other => format!("{k}: {other}"),
            })
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A dotted field path split into its root label and accessor segments.
///
/// `cat.fur` has label `cat` and segments `["fur"]`; `cat` alone has no
/// segments and addresses the whole root value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPath {
    pub label: String,
    pub segments: Vec<String>,
}

impl FieldPath {
    /// Split a dotted path. Returns `None` when any segment is empty.
    pub fn parse(path: &str) -> Option<Self> {
        let mut parts = path.split('.');
        let label = parts.next().filter(|s| !s.is_empty())?.to_string();
        let segments: Vec<String> = parts.map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { label, segments })
    }

    /// Whether this path addresses the whole root value.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// One parsed schema line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub path: FieldPath,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "enum")]
    pub enum_list: Vec<Literal>,
    pub args: Args,
    pub comment: Option<String>,
    /// 1-based position within [`FieldDescriptor::source`].
    pub line_number: usize,
    /// The normalized schema block this field was parsed from.
    #[serde(skip)]
    pub source: Arc<str>,
}

impl FieldDescriptor {
    pub fn is_optional(&self) -> bool {
        self.args.is_optional()
    }
}
