//! Line parser for schema text.
//!
//! One field per non-blank line:
//!
//! ```text
//! cat.lives   @Number [1, 9] { min : 1, max : 9, opt }   -- Lives remaining
//! ^path       ^type   ^enum  ^args                        ^comment
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::descriptor::{ArgValue, Args, FieldDescriptor, FieldPath, Literal};
use super::errors::SchemaError;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\w.]+)\s+@(\w+)\s*(\[[^\]]*\])?\s*(\{[^}]*\})?\s*(-.*)?$").unwrap()
});

/// Parse a schema block into field descriptors, in declaration order.
pub fn parse(text: &str) -> Result<Vec<FieldDescriptor>, SchemaError> {
    let source: Arc<str> = normalize_source(text).into();
    let mut out = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        out.push(parse_line(line, idx + 1, &source)?);
    }

    Ok(out)
}

fn parse_line(
    line: &str,
    line_number: usize,
    source: &Arc<str>,
) -> Result<FieldDescriptor, SchemaError> {
    let malformed =
        || SchemaError::MalformedLine { line_number, line: line.trim().to_string() };

    let caps = LINE_RE.captures(line).ok_or_else(malformed)?;
    let path = FieldPath::parse(&caps[1]).ok_or_else(malformed)?;

    Ok(FieldDescriptor {
        path,
        type_name: caps[2].to_string(),
        enum_list: caps.get(3).map(|m| parse_list(m.as_str())).unwrap_or_default(),
        args: caps.get(4).map(|m| parse_args(m.as_str())).unwrap_or_default(),
        comment: caps.get(5).and_then(|m| parse_comment(m.as_str())),
        line_number,
        source: Arc::clone(source),
    })
}

/// Strip the delimiters off `[...]` / `{...}` and split on commas.
fn split_block(block: &str) -> impl Iterator<Item = &str> {
    let inner = block.trim();
    let inner = &inner[1..inner.len() - 1];
    inner.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn parse_list(block: &str) -> Vec<Literal> {
    split_block(block).map(Literal::parse).collect()
}

fn parse_args(block: &str) -> Args {
    let mut args = Args::new();
    for token in split_block(block) {
        match token.split_once(':') {
            Some((key, value)) => args.insert(key.trim(), ArgValue::parse(value)),
            None => args.insert(token, ArgValue::Bool(true)),
        }
    }
    args
}

fn parse_comment(raw: &str) -> Option<String> {
    let text = raw.trim_start_matches('-').trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Drop surrounding blank lines and the indentation shared by every line.
fn normalize_source(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let body = &lines[first..=last];

    let indent = body
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}
