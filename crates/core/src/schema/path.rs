//! Path resolution against a root value.
//!
//! The first segment of a field path is a root label and is never looked up;
//! the remaining segments walk into the value handed to the compiled schema.
//! `req.body.item` on a request object reads `request["body"]["item"]`.

use super::descriptor::FieldPath;
use crate::value::Value;

/// Read the target of `path` inside `root`.
///
/// Returns `None` as soon as an intermediate value is null, absent or not a
/// container. A path without segments yields `root` itself.
pub fn get<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in &path.segments {
        current = step(current, segment)?;
    }
    Some(current)
}

/// Mutable counterpart of [`get`], used to validate a nested schema where
/// its value lives.
pub fn get_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in &path.segments {
        current = step_mut(current, segment)?;
    }
    Some(current)
}

/// Write `value` at the location addressed by `path`.
///
/// Returns `false` without touching anything when the path has no segments
/// or an intermediate value is missing.
pub fn set(root: &mut Value, path: &FieldPath, value: Value) -> bool {
    let Some((last, parents)) = path.segments.split_last() else {
        return false;
    };

    let mut current = root;
    for segment in parents {
        let Some(next) = step_mut(current, segment) else {
            return false;
        };
        current = next;
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            true
        }
        Value::List(items) => match last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::List(items) => items.get(segment.parse::<usize>().ok()?),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::List(items) => items.get_mut(segment.parse::<usize>().ok()?),
        _ => None,
    }
}
