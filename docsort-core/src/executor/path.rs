//! Dotted-path access into JSON documents.

use crate::error::ExecError;
use serde_json::{Map, Value};

/// Value at `path`, or `None` when any segment is missing or not an object.
pub fn get_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.as_object()?.get(segment))
}

/// Writes `value` at `path`, creating intermediate objects as needed.
pub fn set_path(document: &mut Value, path: &str, value: Value) -> Result<(), ExecError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return Err(invalid(path, "empty path"));
    };

    let mut current = as_object_mut(document, path)?;
    for segment in segments {
        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = as_object_mut(next, path)?;
    }
    current.insert(last.to_string(), value);
    Ok(())
}

/// Removes the value at `path` if present.
pub fn remove_path(document: &mut Value, path: &str) -> Option<Value> {
    match path.rsplit_once('.') {
        Some((parent, last)) => {
            let mut current = document;
            for segment in parent.split('.') {
                current = current.as_object_mut()?.get_mut(segment)?;
            }
            current.as_object_mut()?.remove(last)
        }
        None => document.as_object_mut()?.remove(path),
    }
}

fn as_object_mut<'a>(
    value: &'a mut Value,
    path: &str,
) -> Result<&'a mut Map<String, Value>, ExecError> {
    value
        .as_object_mut()
        .ok_or_else(|| invalid(path, "parent is not an object"))
}

fn invalid(path: &str, reason: &str) -> ExecError {
    ExecError::InvalidAssignment {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
