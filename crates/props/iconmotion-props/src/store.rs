//! Read/write access to a tree addressed by [`AccessPath`].
//!
//! The raw description (`serde_json::Value`) implements this for static
//! paths; engine adapters implement it over their live render tree for bound
//! paths.

use serde_json::Value as JsonValue;

use crate::error::PropsError;
use crate::path::{AccessPath, PathSegment};

pub trait PropertyStore {
    /// Read the value at `path`, or `None` if any segment is missing.
    fn read(&self, path: &AccessPath) -> Option<JsonValue>;

    /// Write `value` at `path`. The parent must exist; the leaf may be new.
    fn write(&mut self, path: &AccessPath, value: JsonValue) -> Result<(), PropsError>;
}

fn step<'a>(node: &'a JsonValue, seg: &PathSegment) -> Option<&'a JsonValue> {
    match (node, seg) {
        (JsonValue::Object(map), PathSegment::Key(k)) => map.get(k),
        (JsonValue::Object(map), PathSegment::Index(i)) => map.get(&i.to_string()),
        (JsonValue::Array(items), PathSegment::Index(i)) => items.get(*i),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut JsonValue, seg: &PathSegment) -> Option<&'a mut JsonValue> {
    match (node, seg) {
        (JsonValue::Object(map), PathSegment::Key(k)) => map.get_mut(k),
        (JsonValue::Object(map), PathSegment::Index(i)) => map.get_mut(&i.to_string()),
        (JsonValue::Array(items), PathSegment::Index(i)) => items.get_mut(*i),
        _ => None,
    }
}

/// Borrow the node at `path` inside a JSON tree.
pub fn lookup<'a>(root: &'a JsonValue, path: &AccessPath) -> Option<&'a JsonValue> {
    path.segments()
        .iter()
        .try_fold(root, |node, seg| step(node, seg))
}

impl PropertyStore for JsonValue {
    fn read(&self, path: &AccessPath) -> Option<JsonValue> {
        lookup(self, path).cloned()
    }

    fn write(&mut self, path: &AccessPath, value: JsonValue) -> Result<(), PropsError> {
        let (last, parents) = path
            .split_last()
            .ok_or_else(|| PropsError::InvalidPath("empty path".to_string()))?;
        let mut node = self;
        for seg in parents {
            node = step_mut(node, seg)
                .ok_or_else(|| PropsError::PathNotFound(path.to_string()))?;
        }
        match (node, last) {
            (JsonValue::Object(map), PathSegment::Key(k)) => {
                map.insert(k.clone(), value);
            }
            (JsonValue::Object(map), PathSegment::Index(i)) => {
                map.insert(i.to_string(), value);
            }
            (JsonValue::Array(items), PathSegment::Index(i)) => {
                // Appending one past the end is allowed (e.g. a missing alpha slot).
                if *i < items.len() {
                    items[*i] = value;
                } else if *i == items.len() {
                    items.push(value);
                } else {
                    return Err(PropsError::PathNotFound(path.to_string()));
                }
            }
            _ => return Err(PropsError::PathNotFound(path.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_and_write_nested() {
        let mut doc = json!({ "layers": [ { "ef": [ { "v": { "k": 2 } } ] } ] });
        let p = AccessPath::parse("layers.0.ef.0.v.k").unwrap();
        assert_eq!(doc.read(&p), Some(json!(2)));
        doc.write(&p, json!(5.5)).unwrap();
        assert_eq!(doc.read(&p), Some(json!(5.5)));
    }

    #[test]
    fn write_into_vector_component() {
        let mut doc = json!({ "v": { "k": [10.0, 20.0] } });
        let p = AccessPath::parse("v.k.1").unwrap();
        doc.write(&p, json!(7.0)).unwrap();
        assert_eq!(doc, json!({ "v": { "k": [10.0, 7.0] } }));
    }

    #[test]
    fn missing_parent_is_an_error() {
        let mut doc = json!({ "layers": [] });
        let p = AccessPath::parse("layers.3.ef").unwrap();
        assert!(matches!(
            doc.write(&p, json!(1)),
            Err(PropsError::PathNotFound(_))
        ));
        assert_eq!(doc.read(&p), None);
    }
}
