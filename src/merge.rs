//! Recursive merge of option trees.
//!
//! For every key (or index) of the source: nested objects and arrays merge into the
//! matching container of the target, which is replaced by an empty container of the
//! source's kind if it holds something else; every other value, `null` included,
//! overwrites. Unset options are `Option::None` at the typed layer and never enter a
//! tree, so they cannot clobber a default.

use serde_json::{Map, Value};

/// Merge `source` into `target` in place.
pub fn extend(target: &mut Value, source: &Value) {
    match source {
        Value::Object(src) => {
            let dst = ensure_object(target);
            for (key, value) in src {
                match value {
                    Value::Object(_) | Value::Array(_) => {
                        extend(dst.entry(key.clone()).or_insert(Value::Null), value)
                    }
                    scalar => {
                        dst.insert(key.clone(), scalar.clone());
                    }
                }
            }
        }
        Value::Array(src) => {
            let dst = ensure_array(target);
            if dst.len() < src.len() {
                dst.resize(src.len(), Value::Null);
            }
            for (slot, value) in dst.iter_mut().zip(src) {
                match value {
                    Value::Object(_) | Value::Array(_) => extend(slot, value),
                    scalar => *slot = scalar.clone(),
                }
            }
        }
        scalar => *target = scalar.clone(),
    }
}

/// Fresh tree holding `a` with `b` merged over it. Neither input is modified.
pub fn merge(a: &Value, b: &Value) -> Value {
    let mut out = Value::Object(Map::new());
    extend(&mut out, a);
    extend(&mut out, b);
    out
}

fn ensure_object(v: &mut Value) -> &mut Map<String, Value> {
    if !v.is_object() {
        *v = Value::Object(Map::new());
    }
    match v {
        Value::Object(map) => map,
        _ => unreachable!("just replaced with an object"),
    }
}

fn ensure_array(v: &mut Value) -> &mut Vec<Value> {
    if !v.is_array() {
        *v = Value::Array(Vec::new());
    }
    match v {
        Value::Array(items) => items,
        _ => unreachable!("just replaced with an array"),
    }
}

/// Set `value` at the object path `path`, creating intermediate objects.
pub fn set_path(tree: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return;
    };
    let mut node = tree;
    for key in parents {
        node = ensure_object(node)
            .entry((*key).to_string())
            .or_insert(Value::Null);
    }
    ensure_object(node).insert((*last).to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_path_creates_parents() {
        let mut tree = json!({"a": 1});
        set_path(&mut tree, &["yAxis", "min"], json!(0));
        assert_eq!(tree, json!({"a": 1, "yAxis": {"min": 0}}));
    }

    #[test]
    fn arrays_merge_by_index() {
        let mut t = json!({"xs": [1, {"a": 1}]});
        extend(&mut t, &json!({"xs": [null, {"b": 2}, 3]}));
        assert_eq!(t, json!({"xs": [null, {"a": 1, "b": 2}, 3]}));
    }
}
