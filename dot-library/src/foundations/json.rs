//! Conversions between script values and `serde_json` values.

use crate::foundations::array::Array;
use crate::foundations::object::Object;
use crate::foundations::value::Value;
use ecow::EcoString;
use serde_json::Number;

pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s.as_str().into()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (EcoString::from(key.as_str()), from_json(value)))
                .collect(),
        ),
    }
}

/// Converts a value to JSON like `JSON.stringify` does.
///
/// `undefined` and functions have no JSON form and yield `None` at the top
/// level; inside objects they are skipped, inside arrays they become `null`.
pub fn to_json(value: &Value) -> Option<serde_json::Value> {
    to_json_at_depth(value, 0)
}

// Cyclic structures are cut off instead of overflowing the stack.
const MAX_DEPTH: usize = 256;

fn to_json_at_depth(value: &Value, depth: usize) -> Option<serde_json::Value> {
    if depth > MAX_DEPTH {
        return Some(serde_json::Value::Null);
    }

    Some(match value {
        Value::Undefined | Value::Func(_) => return None,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Array(array) => array_to_json(array, depth),
        Value::Object(object) => object_to_json(object, depth),
    })
}

fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn array_to_json(array: &Array, depth: usize) -> serde_json::Value {
    serde_json::Value::Array(
        array
            .snapshot()
            .iter()
            .map(|item| to_json_at_depth(item, depth + 1).unwrap_or(serde_json::Value::Null))
            .collect(),
    )
}

fn object_to_json(object: &Object, depth: usize) -> serde_json::Value {
    let map = object
        .borrow()
        .iter()
        .filter_map(|(key, value)| {
            to_json_at_depth(value, depth + 1).map(|json| (key.to_string(), json))
        })
        .collect();
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_key_order() {
        let value = from_json(&json!({"b": 1, "a": [true, null, "x"]}));
        let Value::Object(object) = value else {
            panic!("expected an object");
        };
        assert_eq!(object.keys(), ["b", "a"]);
    }

    #[test]
    fn test_integers_serialize_without_fraction() {
        let value = Value::from(vec![Value::from(1.0), Value::from(1.5), Value::Number(f64::NAN)]);
        assert_eq!(to_json(&value), Some(json!([1, 1.5, null])));
    }

    #[test]
    fn test_undefined_is_skipped() {
        let object = Object::new().with("a", Value::Undefined).with("b", 2.0);
        assert_eq!(to_json(&Value::Object(object)), Some(json!({"b": 2})));
        assert_eq!(to_json(&Value::Undefined), None);
    }
}
