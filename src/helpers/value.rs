use serde_json::{Map, Value};

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
/// every object and array (empty ones included) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthiness of `map[key]`, absent keys are falsy.
pub fn field_is_truthy(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).map(is_truthy).unwrap_or(false)
}
