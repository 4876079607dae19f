//! Deterministic JSON encoding for equality checks
//!
//! Object keys are emitted in ascending code-point order at every depth;
//! array order is preserved. The output is only ever compared, never parsed
//! back or stored.

use serde_json::{Number, Value};

/// Largest integer an IEEE double represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Encode `value` with recursively sorted object keys.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Encode a possibly missing value.
///
/// A missing value encodes to the empty string, which no JSON value
/// produces, so it never equals an explicit `null`.
pub fn encode_optional(value: Option<&Value>) -> String {
    value.map(encode).unwrap_or_default()
}

/// Whether two values are equal for sync purposes.
pub fn same(a: Option<&Value>, b: Option<&Value>) -> bool {
    encode_optional(a) == encode_optional(b)
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => out.push_str(&value.to_string()),
        Value::Number(number) => write_number(out, number),
        Value::Array(items) => {
            out.push('[');
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));

            out.push('{');
            for (position, (key, item)) in entries.into_iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

// Integral floats render as integers so `1.0` and `1` compare equal.
#[allow(clippy::cast_possible_truncation)]
fn write_number(out: &mut String, number: &Number) {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            if float.fract() == 0.0 && float.abs() < MAX_SAFE_INTEGER {
                out.push_str(&(float as i64).to_string());
                return;
            }
        }
    }
    out.push_str(&number.to_string());
}
