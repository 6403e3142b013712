use serde_json::Value;

pub const SECTION_SEPARATOR: &str = "\n---\n";

/// String field accessor with a fixed fallback for absent, null, or
/// non-string values.
pub fn text_or<'a>(value: &'a Value, key: &str, default: &'a str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Numeric field accessor; absent or non-numeric values render as 0.
pub fn int_or(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Accessor for fields whose upstream type wavers between string and number
/// (the rail API serializes most scalars as strings, but not all).
pub fn scalar_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

pub fn clamp_limit(requested: Option<usize>, default: usize, cap: usize) -> usize {
    requested.unwrap_or(default).min(cap)
}

/// Truncates to `max_chars` characters, marking truncation with an ellipsis.
pub fn truncate(raw: &str, max_chars: usize) -> String {
    let mut out = String::new();
    for (i, ch) in raw.chars().enumerate() {
        if i >= max_chars {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    out
}
