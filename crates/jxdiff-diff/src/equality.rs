//! Deep structural equality over document values.

use serde_json::{Number, Value};

/// Structural equality of two document values.
///
/// Arrays compare in order, maps compare by key set regardless of key order,
/// numbers compare numerically. With `ignore_type_diff`, two primitives are
/// equal when they are loosely equal (`"1"` and `1`, `true` and `1`); the
/// relaxation never applies to arrays or maps.
///
/// The walk uses an explicit stack, so nesting depth is bounded by memory
/// rather than by the call stack.
pub fn values_equal(a: &Value, b: &Value, ignore_type_diff: bool) -> bool {
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        if std::ptr::eq(a, b) {
            continue;
        }
        match (a, b) {
            (Value::Array(xs), Value::Array(ys)) => {
                if xs.len() != ys.len() {
                    return false;
                }
                pending.extend(xs.iter().zip(ys));
            }
            (Value::Object(xs), Value::Object(ys)) => {
                if xs.len() != ys.len() {
                    return false;
                }
                for (key, x) in xs {
                    match ys.get(key) {
                        Some(y) => pending.push((x, y)),
                        None => return false,
                    }
                }
            }
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                return false;
            }
            _ => {
                if !primitives_equal(a, b, ignore_type_diff) {
                    return false;
                }
            }
        }
    }

    true
}

fn primitives_equal(a: &Value, b: &Value, ignore_type_diff: bool) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ if ignore_type_diff => loosely_equal(a, b),
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Loose equality between primitives of different type tags.
///
/// Booleans are converted to 0/1 and strings are converted to numbers, then
/// compared numerically. `null` is only loosely equal to `null`.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (to_loose_number(a), to_loose_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn to_loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => string_to_number(s),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric conversion of a string: surrounding whitespace is ignored, the
/// empty string is zero, `0x`/`0o`/`0b` prefixes are integer literals and
/// `Infinity` is the only accepted spelling of infinity.
fn string_to_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }

    let radix = match t.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&t[2..], radix).ok().map(|n| n as f64);
    }

    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Reject spellings Rust accepts but JSON-style numerals do not.
    if t.bytes().any(|c| c.is_ascii_alphabetic() && c != b'e' && c != b'E') {
        return None;
    }
    t.parse::<f64>().ok()
}
