//! Unified-diff style export of the raw inputs.

use serde_json::Value;

/// Produce a `---`/`+++` line diff of two raw documents.
///
/// Inputs that parse as JSON are pretty-printed first so both sides share
/// one layout; anything else is compared as given. Lines are compared by
/// position only: equal lines get a space prefix, differing positions emit
/// the left line with `-` and the right line with `+`.
pub fn to_unified_diff(left_raw: &str, right_raw: &str, file_name: &str) -> String {
    let left = normalize(left_raw);
    let right = normalize(right_raw);
    let left_lines: Vec<&str> = left.split('\n').collect();
    let right_lines: Vec<&str> = right.split('\n').collect();

    let mut out = format!("--- a/{file_name}\n+++ b/{file_name}\n");
    for i in 0..left_lines.len().max(right_lines.len()) {
        match (left_lines.get(i), right_lines.get(i)) {
            (Some(l), Some(r)) if l == r => push_line(&mut out, ' ', l),
            (l, r) => {
                if let Some(l) = l {
                    push_line(&mut out, '-', l);
                }
                if let Some(r) = r {
                    push_line(&mut out, '+', r);
                }
            }
        }
    }
    out
}

fn normalize(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => format!("{value:#}"),
        Err(_) => raw.to_string(),
    }
}

fn push_line(out: &mut String, prefix: char, line: &str) {
    out.push(prefix);
    out.push_str(line);
    out.push('\n');
}
