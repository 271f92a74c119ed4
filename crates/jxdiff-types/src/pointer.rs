//! RFC 6901 JSON Pointer helpers.
//!
//! Paths produced by the engine are JSON Pointers: `""` addresses the root,
//! every other location is a sequence of `/`-prefixed segments. Inside a
//! segment `~` is written as `~0` and `/` as `~1`.

use std::borrow::Cow;

use crate::error::PointerError;

/// Escape a single key or index for use as a pointer segment.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains(['~', '/']) {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
}

/// Reverse [`escape_segment`].
///
/// Fails on a `~` that is not followed by `0` or `1`.
pub fn unescape_segment(segment: &str) -> Result<Cow<'_, str>, PointerError> {
    if !segment.contains('~') {
        return Ok(Cow::Borrowed(segment));
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(PointerError::InvalidEscape(segment.to_string())),
        }
    }
    Ok(Cow::Owned(out))
}

/// Build the path of a child located under `parent` at `segment`.
pub fn child_path(parent: &str, segment: &str) -> String {
    let escaped = escape_segment(segment);
    let mut path = String::with_capacity(parent.len() + escaped.len() + 1);
    path.push_str(parent);
    path.push('/');
    path.push_str(&escaped);
    path
}

/// Split a pointer into its unescaped segments.
///
/// The root pointer `""` yields no segments.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let rest = pointer
        .strip_prefix('/')
        .ok_or_else(|| PointerError::MissingLeadingSlash(pointer.to_string()))?;
    rest.split('/')
        .map(|s| unescape_segment(s).map(Cow::into_owned))
        .collect()
}
