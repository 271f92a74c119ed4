//! Standalone HTML report.

use std::fmt::Write;

use jxdiff_types::{ChangeRecord, DiffResult};

use crate::display_value;

const STYLE: &str = r#"        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; line-height: 1.5; color: #24292e; padding: 20px; max-width: 1200px; margin: 0 auto; }
        h1 { border-bottom: 1px solid #eaecef; padding-bottom: .3em; }
        .stats { display: flex; gap: 20px; margin-bottom: 20px; }
        .stat-item { padding: 10px 20px; border-radius: 6px; font-weight: bold; font-size: 14px; }
        .added { background-color: #dafbe1; color: #22863a; }
        .removed { background-color: #ffeef0; color: #cb2431; }
        .modified { background-color: #fff5b1; color: #b08800; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; font-size: 13px; }
        th, td { text-align: left; padding: 8px 12px; border: 1px solid #dfe2e5; }
        th { background-color: #f6f8fa; }
        .diff-added { background-color: #e6ffed; }
        .diff-removed { background-color: #ffeef0; }
        .diff-modified { background-color: #fffdef; }
        .path { font-family: monospace; font-weight: bold; color: #0366d6; }
        .old-value, .new-value { font-family: monospace; white-space: pre-wrap; word-break: break-all; }
"#;

/// Render a self-contained HTML page listing every change of `result`.
///
/// `left_title` and `right_title` label the old and new value columns.
/// All interpolated text is HTML-escaped.
pub fn to_html_report(result: &DiffResult, left_title: &str, right_title: &str) -> String {
    let stats = &result.stats;
    let mut rows = String::new();
    for change in result.changed() {
        push_row(&mut rows, change);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>JSON Diff Report</title>
    <style>
{STYLE}    </style>
</head>
<body>
    <h1>JSON Diff Report</h1>
    <div class="stats">
        <div class="stat-item added">Added: {added}</div>
        <div class="stat-item removed">Removed: {removed}</div>
        <div class="stat-item modified">Modified: {modified}</div>
    </div>
    <table>
        <thead>
            <tr>
                <th>Path</th>
                <th>Type</th>
                <th>{left}</th>
                <th>{right}</th>
            </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
</body>
</html>
"#,
        added = stats.added,
        removed = stats.removed,
        modified = stats.modified,
        left = escape_html(left_title),
        right = escape_html(right_title),
    )
}

fn push_row(out: &mut String, change: &ChangeRecord) {
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"            <tr class="diff-row diff-{kind}">
                <td class="path">{path}</td>
                <td class="type">{kind}</td>
                <td class="old-value">{old}</td>
                <td class="new-value">{new}</td>
            </tr>
"#,
        kind = change.kind,
        path = escape_html(&change.path),
        old = escape_html(&display_value(change.old_value.as_ref())),
        new = escape_html(&display_value(change.new_value.as_ref())),
    );
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
