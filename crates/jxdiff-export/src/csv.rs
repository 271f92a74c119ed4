//! CSV export of a changeset.

use jxdiff_types::DiffResult;

use crate::display_value;

const HEADER: &str = "Path,Type,Old Value,New Value";

/// One row per non-`unchanged` record, every field quoted.
///
/// Rows are separated by `\n` with no trailing newline.
pub fn to_csv(result: &DiffResult) -> String {
    let mut out = String::from(HEADER);
    for change in result.changed() {
        let fields = [
            change.path.clone(),
            change.kind.to_string(),
            display_value(change.old_value.as_ref()),
            display_value(change.new_value.as_ref()),
        ];
        out.push('\n');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_quoted(&mut out, field);
        }
    }
    out
}

fn push_quoted(out: &mut String, field: &str) {
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}
