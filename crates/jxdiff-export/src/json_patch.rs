use jxdiff_types::DiffResult;

use crate::error::ExportResult;

/// Serialize the patch of `result` as a pretty-printed JSON array.
pub fn to_json_patch(result: &DiffResult) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(&result.patch)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jxdiff_types::PatchOperation;
    use serde_json::{json, Value};

    #[test]
    fn patch_document() {
        let mut result = DiffResult::new();
        result.patch.push(PatchOperation::replace("/x", json!(2)));
        result.patch.push(PatchOperation::remove("/y"));

        let text = to_json_patch(&result).unwrap();
        assert!(text.contains("\n  {"));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"op": "replace", "path": "/x", "value": 2},
                {"op": "remove", "path": "/y"}
            ])
        );
    }

    #[test]
    fn empty_patch() {
        assert_eq!(to_json_patch(&DiffResult::new()).unwrap(), "[]");
    }
}
