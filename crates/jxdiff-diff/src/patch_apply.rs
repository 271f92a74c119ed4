//! RFC 6902 patch replay.
//!
//! Patches produced by the differ replay in emitted order; externally
//! produced patches using `move`, `copy` and `test` are accepted too.

use jxdiff_types::{parse_pointer, PatchOperation};
use serde_json::Value;

use crate::equality::values_equal;
use crate::error::{PatchError, PatchFailure, PatchResult};
use crate::value::deep_clone;

/// Apply `ops` to `doc` in order.
///
/// Stops at the first failing operation; earlier operations stay applied.
/// Use [`apply_patch_to`] when the input must be left untouched on failure.
pub fn apply_patch(doc: &mut Value, ops: &[PatchOperation]) -> PatchResult<()> {
    for (index, op) in ops.iter().enumerate() {
        apply_operation(doc, op).map_err(|failure| PatchError {
            index,
            op: op.op_name(),
            path: op.path().to_string(),
            failure,
        })?;
    }
    Ok(())
}

/// Apply `ops` to a copy of `doc` and return the patched copy.
pub fn apply_patch_to(doc: &Value, ops: &[PatchOperation]) -> PatchResult<Value> {
    let mut patched = deep_clone(doc);
    apply_patch(&mut patched, ops)?;
    Ok(patched)
}

fn apply_operation(doc: &mut Value, op: &PatchOperation) -> Result<(), PatchFailure> {
    match op {
        PatchOperation::Add { path, value } => add(doc, &parse_pointer(path)?, deep_clone(value)),
        PatchOperation::Remove { path } => remove(doc, &parse_pointer(path)?).map(drop),
        PatchOperation::Replace { path, value } => {
            *resolve_mut(doc, &parse_pointer(path)?)? = deep_clone(value);
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            let from = parse_pointer(from)?;
            let to = parse_pointer(path)?;
            if from == to {
                return Ok(());
            }
            if to.starts_with(&from) {
                return Err(PatchFailure::MoveIntoSelf);
            }
            let value = remove(doc, &from)?;
            add(doc, &to, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = deep_clone(resolve(doc, &parse_pointer(from)?)?);
            add(doc, &parse_pointer(path)?, value)
        }
        PatchOperation::Test { path, value } => {
            if values_equal(resolve(doc, &parse_pointer(path)?)?, value, false) {
                Ok(())
            } else {
                Err(PatchFailure::TestFailed)
            }
        }
    }
}

fn add(doc: &mut Value, segments: &[String], value: Value) -> Result<(), PatchFailure> {
    let Some((last, parent)) = segments.split_last() else {
        *doc = value;
        return Ok(());
    };
    match resolve_mut(doc, parent)? {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            let index = parse_index(last)?;
            if index > items.len() {
                return Err(PatchFailure::InvalidIndex(last.clone()));
            }
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchFailure::NotAContainer),
    }
}

fn remove(doc: &mut Value, segments: &[String]) -> Result<Value, PatchFailure> {
    let (last, parent) = segments.split_last().ok_or(PatchFailure::RemoveRoot)?;
    match resolve_mut(doc, parent)? {
        Value::Object(map) => map.shift_remove(last.as_str()).ok_or(PatchFailure::NotFound),
        Value::Array(items) => {
            let index = parse_index(last)?;
            if index >= items.len() {
                return Err(PatchFailure::NotFound);
            }
            Ok(items.remove(index))
        }
        _ => Err(PatchFailure::NotAContainer),
    }
}

fn resolve<'a>(doc: &'a Value, segments: &[String]) -> Result<&'a Value, PatchFailure> {
    let mut current = doc;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => items.get(parse_index(segment)?),
            _ => None,
        }
        .ok_or(PatchFailure::NotFound)?;
    }
    Ok(current)
}

fn resolve_mut<'a>(doc: &'a mut Value, segments: &[String]) -> Result<&'a mut Value, PatchFailure> {
    let mut current = doc;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get_mut(segment.as_str()),
            Value::Array(items) => items.get_mut(parse_index(segment)?),
            _ => None,
        }
        .ok_or(PatchFailure::NotFound)?;
    }
    Ok(current)
}

/// Array indices are plain decimal without leading zeros.
fn parse_index(segment: &str) -> Result<usize, PatchFailure> {
    let well_formed = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if !well_formed {
        return Err(PatchFailure::InvalidIndex(segment.to_string()));
    }
    segment
        .parse()
        .map_err(|_| PatchFailure::InvalidIndex(segment.to_string()))
}
