//! Stack-safe copies of document values.

use serde_json::{Map, Value};

enum Step<'a> {
    Visit(&'a Value),
    Array(usize),
    Object(Vec<&'a String>),
}

/// Copy `value` without recursion.
///
/// `Value::clone` recurses once per nesting level; this walks an explicit
/// stack instead, so copying a change out of a very deep document cannot
/// exhaust the call stack.
pub fn deep_clone(value: &Value) -> Value {
    let mut steps = vec![Step::Visit(value)];
    let mut built: Vec<Value> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(Value::Array(items)) => {
                steps.push(Step::Array(items.len()));
                steps.extend(items.iter().rev().map(Step::Visit));
            }
            Step::Visit(Value::Object(map)) => {
                steps.push(Step::Object(map.keys().collect()));
                steps.extend(map.values().rev().map(Step::Visit));
            }
            Step::Visit(scalar) => built.push(scalar.clone()),
            Step::Array(len) => {
                let items = built.split_off(built.len() - len);
                built.push(Value::Array(items));
            }
            Step::Object(keys) => {
                let values = built.split_off(built.len() - keys.len());
                let map: Map<String, Value> = keys.into_iter().cloned().zip(values).collect();
                built.push(Value::Object(map));
            }
        }
    }

    built.pop().unwrap_or(Value::Null)
}
