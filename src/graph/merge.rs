//! Object-level merge used when folding configuration fragments

use serde_json::Value;

/// Merge `patch` into `target`
///
/// Objects merge key by key, lists concatenate (target first), and any other
/// collision is won by `patch`.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(patch)) => {
            target.extend(patch.iter().cloned());
        }
        (target, patch) => *target = patch.clone(),
    }
}
