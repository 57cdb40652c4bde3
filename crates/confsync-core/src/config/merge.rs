//! Structural merge of configuration values

use serde_json::Value;

/// Merge `overlay` into `base`.
///
/// A value is treated as a mergeable table only when it is a
/// [`Value::Object`]. When both sides are objects their keys are merged
/// recursively, with `overlay` winning on conflicts. In every other case
/// (scalars, arrays, mismatched kinds) the overlay replaces the base outright.
/// `null` in the overlay is a value like any other and replaces the base.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => {
                        base_map.insert(key, overlay_val);
                    }
                }
            }
        }
        (base, overlay) => {
            *base = overlay;
        }
    }
}
