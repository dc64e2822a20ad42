//! Deep merge algorithm for YAML configuration values.
//!
//! `.mabs/config.local.yml` is layered over `.mabs/config.yml`; this module
//! implements the merge semantics.
//!
//! # Merge Rules
//!
//! - Objects are merged recursively
//! - Arrays are replaced entirely (not merged)
//! - Null values in overlay delete the corresponding key from base
//! - Scalars in overlay replace scalars in base

use serde_yaml::Value;

/// Deep merge two YAML values.
///
/// Later values override earlier values at the point of conflict.
/// Objects are merged recursively. Arrays are replaced entirely.
/// Null values in overlay delete the corresponding key from base.
///
/// # Arguments
///
/// * `base` - The base configuration
/// * `overlay` - The overlay configuration (takes precedence)
///
/// # Returns
///
/// A new Value with merged contents
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        // Both are mappings: merge recursively
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    // Null in overlay = delete from result
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    // Key exists in both: recurse
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    // Key only in overlay: insert
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        // Overlay is not a mapping, or base is not a mapping: overlay wins
        (_, overlay) => overlay.clone(),
    }
}

/// Merge multiple configs in order (later overrides earlier).
///
/// # Arguments
///
/// * `configs` - Slice of configs in merge order (first is base, last has highest priority)
///
/// # Returns
///
/// A single merged Value
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, config| {
            deep_merge(&acc, config)
        })
}
