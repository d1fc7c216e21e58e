//! Structural merge of persisted settings onto the current default schema.
//!
//! Settings blobs written by older versions of the app miss fields that were added
//! since. Every read and every write goes through [`reconcile`] so the observable
//! settings object is always complete and current-shaped, while values the user
//! already customized are never replaced by defaults.

use serde_json::{Map, Value};

/// Merge `stored` onto `defaults`, recursively.
///
/// For every key of `defaults`: if both sides hold an object, recurse; otherwise the
/// stored value wins when present (arrays and primitives are atomic: a stored array
/// fully replaces the default one). Keys only the stored blob knows about survive the
/// merge. A stored `null` counts as absent, and a `stored` that is not an object at
/// all is treated as empty.
///
/// This is pure and total: no shape of `stored` can make it fail.
pub fn reconcile(defaults: &Value, stored: &Value) -> Value {
    let stored = match stored {
        Value::Object(map) => map,
        _ => return defaults.clone(),
    };
    let defaults = match defaults {
        Value::Object(map) => map,
        // Nothing sensible to merge onto
        _ => return Value::Object(stored.clone()),
    };

    let mut merged = Map::new();
    for (key, default_value) in defaults {
        let value = match stored.get(key) {
            None | Some(Value::Null) => default_value.clone(),
            Some(stored_value @ Value::Object(_)) => reconcile(default_value, stored_value),
            Some(stored_value) => stored_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    for (key, stored_value) in stored {
        if defaults.contains_key(key) == false {
            merged.insert(key.clone(), stored_value.clone());
        }
    }

    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_nested_defaults_appear_and_overrides_survive() {
        let defaults = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let stored = json!({"b": {"c": 99}});

        assert_eq!(reconcile(&defaults, &stored), json!({"a": 1, "b": {"c": 99, "d": 3}}));
    }

    #[test]
    fn arrays_are_atomic() {
        let defaults = json!({"presets": [{"id": "default"}]});
        let stored = json!({"presets": []});

        // The stored (empty) array fully replaces the default one, no element-wise merge
        assert_eq!(reconcile(&defaults, &stored), json!({"presets": []}));
    }

    #[test]
    fn primitives_replace_wholesale() {
        let defaults = json!({"zoomLevel": 1.0, "showTicker": true});
        let stored = json!({"zoomLevel": 2.5});

        assert_eq!(reconcile(&defaults, &stored), json!({"zoomLevel": 2.5, "showTicker": true}));
    }

    #[test]
    fn malformed_stored_degrades_to_defaults() {
        let defaults = json!({"a": 1});

        assert_eq!(reconcile(&defaults, &json!("not an object")), defaults);
        assert_eq!(reconcile(&defaults, &json!([1, 2, 3])), defaults);
        assert_eq!(reconcile(&defaults, &Value::Null), defaults);
    }

    #[test]
    fn stored_null_counts_as_absent() {
        let defaults = json!({"lastHolidayCountry": "om"});
        let stored = json!({"lastHolidayCountry": null});

        assert_eq!(reconcile(&defaults, &stored), defaults);
    }

    #[test]
    fn unknown_stored_keys_survive() {
        let defaults = json!({"a": 1});
        let stored = json!({"someFutureField": true});

        assert_eq!(reconcile(&defaults, &stored), json!({"a": 1, "someFutureField": true}));
    }

    #[test]
    fn reconciling_twice_is_stable() {
        let defaults = json!({"a": 1, "b": {"c": 2}});
        let stored = json!({"b": {"c": 99}, "extra": "kept"});

        let once = reconcile(&defaults, &stored);
        let twice = reconcile(&defaults, &once);
        assert_eq!(once, twice);
    }
}
