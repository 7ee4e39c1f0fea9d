//! Optimizer configuration: merge defaults with overrides, then reshape.
//!
//! Maps keep insertion order (`serde_json` with `preserve_order`). An override
//! of an existing key keeps that key's position, new keys are appended. The
//! merge is shallow: object values are replaced, never merged.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::defaults::default_options;

/// Option name to option value.
pub type OptionMap = serde_json::Map<String, Value>;

/// A single-key mapping `{ name: value }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    pub name: String,
    pub value: Value,
}

impl Plugin {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// `false` and `null` switch a plugin off.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.value, Value::Bool(false) | Value::Null)
    }
}

impl Serialize for Plugin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.value)?;
        map.end()
    }
}

/// Overlay `overrides` on `defaults`. Override values win per key.
pub fn merge(defaults: &OptionMap, overrides: Option<&OptionMap>) -> OptionMap {
    let mut merged = defaults.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// One single-key plugin per option, in iteration order.
pub fn reshape(merged: OptionMap) -> Vec<Plugin> {
    merged
        .into_iter()
        .map(|(name, value)| Plugin { name, value })
        .collect()
}

// ============================================================================
// OptimizerSettings
// ============================================================================

/// Reshaped configuration for one build invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizerSettings {
    plugins: Vec<Plugin>,
}

impl OptimizerSettings {
    /// Built-in defaults overlaid with `overrides`.
    pub fn new(overrides: Option<&OptionMap>) -> Self {
        Self::from_layers(&default_options(), overrides)
    }

    pub fn from_layers(defaults: &OptionMap, overrides: Option<&OptionMap>) -> Self {
        Self {
            plugins: reshape(merge(defaults, overrides)),
        }
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.plugins
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> OptionMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_override_wins_and_order_is_kept() {
        let defaults = map(json!({ "a": 1, "b": 2 }));
        let overrides = map(json!({ "b": 3, "c": 4 }));

        let settings = OptimizerSettings::from_layers(&defaults, Some(&overrides));
        let names: Vec<_> = settings.plugins().iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(settings.get("b"), Some(&json!(3)));
        assert_eq!(settings.get("a"), Some(&json!(1)));
        assert_eq!(settings.get("c"), Some(&json!(4)));
    }

    #[test]
    fn test_merge_is_shallow() {
        let defaults = map(json!({ "cleanupNumericValues": { "floatPrecision": 3, "leadingZero": true } }));
        let overrides = map(json!({ "cleanupNumericValues": { "floatPrecision": 1 } }));

        let merged = merge(&defaults, Some(&overrides));
        assert_eq!(
            merged.get("cleanupNumericValues"),
            Some(&json!({ "floatPrecision": 1 }))
        );
    }

    #[test]
    fn test_no_overrides() {
        let defaults = map(json!({ "x": true }));
        assert_eq!(merge(&defaults, None), defaults);
    }

    #[test]
    fn test_reshaped_form_serializes_as_single_key_maps() {
        let defaults = map(json!({ "a": 1, "b": 2 }));
        let overrides = map(json!({ "b": 3, "c": 4 }));
        let settings = OptimizerSettings::from_layers(&defaults, Some(&overrides));

        let value = serde_json::to_value(settings.plugins()).unwrap();
        assert_eq!(value, json!([{ "a": 1 }, { "b": 3 }, { "c": 4 }]));
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let overrides = map(json!({ "someFuturePlugin": { "level": 2 } }));
        let settings = OptimizerSettings::new(Some(&overrides));
        assert_eq!(
            settings.get("someFuturePlugin"),
            Some(&json!({ "level": 2 }))
        );
        assert_eq!(
            settings.plugins().last().map(|p| p.name.as_str()),
            Some("someFuturePlugin")
        );
    }

    #[test]
    fn test_plugin_enabled() {
        assert!(Plugin::new("a", json!(true)).is_enabled());
        assert!(Plugin::new("a", json!({ "floatPrecision": 2 })).is_enabled());
        assert!(!Plugin::new("a", json!(false)).is_enabled());
        assert!(!Plugin::new("a", Value::Null).is_enabled());
    }
}
