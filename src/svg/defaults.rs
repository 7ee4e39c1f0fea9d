//! Built-in optimizer options.
//!
//! Order matters: it is the order plugins are handed to the optimizer.

use serde_json::json;

use super::settings::OptionMap;

/// Fresh copy of the default option set.
pub fn default_options() -> OptionMap {
    [
        ("cleanupNumericValues", json!({ "floatPrecision": 3 })),
        ("convertTransform", json!({ "floatPrecision": 3 })),
        ("prefixIds", json!(false)),
        ("removeDimensions", json!(false)),
        ("expandViewBox", json!(false)),
        ("useSingleQuote", json!(false)),
        ("pretty", json!(false)),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect()
}
