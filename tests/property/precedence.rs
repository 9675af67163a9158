//! Property-based tests for override precedence and typed accessors

use galen_config::config::{MapOverrides, PropertyOverlay};
use galen_config::values;
use galen_config::ConfigError;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn unset_key_resolves_to_default(key in key_strategy(), default in ".*") {
        let overrides = MapOverrides::new();
        let base = BTreeMap::new();
        let overlay = PropertyOverlay::new(&overrides, &base);
        prop_assert_eq!(overlay.resolve(&key, Some(default.as_str())), Some(default.clone()));
        prop_assert_eq!(overlay.resolve(&key, None), None);
    }

    #[test]
    fn override_always_wins(
        key in key_strategy(),
        override_value in ".*",
        base_value in ".*",
        default in proptest::option::of(".*"),
    ) {
        let overrides = MapOverrides::from_pairs([(key.clone(), override_value.clone())]);
        let base: BTreeMap<String, String> = [(key.clone(), base_value)].into_iter().collect();
        let overlay = PropertyOverlay::new(&overrides, &base);
        prop_assert_eq!(overlay.resolve(&key, default.as_deref()), Some(override_value));
    }

    #[test]
    fn mandatory_fails_only_when_blank_or_absent(
        key in key_strategy(),
        value in proptest::option::of("[ \\ta-z]{0,6}"),
    ) {
        let overrides = MapOverrides::new();
        let base: BTreeMap<String, String> = value
            .iter()
            .map(|v| (key.clone(), v.clone()))
            .collect();
        let overlay = PropertyOverlay::new(&overrides, &base);

        let result = overlay.resolve_mandatory(&key);
        match value {
            Some(v) if !v.trim().is_empty() => {
                prop_assert_eq!(result, Ok(v));
            }
            _ => {
                prop_assert_eq!(result, Err(ConfigError::MissingConfiguration { key: key.clone() }));
            }
        }
    }

    #[test]
    fn range_check_is_inclusive(min in -1000i32..1000, span in 0i32..1000, value in -3000i32..3000) {
        let max = min + span;
        let result = values::check_range("k", value, min, max);
        if value >= min && value <= max {
            prop_assert_eq!(result, Ok(value));
        } else {
            let is_out_of_range = matches!(result, Err(ConfigError::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }
    }
}
