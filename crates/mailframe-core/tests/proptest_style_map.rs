//! Property-based invariant tests for `StyleMap`.
//!
//! 1. Parsing never panics on arbitrary input.
//! 2. Serialize → parse is a fixed point.
//! 3. Setting one property leaves every other property and its position
//!    untouched.
//! 4. Removing a property never reorders the rest.

use mailframe_core::StyleMap;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{0,12}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9#%(), ]{0,10}[a-z0-9#%]"
}

fn style_strategy() -> impl Strategy<Value = StyleMap> {
    proptest::collection::vec((name_strategy(), value_strategy()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn parse_never_panics(input in ".{0,80}") {
        let style = StyleMap::parse(&input);
        let _ = style.to_css();
    }

    #[test]
    fn serialize_parse_is_fixed_point(style in style_strategy()) {
        let css = style.to_css();
        let reparsed = StyleMap::parse(&css);
        prop_assert_eq!(&reparsed, &style);
        prop_assert_eq!(reparsed.to_css(), css);
    }

    #[test]
    fn set_preserves_unrelated_properties(
        style in style_strategy(),
        name in name_strategy(),
        value in value_strategy(),
    ) {
        let before: Vec<(String, String)> = style
            .iter()
            .filter(|(n, _)| *n != name)
            .map(|(n, v)| (n.to_owned(), v.to_owned()))
            .collect();
        let mut edited = style.clone();
        edited.set(&name, &value);
        let after: Vec<(String, String)> = edited
            .iter()
            .filter(|(n, _)| *n != name)
            .map(|(n, v)| (n.to_owned(), v.to_owned()))
            .collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(edited.get(&name), Some(value.trim()));
    }

    #[test]
    fn remove_keeps_relative_order(style in style_strategy(), pick in 0usize..8) {
        let names: Vec<String> = style.iter().map(|(n, _)| n.to_owned()).collect();
        prop_assume!(!names.is_empty());
        let target = names[pick % names.len()].clone();
        let mut edited = style.clone();
        prop_assert!(edited.remove(&target).is_some());
        let remaining: Vec<String> = edited.iter().map(|(n, _)| n.to_owned()).collect();
        let expected: Vec<String> = names.into_iter().filter(|n| *n != target).collect();
        prop_assert_eq!(remaining, expected);
    }
}
