//! Property-based tests for the guarantees every comparison must keep
//!
//! Values are generated as small nested trees of mappings, lists, tagged
//! lists, sets and scalars (NaN included); the properties below must hold
//! for all of them. Records are compared through their rendered form, since
//! NaN never equals itself structurally.

use proptest::prelude::*;
use serde_deepdiff::path::matches_prefix;
use serde_deepdiff::{Change, ChangeRecord, DeepDiff, DiffOptions, Value, ValueMap};
use std::collections::HashSet;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(Value::from),
        (-2.0f64..2.0).prop_map(Value::from),
        Just(Value::from(f64::NAN)),
        "[a-c]{0,3}".prop_map(Value::from),
    ]
}

fn object(entries: Vec<(String, Value)>) -> Value {
    let mut map = ValueMap::new();
    for (key, value) in entries {
        map.insert(key, value);
    }
    Value::Object(map)
}

/// Positional shapes only: mappings, lists and tagged lists.
fn arb_value() -> BoxedStrategy<Value> {
    leaf()
        .prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|items| Value::tagged("tuple", Value::Array(items))),
                prop::collection::vec(("[a-d]", inner), 0..4).prop_map(object),
            ]
        })
        .boxed()
}

/// Adds sets, which compare against lists without regard to order.
fn arb_value_with_sets() -> BoxedStrategy<Value> {
    leaf()
        .prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::set),
                prop::collection::vec(("[a-d]", inner), 0..4).prop_map(object),
            ]
        })
        .boxed()
}

fn records(old: &Value, new: &Value, options: DiffOptions) -> Vec<ChangeRecord> {
    DeepDiff::with_options(old.clone(), new.clone(), options)
        .unwrap()
        .report()
        .iter()
        .cloned()
        .collect()
}

fn summary(record: &ChangeRecord) -> String {
    format!("{} {:?}", record.path, record.change)
}

fn summaries<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Vec<String> {
    records.into_iter().map(summary).collect()
}

fn value_changes(records: &[ChangeRecord]) -> Vec<(String, String, String)> {
    records
        .iter()
        .filter_map(|record| match &record.change {
            Change::ValueChanged { old, new } => {
                Some((record.path.to_string(), old.to_string(), new.to_string()))
            }
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_identical_values_are_equal(value in arb_value_with_sets()) {
        let diff = DeepDiff::new(value.clone(), value);
        prop_assert!(diff.is_empty());
        prop_assert_eq!(diff.to_dict(), Value::Object(ValueMap::new()));
    }

    #[test]
    fn prop_value_changes_are_symmetric(a in arb_value(), b in arb_value()) {
        let forward = value_changes(&records(&a, &b, DiffOptions::new()));
        let backward = value_changes(&records(&b, &a, DiffOptions::new()));

        prop_assert_eq!(forward.len(), backward.len());
        for (path, old, new) in forward {
            let swapped = (path, new, old);
            prop_assert!(backward.contains(&swapped), "missing {:?}", swapped);
        }
    }

    #[test]
    fn prop_ignore_order_ignores_permutations(
        (items, shuffled) in prop::collection::vec(arb_value(), 0..8)
            .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
    ) {
        let diff = DeepDiff::with_options(
            Value::Array(items),
            Value::Array(shuffled),
            DiffOptions::new().ignore_order(true),
        ).unwrap();
        prop_assert!(diff.is_empty());
    }

    #[test]
    fn prop_unordered_addresses_are_unique(
        a in arb_value_with_sets(),
        b in arb_value_with_sets(),
    ) {
        let mut seen = HashSet::new();
        for record in records(&a, &b, DiffOptions::new().ignore_order(true)) {
            let path = record.path.to_string();
            prop_assert!(seen.insert(path.clone()), "address {} used twice", path);
        }
    }

    #[test]
    fn prop_atol_is_monotonic(
        pairs in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 0..10),
        small in 0.0f64..10.0,
        extra in 0.0f64..10.0,
    ) {
        let old = Value::Array(pairs.iter().map(|(x, _)| Value::from(*x)).collect());
        let new = Value::Array(pairs.iter().map(|(_, y)| Value::from(*y)).collect());

        let strict = records(&old, &new, DiffOptions::new().atol(small)).len();
        let loose = records(&old, &new, DiffOptions::new().atol(small + extra)).len();
        prop_assert!(loose <= strict);
    }

    #[test]
    fn prop_include_yields_subset(a in arb_value(), b in arb_value()) {
        let all = summaries(&records(&a, &b, DiffOptions::new()));
        let included = records(&a, &b, DiffOptions::new().include_paths(["root['a']"]));
        for record in &included {
            prop_assert!(all.contains(&summary(record)), "unexpected {:?}", record);
        }
    }

    #[test]
    fn prop_exclude_removes_exactly_the_excluded(a in arb_value(), b in arb_value()) {
        let patterns = ["root['b']", "root[0]"];
        let all = records(&a, &b, DiffOptions::new());
        let expected = summaries(all.iter().filter(|record| {
            !patterns
                .iter()
                .any(|pattern| matches_prefix(record.path.as_str(), pattern))
        }));

        let excluded = records(&a, &b, DiffOptions::new().exclude_paths(patterns));
        prop_assert_eq!(summaries(&excluded), expected);
    }
}
