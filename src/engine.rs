//! The recursive comparison.
//!
//! [`Engine`] walks both values in lockstep, reducing each side to its
//! canonical node as it goes and pushing a [`ChangeRecord`] for every
//! difference it finds. The walk never fails: cycles, failing adapters and
//! incomparable shapes all end up as records.
//!
//! ## Order-insensitive sequences
//!
//! With `ignore_order`, or when exactly one side is a set, elements are
//! matched as multisets:
//!
//! 1. Every element is fingerprinted; elements with equal fingerprints and
//!    equal content cancel, first occurrences first.
//! 2. The rest is paired greedily. Each remaining old element takes the first
//!    remaining new element that yields the fewest records. Containers only
//!    pair with containers of the same kind; scalars only pair when equal
//!    under the policy.
//! 3. Pairs are compared at synthetic indices `0, 1, ...` in pairing order.
//!    Unpaired old elements are reported as removed, then unpaired new
//!    elements as added, at the synthetic indices that follow, so no two
//!    records of one collection share an address.
//!
//! The pairing is greedy, not a minimal matching.

use crate::canonical::{
    canonical_cmp, canonicalize, category, fingerprint, Category, Node, NodeKind,
};
use crate::{
    Change, ChangeRecord, ContainerKind, EquivalencePolicy, Key, Path, Step, TypeTag, Value,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// One traversal over a pair of values.
pub struct Engine<'p> {
    policy: &'p EquivalencePolicy,
    records: Vec<ChangeRecord>,
    old_open: Vec<usize>,
    new_open: Vec<usize>,
    filtered: bool,
}

impl<'p> Engine<'p> {
    #[must_use]
    pub fn new(policy: &'p EquivalencePolicy) -> Self {
        Engine {
            policy,
            records: Vec::new(),
            old_open: Vec::new(),
            new_open: Vec::new(),
            filtered: !policy.filter().is_empty(),
        }
    }

    /// Compares two values from the root and returns the records found.
    #[must_use]
    pub fn run(mut self, old: &Value, new: &Value) -> Vec<ChangeRecord> {
        self.diff(old, new, &Path::root());
        self.records
    }

    fn allowed(&self, path: &Path) -> bool {
        !self.filtered || self.policy.filter().allows(path)
    }

    fn push(&mut self, path: Path, change: Change) {
        if self.allowed(&path) {
            self.records.push(ChangeRecord::new(path, change));
        }
    }

    fn diff(&mut self, old: &Value, new: &Value, path: &Path) {
        if !self.allowed(path) {
            return;
        }
        if same_identity(old, new) {
            return;
        }

        let lhs = canonicalize(old, &self.old_open);
        let rhs = canonicalize(new, &self.new_open);
        debug!(
            path = %path,
            old_kind = ?lhs.node.kind(),
            new_kind = ?rhs.node.kind(),
            "comparing"
        );

        let (old_depth, new_depth) = (self.old_open.len(), self.new_open.len());
        self.old_open.extend_from_slice(&lhs.identities);
        self.new_open.extend_from_slice(&rhs.identities);

        match (&lhs.node, &rhs.node) {
            (
                Node::Scalar {
                    value: a,
                    tag: a_tag,
                },
                Node::Scalar {
                    value: b,
                    tag: b_tag,
                },
            ) => self.diff_scalars(a, a_tag, b, b_tag, path),
            (Node::Mapping { entries: a, .. }, Node::Mapping { entries: b, .. }) => {
                self.diff_mappings(a, b, path)
            }
            (Node::OrderedSequence { items: a, .. }, Node::OrderedSequence { items: b, .. }) => {
                if self.policy.ignore_order() {
                    self.diff_unordered(
                        a,
                        ContainerKind::Iterable,
                        b,
                        ContainerKind::Iterable,
                        path,
                    );
                } else {
                    self.diff_ordered(a, b, path);
                }
            }
            (
                Node::UnorderedCollection { items: a, .. },
                Node::UnorderedCollection { items: b, .. },
            ) => self.diff_sets(a, b, path),
            (Node::OrderedSequence { items: a, .. }, Node::UnorderedCollection { items: b, .. }) => {
                self.diff_unordered(a, ContainerKind::Iterable, b, ContainerKind::Set, path)
            }
            (Node::UnorderedCollection { items: a, .. }, Node::OrderedSequence { items: b, .. }) => {
                self.diff_unordered(a, ContainerKind::Set, b, ContainerKind::Iterable, path)
            }
            (Node::Visited(a), Node::Visited(b)) => {
                if a != b {
                    self.push(
                        path.clone(),
                        Change::ValueChanged {
                            old: old.clone(),
                            new: new.clone(),
                        },
                    );
                }
            }
            (a, b) => {
                let (old_type, new_type) = (a.type_name(), b.type_name());
                let change = if self.policy.tags_grouped(&old_type, &new_type) {
                    Change::ValueChanged {
                        old: old.clone(),
                        new: new.clone(),
                    }
                } else {
                    Change::TypeChanged {
                        old: old.clone(),
                        new: new.clone(),
                        old_type,
                        new_type,
                    }
                };
                self.push(path.clone(), change);
            }
        }

        self.old_open.truncate(old_depth);
        self.new_open.truncate(new_depth);
    }

    fn diff_scalars(&mut self, a: &Value, a_tag: &TypeTag, b: &Value, b_tag: &TypeTag, path: &Path) {
        if self.policy.scalars_equal(a, a_tag, b, b_tag) {
            return;
        }
        let both_numbers =
            category(a) == Some(Category::Number) && category(b) == Some(Category::Number);
        let change = if both_numbers || self.policy.tags_grouped(a_tag, b_tag) {
            Change::ValueChanged {
                old: a.clone(),
                new: b.clone(),
            }
        } else {
            Change::TypeChanged {
                old: a.clone(),
                new: b.clone(),
                old_type: a_tag.clone(),
                new_type: b_tag.clone(),
            }
        };
        self.push(path.clone(), change);
    }

    fn diff_mappings(
        &mut self,
        old: &[(Cow<'_, Key>, Cow<'_, Value>)],
        new: &[(Cow<'_, Key>, Cow<'_, Value>)],
        path: &Path,
    ) {
        let new_index: FxHashMap<&Key, &Value> =
            new.iter().map(|(key, value)| (&**key, &**value)).collect();
        let old_keys: FxHashSet<&Key> = old.iter().map(|(key, _)| &**key).collect();

        for (key, old_value) in old {
            let child = path.child(Step::from_key(key));
            match new_index.get(&**key) {
                Some(new_value) => self.diff(old_value, new_value, &child),
                None => self.push(
                    child,
                    Change::ItemRemoved {
                        container: ContainerKind::Mapping,
                        value: Value::clone(old_value),
                    },
                ),
            }
        }
        for (key, new_value) in new {
            if !old_keys.contains(&**key) {
                self.push(
                    path.child(Step::from_key(key)),
                    Change::ItemAdded {
                        container: ContainerKind::Mapping,
                        value: Value::clone(new_value),
                    },
                );
            }
        }
    }

    fn diff_ordered(&mut self, old: &[Cow<'_, Value>], new: &[Cow<'_, Value>], path: &Path) {
        let shared = old.len().min(new.len());
        for idx in 0..shared {
            self.diff(&old[idx], &new[idx], &path.child(Step::Index(idx)));
        }
        for (idx, item) in old.iter().enumerate().skip(shared) {
            self.push(
                path.child(Step::Index(idx)),
                Change::ItemRemoved {
                    container: ContainerKind::Iterable,
                    value: Value::clone(item),
                },
            );
        }
        for (idx, item) in new.iter().enumerate().skip(shared) {
            self.push(
                path.child(Step::Index(idx)),
                Change::ItemAdded {
                    container: ContainerKind::Iterable,
                    value: Value::clone(item),
                },
            );
        }
    }

    /// Two sets: sort both sides, then compare position by position.
    fn diff_sets(&mut self, old: &[Cow<'_, Value>], new: &[Cow<'_, Value>], path: &Path) {
        let mut old_sorted: Vec<&Value> = old.iter().map(|item| &**item).collect();
        let mut new_sorted: Vec<&Value> = new.iter().map(|item| &**item).collect();
        old_sorted.sort_by(|a, b| canonical_cmp(a, b));
        new_sorted.sort_by(|a, b| canonical_cmp(a, b));

        let shared = old_sorted.len().min(new_sorted.len());
        for idx in 0..shared {
            self.diff(old_sorted[idx], new_sorted[idx], &path.child(Step::Index(idx)));
        }
        for (idx, item) in old_sorted.iter().enumerate().skip(shared) {
            self.push(
                path.child(Step::Index(idx)),
                Change::ItemRemoved {
                    container: ContainerKind::Set,
                    value: (*item).clone(),
                },
            );
        }
        for (idx, item) in new_sorted.iter().enumerate().skip(shared) {
            self.push(
                path.child(Step::Index(idx)),
                Change::ItemAdded {
                    container: ContainerKind::Set,
                    value: (*item).clone(),
                },
            );
        }
    }

    fn diff_unordered(
        &mut self,
        old: &[Cow<'_, Value>],
        old_container: ContainerKind,
        new: &[Cow<'_, Value>],
        new_container: ContainerKind,
        path: &Path,
    ) {
        let mut buckets: FxHashMap<u64, VecDeque<usize>> = FxHashMap::default();
        for (idx, item) in new.iter().enumerate() {
            buckets.entry(fingerprint(item)).or_default().push_back(idx);
        }

        let mut new_taken = vec![false; new.len()];
        let mut old_rest = Vec::new();
        for (idx, item) in old.iter().enumerate() {
            let matched = buckets
                .get_mut(&fingerprint(item))
                .and_then(|bucket| take_equal(bucket, item, new));
            match matched {
                Some(matched) => new_taken[matched] = true,
                None => old_rest.push(idx),
            }
        }
        let new_rest: Vec<usize> = (0..new.len()).filter(|idx| !new_taken[*idx]).collect();
        trace!(
            path = %path,
            unmatched_old = old_rest.len(),
            unmatched_new = new_rest.len(),
            "fingerprints cancelled"
        );

        let new_kinds: Vec<NodeKind> = new_rest
            .iter()
            .map(|&idx| canonicalize(&new[idx], &self.new_open).node.kind())
            .collect();
        let mut new_paired = vec![false; new_rest.len()];
        let mut old_unpaired = Vec::new();
        let mut pairs = Vec::new();

        for &old_idx in &old_rest {
            let old_kind = canonicalize(&old[old_idx], &self.old_open).node.kind();
            let mut best: Option<(usize, usize)> = None;
            for (slot, &new_idx) in new_rest.iter().enumerate() {
                if new_paired[slot] || new_kinds[slot] != old_kind {
                    continue;
                }
                let cost = self.distance(&old[old_idx], &new[new_idx]);
                let scalar_like = matches!(old_kind, NodeKind::Scalar | NodeKind::Visited);
                if scalar_like && cost > 0 {
                    continue;
                }
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((slot, cost));
                }
                if cost == 0 {
                    break;
                }
            }
            match best {
                Some((slot, cost)) => {
                    trace!(path = %path, old_index = old_idx, new_index = new_rest[slot], cost, "paired");
                    new_paired[slot] = true;
                    pairs.push((old_idx, new_rest[slot]));
                }
                None => old_unpaired.push(old_idx),
            }
        }

        let mut synthetic = 0;
        for (old_idx, new_idx) in pairs {
            self.diff(&old[old_idx], &new[new_idx], &path.child(Step::Index(synthetic)));
            synthetic += 1;
        }
        for old_idx in old_unpaired {
            self.push(
                path.child(Step::Index(synthetic)),
                Change::ItemRemoved {
                    container: old_container,
                    value: Value::clone(&old[old_idx]),
                },
            );
            synthetic += 1;
        }
        for (slot, &new_idx) in new_rest.iter().enumerate() {
            if !new_paired[slot] {
                self.push(
                    path.child(Step::Index(synthetic)),
                    Change::ItemAdded {
                        container: new_container,
                        value: Value::clone(&new[new_idx]),
                    },
                );
                synthetic += 1;
            }
        }
    }

    /// Number of records a comparison of `old` and `new` would produce,
    /// ignoring path filters.
    fn distance(&self, old: &Value, new: &Value) -> usize {
        let mut probe = Engine {
            policy: self.policy,
            records: Vec::new(),
            old_open: self.old_open.clone(),
            new_open: self.new_open.clone(),
            filtered: false,
        };
        probe.diff(old, new, &Path::root());
        probe.records.len()
    }
}

/// Removes and returns the first index in `bucket` whose element has the
/// same content as `item`. Fingerprints only nominate candidates.
fn take_equal(
    bucket: &mut VecDeque<usize>,
    item: &Value,
    new: &[Cow<'_, Value>],
) -> Option<usize> {
    let pos = bucket
        .iter()
        .position(|&idx| canonical_cmp(item, &new[idx]) == Ordering::Equal)?;
    bucket.remove(pos)
}

fn same_identity(old: &Value, new: &Value) -> bool {
    match (old, new) {
        (Value::Shared(a), Value::Shared(b)) => a.ptr_eq(b),
        (Value::External(a), Value::External(b)) => a == b,
        _ => false,
    }
}

/// Compares two values under `policy` and returns the records found, in
/// traversal order.
#[must_use]
pub fn diff_values(old: &Value, new: &Value, policy: &EquivalencePolicy) -> Vec<ChangeRecord> {
    Engine::new(policy).run(old, new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, DiffOptions, SharedValue, ValueMap};

    fn run(old: Value, new: Value, options: DiffOptions) -> Vec<ChangeRecord> {
        let policy = EquivalencePolicy::new(&options).unwrap();
        diff_values(&old, &new, &policy)
    }

    fn paths(records: &[ChangeRecord]) -> Vec<String> {
        records.iter().map(|r| r.path.to_string()).collect()
    }

    #[test]
    fn test_identical_values() {
        let value = value!({"a": [1, 2, {"b": null}]});
        assert!(run(value.clone(), value, DiffOptions::new()).is_empty());
    }

    #[test]
    fn test_mapping_order_old_then_new() {
        let records = run(
            value!({"x": 1, "y": 2, "z": 3}),
            value!({"w": 0, "z": 4, "y": 2}),
            DiffOptions::new(),
        );
        assert_eq!(paths(&records), vec!["root['x']", "root['z']", "root['w']"]);
        assert_eq!(records[0].change.bucket(), "dictionary_item_removed");
        assert_eq!(records[1].change.bucket(), "values_changed");
        assert_eq!(records[2].change.bucket(), "dictionary_item_added");
    }

    #[test]
    fn test_ordered_tail() {
        let records = run(value!([1, 2, 3]), value!([1, 4, 3, 5]), DiffOptions::new());
        assert_eq!(paths(&records), vec!["root[1]", "root[3]"]);
        assert_eq!(
            records[1].change,
            Change::ItemAdded {
                container: ContainerKind::Iterable,
                value: value!(5)
            }
        );
    }

    #[test]
    fn test_ignore_order_multiplicity() {
        let records = run(
            value!([1, 1, 2]),
            value!([1, 2, 2]),
            DiffOptions::new().ignore_order(true),
        );
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            ChangeRecord::new(
                Path::parse("root[0]").unwrap(),
                Change::ItemRemoved {
                    container: ContainerKind::Iterable,
                    value: value!(1)
                }
            )
        );
        assert_eq!(
            records[1],
            ChangeRecord::new(
                Path::parse("root[1]").unwrap(),
                Change::ItemAdded {
                    container: ContainerKind::Iterable,
                    value: value!(2)
                }
            )
        );
    }

    #[test]
    fn test_ignore_order_pairs_containers() {
        let records = run(
            value!([{"id": 1, "v": "a"}, {"id": 2, "v": "b"}]),
            value!([{"id": 2, "v": "b"}, {"id": 1, "v": "c"}]),
            DiffOptions::new().ignore_order(true),
        );
        assert_eq!(paths(&records), vec!["root[0]['v']"]);
    }

    #[test]
    fn test_ignore_order_addresses_are_unique() {
        let records = run(
            value!([5, {"a": 1}]),
            value!([6, {"a": 2}]),
            DiffOptions::new().ignore_order(true),
        );
        assert_eq!(paths(&records), vec!["root[0]['a']", "root[1]", "root[2]"]);
        assert_eq!(records[1].change.bucket(), "iterable_item_removed");
        assert_eq!(records[2].change.bucket(), "iterable_item_added");
    }

    #[test]
    fn test_fingerprint_match_needs_equal_content() {
        let new: Vec<Cow<'_, Value>> = vec![Cow::Owned(value!("x")), Cow::Owned(value!(7))];
        let mut bucket: VecDeque<usize> = VecDeque::from(vec![0, 1]);

        assert_eq!(take_equal(&mut bucket, &value!(7), &new), Some(1));
        assert_eq!(bucket, VecDeque::from(vec![0]));
        assert_eq!(take_equal(&mut bucket, &value!(8), &new), None);
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_mixed_set_and_list() {
        let records = run(
            value!([1, 2]),
            Value::set(vec![value!(2), value!(3)]),
            DiffOptions::new(),
        );
        let buckets: Vec<&str> = records.iter().map(|r| r.change.bucket()).collect();
        assert_eq!(buckets, vec!["iterable_item_removed", "set_item_added"]);
        assert_eq!(paths(&records), vec!["root[0]", "root[1]"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let build = |leaf: i64| {
            let node = SharedValue::empty();
            let mut map = ValueMap::new();
            map.insert("leaf", Value::from(leaf));
            map.insert("self", Value::Shared(node.clone()));
            node.set(Value::Object(map)).unwrap();
            Value::Shared(node)
        };
        let records = run(build(1), build(2), DiffOptions::new());
        assert_eq!(paths(&records), vec!["root['leaf']"]);

        assert!(run(build(1), build(1), DiffOptions::new()).is_empty());
    }

    #[test]
    fn test_cycle_against_plain_value() {
        let node = SharedValue::empty();
        node.set(Value::Array(vec![Value::Shared(node.clone())]))
            .unwrap();
        let records = run(Value::Shared(node), value!([[1]]), DiffOptions::new());
        assert_eq!(paths(&records), vec!["root[0]"]);
        assert_eq!(records[0].change.bucket(), "type_changes");
    }

    #[test]
    fn test_same_identity_short_circuits() {
        let shared = Value::shared(value!({"a": 1}));
        assert!(run(shared.clone(), shared, DiffOptions::new()).is_empty());
    }

    #[test]
    fn test_filter_gates_added_items() {
        let records = run(
            value!({"keep": {"x": 1}, "drop": 1}),
            value!({"keep": {"x": 2, "y": 1}, "extra": 1}),
            DiffOptions::new().include_paths(["root['keep']"]),
        );
        assert_eq!(paths(&records), vec!["root['keep']['x']", "root['keep']['y']"]);
    }
}
