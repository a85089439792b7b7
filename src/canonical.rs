//! Canonical view of values.
//!
//! The engine never matches on raw [`Value`] variants. It first reduces each
//! side to one of four comparison shapes, plus a marker for re-encountered
//! shared nodes:
//!
//! - [`Node::Scalar`]: a leaf value with its runtime type tag
//! - [`Node::Mapping`]: key/value pairs (objects, table columns)
//! - [`Node::OrderedSequence`]: position matters (arrays)
//! - [`Node::UnorderedCollection`]: position does not matter (sets)
//! - [`Node::Visited`]: a shared node already open further up the branch
//!
//! Wrappers are peeled in one pass: shared nodes, adapter-backed values and
//! explicit tags. The outermost tag wins, so an adapter's declared type name
//! survives whatever shape its dump produced.
//!
//! The module also provides the content [`fingerprint`] used to cancel equal
//! elements in order-insensitive comparison, and [`canonical_cmp`], the total
//! order used to line up two sets.

use crate::{Key, Number, TypeTag, Value};
use rustc_hash::FxHasher;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

static NULL: Value = Value::Null;

/// A value reduced to its comparison shape.
#[derive(Debug, Clone)]
pub enum Node<'a> {
    Scalar {
        value: &'a Value,
        tag: TypeTag,
    },
    Mapping {
        tag: TypeTag,
        entries: Vec<(Cow<'a, Key>, Cow<'a, Value>)>,
    },
    OrderedSequence {
        tag: TypeTag,
        items: Vec<Cow<'a, Value>>,
    },
    UnorderedCollection {
        tag: TypeTag,
        items: Vec<Cow<'a, Value>>,
    },
    /// Re-encounter of the shared node open at this ancestor depth.
    Visited(usize),
}

/// The shape of a [`Node`] without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    Scalar,
    Mapping,
    OrderedSequence,
    UnorderedCollection,
    Visited,
}

/// Comparison category of a scalar. Scalars of different categories are never
/// equal; numbers of any tag share one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Null,
    Bool,
    Number,
    String,
    Bytes,
    Date,
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar { .. } => NodeKind::Scalar,
            Node::Mapping { .. } => NodeKind::Mapping,
            Node::OrderedSequence { .. } => NodeKind::OrderedSequence,
            Node::UnorderedCollection { .. } => NodeKind::UnorderedCollection,
            Node::Visited(_) => NodeKind::Visited,
        }
    }

    /// The runtime type tag. Visited markers have none.
    #[must_use]
    pub fn tag(&self) -> Option<&TypeTag> {
        match self {
            Node::Scalar { tag, .. }
            | Node::Mapping { tag, .. }
            | Node::OrderedSequence { tag, .. }
            | Node::UnorderedCollection { tag, .. } => Some(tag),
            Node::Visited(_) => None,
        }
    }

    /// Tag text used in reports; visited markers report as `cycle`.
    #[must_use]
    pub fn type_name(&self) -> TypeTag {
        self.tag().cloned().unwrap_or_else(|| TypeTag::new("cycle"))
    }
}

/// A canonical node together with the shared-node identities crossed while
/// reaching it. Callers push those identities while they descend into the
/// node's children and pop them afterwards.
#[derive(Debug, Clone)]
pub struct Canonical<'a> {
    pub node: Node<'a>,
    pub identities: Vec<usize>,
}

/// Reduces a value to its canonical node.
///
/// `ancestors` are the identities of the shared nodes currently open on this
/// branch, outermost first. Meeting one of them again yields
/// [`Node::Visited`] with its position in the stack.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::canonical::{canonicalize, NodeKind};
/// use serde_deepdiff::{value, Value};
///
/// let set = Value::set(vec![value!(1)]);
/// assert_eq!(canonicalize(&set, &[]).node.kind(), NodeKind::UnorderedCollection);
/// assert_eq!(canonicalize(&value!({"a": 1}), &[]).node.kind(), NodeKind::Mapping);
/// ```
#[must_use]
pub fn canonicalize<'a>(value: &'a Value, ancestors: &[usize]) -> Canonical<'a> {
    let mut current = value;
    let mut declared: Option<TypeTag> = None;
    let mut identities: Vec<usize> = Vec::new();

    loop {
        match current {
            Value::Shared(shared) => {
                let id = shared.id();
                if let Some(depth) = ancestors
                    .iter()
                    .chain(identities.iter())
                    .position(|&open| open == id)
                {
                    return Canonical {
                        node: Node::Visited(depth),
                        identities,
                    };
                }
                identities.push(id);
                current = shared.get().unwrap_or(&NULL);
            }
            Value::External(external) => current = external.resolve(),
            Value::Tagged { tag, value } => {
                if declared.is_none() {
                    declared = Some(tag.clone());
                }
                current = &**value;
            }
            _ => break,
        }
    }

    let node = match current {
        Value::Set(items) => Node::UnorderedCollection {
            tag: declared.unwrap_or(TypeTag::SET),
            items: items.iter().map(Cow::Borrowed).collect(),
        },
        Value::Object(map) => Node::Mapping {
            tag: declared.unwrap_or(TypeTag::DICT),
            entries: map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k), Cow::Borrowed(v)))
                .collect(),
        },
        Value::Array(items) => Node::OrderedSequence {
            tag: declared.unwrap_or(TypeTag::LIST),
            items: items.iter().map(Cow::Borrowed).collect(),
        },
        Value::Table { .. } => Node::Mapping {
            tag: declared.unwrap_or(TypeTag::TABLE),
            entries: current
                .columns()
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (Cow::Owned(k), Cow::Owned(v)))
                .collect(),
        },
        scalar => Node::Scalar {
            value: scalar,
            tag: declared.unwrap_or_else(|| scalar_tag(scalar)),
        },
    };

    Canonical { node, identities }
}

/// The default runtime type tag of a scalar.
#[must_use]
pub fn scalar_tag(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::NONE,
        Value::Bool(_) => TypeTag::BOOL,
        Value::Number(Number::Integer(_)) | Value::BigInt(_) => TypeTag::INT,
        Value::Number(Number::Float(_)) => TypeTag::FLOAT,
        Value::String(_) => TypeTag::STR,
        Value::Bytes(_) => TypeTag::BYTES,
        Value::Date(_) => TypeTag::DATETIME,
        Value::Array(_) => TypeTag::LIST,
        Value::Set(_) => TypeTag::SET,
        Value::Object(_) => TypeTag::DICT,
        Value::Table { .. } => TypeTag::TABLE,
        Value::Tagged { tag, .. } => tag.clone(),
        Value::Shared(_) | Value::External(_) => match value.resolve() {
            Value::Shared(_) | Value::External(_) => TypeTag::NONE,
            resolved => scalar_tag(resolved),
        },
    }
}

/// The comparison category of a resolved scalar.
#[must_use]
pub fn category(value: &Value) -> Option<Category> {
    match value {
        Value::Null => Some(Category::Null),
        Value::Bool(_) => Some(Category::Bool),
        Value::Number(_) | Value::BigInt(_) => Some(Category::Number),
        Value::String(_) => Some(Category::String),
        Value::Bytes(_) => Some(Category::Bytes),
        Value::Date(_) => Some(Category::Date),
        _ => None,
    }
}

/// A deterministic content hash.
///
/// Equal values (same tags, same content) always share a fingerprint; mapping
/// and set fingerprints do not depend on element order. `-0.0` and `0.0`
/// hash alike, as do all NaNs.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::canonical::fingerprint;
/// use serde_deepdiff::{value, Value};
///
/// assert_eq!(fingerprint(&value!({"a": 1, "b": 2})), fingerprint(&value!({"b": 2, "a": 1})));
/// assert_ne!(fingerprint(&value!(1)), fingerprint(&value!(1.0)));
/// ```
#[must_use]
pub fn fingerprint(value: &Value) -> u64 {
    let mut hasher = FxHasher::default();
    hash_value(value, &mut Vec::new(), &mut hasher);
    hasher.finish()
}

fn sub_fingerprint(value: &Value, ancestors: &mut Vec<usize>) -> u64 {
    let mut hasher = FxHasher::default();
    hash_value(value, ancestors, &mut hasher);
    hasher.finish()
}

fn hash_value(value: &Value, ancestors: &mut Vec<usize>, state: &mut FxHasher) {
    let canonical = canonicalize(value, ancestors);
    let depth = ancestors.len();
    ancestors.extend_from_slice(&canonical.identities);

    match &canonical.node {
        Node::Scalar { value, tag } => {
            0u8.hash(state);
            tag.hash(state);
            hash_scalar(value, state);
        }
        Node::Mapping { tag, entries } => {
            1u8.hash(state);
            tag.hash(state);
            entries.len().hash(state);
            let mut combined = 0u64;
            for (key, child) in entries {
                let mut entry = FxHasher::default();
                key.hash(&mut entry);
                sub_fingerprint(child, ancestors).hash(&mut entry);
                combined = combined.wrapping_add(entry.finish());
            }
            combined.hash(state);
        }
        Node::OrderedSequence { tag, items } => {
            2u8.hash(state);
            tag.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, ancestors, state);
            }
        }
        Node::UnorderedCollection { tag, items } => {
            3u8.hash(state);
            tag.hash(state);
            items.len().hash(state);
            let combined = items.iter().fold(0u64, |acc, item| {
                acc.wrapping_add(sub_fingerprint(item, ancestors))
            });
            combined.hash(state);
        }
        Node::Visited(at) => {
            4u8.hash(state);
            at.hash(state);
        }
    }

    ancestors.truncate(depth);
}

fn hash_scalar(value: &Value, state: &mut FxHasher) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => (1u8, b).hash(state),
        Value::Number(Number::Integer(i)) => (2u8, i).hash(state),
        Value::Number(Number::Float(f)) => (3u8, float_bits(*f)).hash(state),
        Value::BigInt(bi) => (4u8, bi).hash(state),
        Value::String(s) => (5u8, s).hash(state),
        Value::Bytes(bytes) => (6u8, bytes).hash(state),
        Value::Date(dt) => (7u8, dt).hash(state),
        _ => 8u8.hash(state),
    }
}

fn float_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

/// A total order over values: type tag first, then content.
///
/// Used to line up two sets before comparing them position by position.
/// Cyclic references compare by the depth they point back to.
#[must_use]
pub fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
    cmp_values(a, b, &mut Vec::new(), &mut Vec::new())
}

fn cmp_values(a: &Value, b: &Value, left: &mut Vec<usize>, right: &mut Vec<usize>) -> Ordering {
    let ca = canonicalize(a, left);
    let cb = canonicalize(b, right);

    let head = ca
        .node
        .tag()
        .cmp(&cb.node.tag())
        .then_with(|| ca.node.kind().cmp(&cb.node.kind()));
    if head != Ordering::Equal {
        return head;
    }

    let (left_depth, right_depth) = (left.len(), right.len());
    left.extend_from_slice(&ca.identities);
    right.extend_from_slice(&cb.identities);

    let ordering = match (&ca.node, &cb.node) {
        (Node::Scalar { value: x, .. }, Node::Scalar { value: y, .. }) => cmp_scalars(x, y),
        (Node::Mapping { entries: x, .. }, Node::Mapping { entries: y, .. }) => {
            let mut xs: Vec<_> = x.iter().collect();
            let mut ys: Vec<_> = y.iter().collect();
            xs.sort_by(|p, q| p.0.cmp(&q.0));
            ys.sort_by(|p, q| p.0.cmp(&q.0));
            xs.iter()
                .zip(ys.iter())
                .map(|((kx, vx), (ky, vy))| {
                    kx.cmp(ky).then_with(|| cmp_values(vx, vy, left, right))
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| xs.len().cmp(&ys.len()))
        }
        (Node::OrderedSequence { items: x, .. }, Node::OrderedSequence { items: y, .. }) => {
            cmp_items(x, y, left, right)
        }
        (
            Node::UnorderedCollection { items: x, .. },
            Node::UnorderedCollection { items: y, .. },
        ) => {
            let x = sorted_items(x, left);
            let y = sorted_items(y, right);
            cmp_items(&x, &y, left, right)
        }
        (Node::Visited(x), Node::Visited(y)) => x.cmp(y),
        _ => Ordering::Equal,
    };

    left.truncate(left_depth);
    right.truncate(right_depth);
    ordering
}

fn cmp_items(
    x: &[Cow<'_, Value>],
    y: &[Cow<'_, Value>],
    left: &mut Vec<usize>,
    right: &mut Vec<usize>,
) -> Ordering {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| cmp_values(a, b, left, right))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or_else(|| x.len().cmp(&y.len()))
}

fn sorted_items<'v>(items: &'v [Cow<'_, Value>], ancestors: &[usize]) -> Vec<Cow<'v, Value>> {
    let mut sorted: Vec<Cow<'v, Value>> = items.iter().map(|item| Cow::Borrowed(&**item)).collect();
    sorted.sort_by(|a, b| cmp_values(a, b, &mut ancestors.to_vec(), &mut ancestors.to_vec()));
    sorted
}

fn cmp_scalars(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(Number::Integer(x)), Value::Number(Number::Integer(y))) => x.cmp(y),
        (Value::BigInt(x), Value::BigInt(y)) => x.cmp(y),
        (x, y) if x.is_number() && y.is_number() => {
            let fx = f64::from_bits(float_bits(x.as_f64().unwrap_or(f64::NAN)));
            let fy = f64::from_bits(float_bits(y.as_f64().unwrap_or(f64::NAN)));
            fx.total_cmp(&fy)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bytes(x), Value::Bytes(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        _ => category(a).cmp(&category(b)),
    }
}
