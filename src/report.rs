//! The result of a comparison.
//!
//! A [`Report`] is an ordered list of [`ChangeRecord`]s, kept in the order the
//! engine found them, together with the verbosity level that shapes
//! [`Report::to_dict`].
//!
//! ## Buckets
//!
//! `to_dict` groups records by kind, in this fixed order, leaving out empty
//! buckets:
//!
//! | bucket                    | record                          |
//! |---------------------------|---------------------------------|
//! | `values_changed`          | [`Change::ValueChanged`]        |
//! | `type_changes`            | [`Change::TypeChanged`]         |
//! | `dictionary_item_added`   | `ItemAdded` in a mapping        |
//! | `dictionary_item_removed` | `ItemRemoved` from a mapping    |
//! | `iterable_item_added`     | `ItemAdded` in a sequence       |
//! | `iterable_item_removed`   | `ItemRemoved` from a sequence   |
//! | `set_item_added`          | `ItemAdded` in a set            |
//! | `set_item_removed`        | `ItemRemoved` from a set        |
//!
//! ```rust
//! use serde_deepdiff::{value, DeepDiff};
//!
//! let diff = DeepDiff::new(value!({"a": 1, "b": 2}), value!({"a": 3}));
//! let expected = value!({
//!     "values_changed": {"root['a']": {"old_value": 1, "new_value": 3}},
//!     "dictionary_item_removed": ["root['b']"]
//! });
//! assert_eq!(diff.to_dict(), expected);
//! ```

use crate::{Path, TypeTag, Value, ValueMap};
use serde::{Serialize, Serializer};

const BUCKETS: [&str; 8] = [
    "values_changed",
    "type_changes",
    "dictionary_item_added",
    "dictionary_item_removed",
    "iterable_item_added",
    "iterable_item_removed",
    "set_item_added",
    "set_item_removed",
];

/// The container an item was added to or removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Mapping,
    Iterable,
    Set,
}

/// What changed at one address.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    ValueChanged {
        old: Value,
        new: Value,
    },
    TypeChanged {
        old: Value,
        new: Value,
        old_type: TypeTag,
        new_type: TypeTag,
    },
    ItemAdded {
        container: ContainerKind,
        value: Value,
    },
    ItemRemoved {
        container: ContainerKind,
        value: Value,
    },
}

impl Change {
    /// Name of the report bucket this change belongs to.
    #[must_use]
    pub fn bucket(&self) -> &'static str {
        match self {
            Change::ValueChanged { .. } => "values_changed",
            Change::TypeChanged { .. } => "type_changes",
            Change::ItemAdded { container, .. } => match container {
                ContainerKind::Mapping => "dictionary_item_added",
                ContainerKind::Iterable => "iterable_item_added",
                ContainerKind::Set => "set_item_added",
            },
            Change::ItemRemoved { container, .. } => match container {
                ContainerKind::Mapping => "dictionary_item_removed",
                ContainerKind::Iterable => "iterable_item_removed",
                ContainerKind::Set => "set_item_removed",
            },
        }
    }
}

/// One difference and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub path: Path,
    pub change: Change,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(path: Path, change: Change) -> Self {
        ChangeRecord { path, change }
    }

    /// Shape of this record inside its bucket at verbosity 1 and 2.
    fn detail(&self, verbose_level: u8) -> Option<Value> {
        match &self.change {
            Change::ValueChanged { old, new } => {
                let mut entry = ValueMap::with_capacity(2);
                entry.insert("old_value", old.clone());
                entry.insert("new_value", new.clone());
                Some(Value::Object(entry))
            }
            Change::TypeChanged {
                old,
                new,
                old_type,
                new_type,
            } => {
                let mut entry = ValueMap::with_capacity(4);
                entry.insert("old_type", Value::from(old_type.as_str()));
                entry.insert("new_type", Value::from(new_type.as_str()));
                entry.insert("old_value", old.clone());
                entry.insert("new_value", new.clone());
                Some(Value::Object(entry))
            }
            Change::ItemAdded {
                container: ContainerKind::Mapping,
                ..
            }
            | Change::ItemRemoved {
                container: ContainerKind::Mapping,
                ..
            } if verbose_level < 2 => None,
            Change::ItemAdded { value, .. } | Change::ItemRemoved { value, .. } => {
                Some(value.clone())
            }
        }
    }
}

/// All differences found by one comparison.
///
/// A report is falsy when empty: [`Report::is_empty`] is the truthiness test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    records: Vec<ChangeRecord>,
    verbose_level: u8,
}

impl Report {
    #[must_use]
    pub fn new(records: Vec<ChangeRecord>, verbose_level: u8) -> Self {
        Report {
            records,
            verbose_level,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn verbose_level(&self) -> u8 {
        self.verbose_level
    }

    /// Records in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.records.iter()
    }

    /// Records of one bucket, e.g. `"values_changed"`.
    pub fn records_of<'a>(&'a self, bucket: &'a str) -> impl Iterator<Item = &'a ChangeRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.change.bucket() == bucket)
    }

    /// Builds the bucketed form of the report.
    ///
    /// At verbosity 0 every bucket is a list of addresses. At 1, value and
    /// type changes map addresses to old/new details, sequence and set items
    /// map addresses to values and dictionary items stay address lists. At 2,
    /// dictionary items map addresses to values too.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{value, DeepDiff, DiffOptions};
    ///
    /// let options = DiffOptions::new().verbose_level(0);
    /// let diff = DeepDiff::with_options(value!({"a": 1}), value!({"a": 2}), options).unwrap();
    /// assert_eq!(diff.to_dict(), value!({"values_changed": ["root['a']"]}));
    /// ```
    #[must_use]
    pub fn to_dict(&self) -> Value {
        let mut out = ValueMap::new();
        for bucket in BUCKETS {
            let mut records = self.records_of(bucket).peekable();
            if records.peek().is_none() {
                continue;
            }

            let list_form = self.verbose_level == 0
                || (self.verbose_level < 2 && bucket.starts_with("dictionary_item"));
            let entry = if list_form {
                Value::Array(
                    records
                        .map(|record| Value::from(record.path.as_str()))
                        .collect(),
                )
            } else {
                let mut map = ValueMap::new();
                for record in records {
                    if let Some(detail) = record.detail(self.verbose_level) {
                        map.insert(record.path.as_str(), detail);
                    }
                }
                Value::Object(map)
            };
            out.insert(bucket, entry);
        }
        Value::Object(out)
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Serializes as [`Report::to_dict`].
impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_dict().serialize(serializer)
    }
}
