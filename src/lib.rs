//! # serde_deepdiff
//!
//! Deep structural comparison of arbitrary nested values.
//!
//! Given two values (mappings, sequences, sets, scalars, and objects exposed
//! through adapters), `serde_deepdiff` reports every difference between them
//! at an exact address such as `root['users'][0]['name']`, and renders the
//! result either as a bucketed report or as a readable tree.
//!
//! ## Key Features
//!
//! - **Serde Compatible**: compare any `T: Serialize` directly
//! - **Addressable**: every change carries the path of the node it concerns
//! - **Order-Insensitive Mode**: compare sequences as multisets with
//!   `ignore_order`
//! - **Numeric Tolerances**: significant digits, `math_epsilon`, `atol` and
//!   `rtol`
//! - **Type Groups**: treat chosen types as interchangeable
//! - **Cycle Safe**: self-referential data terminates
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use serde_deepdiff::{diff, value};
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let old = User { id: 1, name: "Alice".into(), tags: vec!["admin".into()] };
//! let new = User { id: 1, name: "Alicia".into(), tags: vec!["admin".into(), "ops".into()] };
//!
//! let result = diff(&old, &new).unwrap();
//! assert_eq!(
//!     result.to_dict(),
//!     value!({
//!         "values_changed": {"root['name']": {"old_value": "Alice", "new_value": "Alicia"}},
//!         "iterable_item_added": {"root['tags'][1]": "ops"}
//!     })
//! );
//! ```
//!
//! ### Options
//!
//! ```rust
//! use serde_deepdiff::{value, DeepDiff, DiffOptions};
//!
//! let options = DiffOptions::new()
//!     .ignore_order(true)
//!     .exclude_paths(["root['meta']"]);
//!
//! let diff = DeepDiff::with_options(
//!     value!({"items": [1, 2, 3], "meta": {"at": 1}}),
//!     value!({"items": [3, 1, 2], "meta": {"at": 2}}),
//!     options,
//! ).unwrap();
//! assert!(diff.is_empty());
//! ```
//!
//! ### Pretty Output
//!
//! ```rust
//! use serde_deepdiff::{value, DeepDiff, PrettyOptions};
//!
//! let diff = DeepDiff::new(value!({"a": {"b": 1}}), value!({"a": {"b": 2}}));
//! let text = diff.pretty(PrettyOptions::new().no_color(true));
//! assert_eq!(text, "a\n╰── b\n    - 1\n    + 2");
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events (`debug` per comparison, `trace` for
//! order-insensitive pairing, `warn` for failing adapters). No subscriber is
//! installed by the library.
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Comparing two serde structs
//! - **`ignore_order.rs`** - Multiset comparison of sequences
//! - **`tolerances.rs`** - Numeric tolerances and type groups
//! - **`pretty_report.rs`** - The tree renderer and its layouts
//!
//! Run any demo with: `cargo run --example <name>`

pub mod adapter;
pub mod canonical;
pub mod engine;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod policy;
pub mod pretty;
pub mod report;
pub mod ser;
pub mod value;

pub use adapter::{Adapter, External, Model};
pub use error::{Error, Result};
pub use map::{Key, ValueMap};
pub use options::{DiffOptions, PrettyOptions};
pub use path::{Path, PathFilter, Step};
pub use policy::EquivalencePolicy;
pub use report::{Change, ChangeRecord, ContainerKind, Report};
pub use ser::ValueSerializer;
pub use value::{Number, SharedValue, TypeTag, Value};

use serde::Serialize;
use tracing::debug;

/// Convert any `T: Serialize` to a `Value`.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// let value: Value = to_value(&point).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented, e.g. a map whose
/// keys are themselves collections.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Compare two serializable values with default options.
///
/// # Errors
///
/// Returns an error if either value cannot be converted into a `Value`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn diff<T, U>(old: &T, new: &U) -> Result<DeepDiff>
where
    T: ?Sized + Serialize,
    U: ?Sized + Serialize,
{
    diff_with_options(old, new, DiffOptions::default())
}

/// Compare two serializable values with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{diff_with_options, DiffOptions};
///
/// let result = diff_with_options(&vec![1.0, 2.0], &vec![1.0004, 2.0], DiffOptions::new().atol(0.001)).unwrap();
/// assert!(result.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if either value cannot be converted, or if the options
/// are invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn diff_with_options<T, U>(old: &T, new: &U, options: DiffOptions) -> Result<DeepDiff>
where
    T: ?Sized + Serialize,
    U: ?Sized + Serialize,
{
    DeepDiff::with_options(to_value(old)?, to_value(new)?, options)
}

/// A finished comparison: both inputs and the report describing how they
/// differ.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{value, DeepDiff};
///
/// let diff = DeepDiff::new(value!([1, 2, 3]), value!([1, 4, 3, 5]));
/// assert_eq!(
///     diff.to_dict(),
///     value!({
///         "values_changed": {"root[1]": {"old_value": 2, "new_value": 4}},
///         "iterable_item_added": {"root[3]": 5}
///     })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct DeepDiff {
    old: Value,
    new: Value,
    report: Report,
}

impl DeepDiff {
    /// Compares with default options. Default options are always valid.
    pub fn new(old: impl Into<Value>, new: impl Into<Value>) -> Self {
        Self::with_policy(old, new, &EquivalencePolicy::default())
    }

    /// Compares with custom options.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before comparing anything if the options
    /// are invalid.
    pub fn with_options(
        old: impl Into<Value>,
        new: impl Into<Value>,
        options: DiffOptions,
    ) -> Result<Self> {
        let policy = EquivalencePolicy::new(&options)?;
        Ok(Self::with_policy(old, new, &policy))
    }

    /// Compares with options read from a string-keyed mapping.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownOption`] for unrecognized keys, [`Error::InvalidOption`]
    /// for unusable values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{value, DeepDiff};
    ///
    /// let config = value!({"significant_digits": 3});
    /// let diff = DeepDiff::from_config(value!(1.1234), value!(1.1235), &config).unwrap();
    /// assert!(diff.is_empty());
    /// ```
    pub fn from_config(
        old: impl Into<Value>,
        new: impl Into<Value>,
        config: &Value,
    ) -> Result<Self> {
        Self::with_options(old, new, DiffOptions::from_value(config)?)
    }

    /// Compares under an already validated policy. A policy can be shared by
    /// any number of comparisons, across threads.
    pub fn with_policy(
        old: impl Into<Value>,
        new: impl Into<Value>,
        policy: &EquivalencePolicy,
    ) -> Self {
        let (old, new) = (old.into(), new.into());
        let records = engine::diff_values(&old, &new, policy);
        debug!(changes = records.len(), "comparison finished");
        DeepDiff {
            report: Report::new(records, policy.verbose_level()),
            old,
            new,
        }
    }

    /// The bucketed report, see [`Report::to_dict`].
    #[must_use]
    pub fn to_dict(&self) -> Value {
        self.report.to_dict()
    }

    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Returns `true` when the two values are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.report.is_empty()
    }

    #[must_use]
    pub fn old(&self) -> &Value {
        &self.old
    }

    #[must_use]
    pub fn new_value(&self) -> &Value {
        &self.new
    }

    /// Renders the differences as text, see [`pretty::render`].
    #[must_use]
    pub fn pretty(&self, options: PrettyOptions) -> String {
        pretty::render(&self.report, &self.old, &self.new, &options)
    }
}

impl Serialize for DeepDiff {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.report.serialize(serializer)
    }
}
