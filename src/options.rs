//! Configuration options for comparisons and pretty output.
//!
//! - [`DiffOptions`]: what counts as a difference and how the report looks
//! - [`PrettyOptions`]: how [`DeepDiff::pretty`](crate::DeepDiff::pretty)
//!   draws the tree
//!
//! Options are plain builders; nothing is checked until they are turned into
//! an [`EquivalencePolicy`](crate::EquivalencePolicy), which happens before
//! any traversal starts.
//!
//! ## Examples
//!
//! ```rust
//! use serde_deepdiff::{value, DeepDiff, DiffOptions};
//!
//! let options = DiffOptions::new()
//!     .ignore_order(true)
//!     .significant_digits(3);
//!
//! let diff = DeepDiff::with_options(value!([1.0001, 2]), value!([2, 1.0002]), options).unwrap();
//! assert!(diff.is_empty());
//! ```

use crate::{Error, Key, Result, TypeTag, Value};

/// Options controlling what a comparison reports.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::DiffOptions;
///
/// let options = DiffOptions::new()
///     .atol(0.01)
///     .exclude_paths(["root['updated_at']"])
///     .verbose_level(2);
///
/// assert_eq!(options.atol, Some(0.01));
/// assert_eq!(options.verbose_level, 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DiffOptions {
    /// Compare sequences as multisets.
    pub ignore_order: bool,
    /// Treat `int` and `float` (and adapter numeric tags) as interchangeable.
    pub ignore_numeric_type_changes: bool,
    pub significant_digits: Option<u32>,
    pub math_epsilon: Option<f64>,
    pub atol: Option<f64>,
    pub rtol: Option<f64>,
    /// Groups of type tags whose members are reported as value changes, not
    /// type changes.
    pub ignore_type_in_groups: Vec<Vec<TypeTag>>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    /// 0: paths only, 1: default, 2: values for dictionary additions/removals.
    pub verbose_level: u8,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            ignore_order: false,
            ignore_numeric_type_changes: false,
            significant_digits: None,
            math_epsilon: None,
            atol: None,
            rtol: None,
            ignore_type_in_groups: Vec::new(),
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            verbose_level: 1,
        }
    }
}

impl DiffOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ignore_order(mut self, value: bool) -> Self {
        self.ignore_order = value;
        self
    }

    #[must_use]
    pub fn ignore_numeric_type_changes(mut self, value: bool) -> Self {
        self.ignore_numeric_type_changes = value;
        self
    }

    /// Compares numbers after rounding to this many significant digits.
    ///
    /// Accepts a count or `None` to turn rounding off.
    #[must_use]
    pub fn significant_digits(mut self, value: impl Into<Option<u32>>) -> Self {
        self.significant_digits = value.into();
        self
    }

    #[must_use]
    pub fn math_epsilon(mut self, value: impl Into<Option<f64>>) -> Self {
        self.math_epsilon = value.into();
        self
    }

    #[must_use]
    pub fn atol(mut self, value: impl Into<Option<f64>>) -> Self {
        self.atol = value.into();
        self
    }

    #[must_use]
    pub fn rtol(mut self, value: impl Into<Option<f64>>) -> Self {
        self.rtol = value.into();
        self
    }

    /// Sets the type-equivalence groups.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{DiffOptions, TypeTag};
    ///
    /// let options = DiffOptions::new().ignore_type_in_groups([[TypeTag::BOOL, TypeTag::STR]]);
    /// assert_eq!(options.ignore_type_in_groups, vec![vec![TypeTag::BOOL, TypeTag::STR]]);
    /// ```
    #[must_use]
    pub fn ignore_type_in_groups<G, T>(mut self, groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = T>,
        T: Into<TypeTag>,
    {
        self.ignore_type_in_groups = groups
            .into_iter()
            .map(|group| group.into_iter().map(Into::into).collect())
            .collect();
        self
    }

    #[must_use]
    pub fn include_paths<S: Into<String>>(mut self, paths: impl IntoIterator<Item = S>) -> Self {
        self.include_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn exclude_paths<S: Into<String>>(mut self, paths: impl IntoIterator<Item = S>) -> Self {
        self.exclude_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn verbose_level(mut self, value: u8) -> Self {
        self.verbose_level = value;
        self
    }

    /// Reads options from a string-keyed mapping.
    ///
    /// Recognized keys are the field names of [`DiffOptions`]. `null` leaves
    /// an optional setting off; path options take a string or a list of
    /// strings; `ignore_type_in_groups` takes a list of lists of type names
    /// (a flat list counts as a single group).
    ///
    /// # Errors
    ///
    /// [`Error::UnknownOption`] for an unrecognized key,
    /// [`Error::InvalidOption`] for a value of the wrong shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{value, DiffOptions, Error};
    ///
    /// let options = DiffOptions::from_value(&value!({
    ///     "ignore_order": true,
    ///     "exclude_paths": "root['id']"
    /// })).unwrap();
    /// assert!(options.ignore_order);
    /// assert_eq!(options.exclude_paths, vec!["root['id']".to_string()]);
    ///
    /// let err = DiffOptions::from_value(&value!({"colour": true})).unwrap_err();
    /// assert_eq!(err, Error::unknown_option("colour"));
    /// ```
    pub fn from_value(config: &Value) -> Result<Self> {
        let Some(map) = config.resolve().as_object() else {
            return Err(Error::invalid_option(
                "config",
                format!("expected a mapping of option names, found {}", config),
            ));
        };

        let mut options = DiffOptions::default();
        for (key, value) in map {
            let name = match key {
                Key::Str(name) | Key::Attr(name) => name.as_str(),
                Key::Int(i) => return Err(Error::unknown_option(&i.to_string())),
            };
            let value = value.resolve();
            match name {
                "ignore_order" => options.ignore_order = expect_bool(name, value)?,
                "ignore_numeric_type_changes" => {
                    options.ignore_numeric_type_changes = expect_bool(name, value)?;
                }
                "verbose_level" => {
                    options.verbose_level = u8::try_from(expect_int(name, value)?)
                        .map_err(|_| Error::invalid_option(name, "expected 0, 1 or 2"))?;
                }
                "significant_digits" => {
                    options.significant_digits = match value {
                        Value::Null => None,
                        other => Some(u32::try_from(expect_int(name, other)?).map_err(|_| {
                            Error::invalid_option(name, "must be a positive integer")
                        })?),
                    };
                }
                "math_epsilon" => options.math_epsilon = expect_float(name, value)?,
                "atol" => options.atol = expect_float(name, value)?,
                "rtol" => options.rtol = expect_float(name, value)?,
                "ignore_type_in_groups" => {
                    options.ignore_type_in_groups = expect_groups(name, value)?;
                }
                "include_paths" => options.include_paths = expect_strings(name, value)?,
                "exclude_paths" => options.exclude_paths = expect_strings(name, value)?,
                other => return Err(Error::unknown_option(other)),
            }
        }
        Ok(options)
    }
}

fn expect_bool(name: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::invalid_option(name, format!("expected a boolean, found {}", value)))
}

fn expect_int(name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) if n.is_integer() => n
            .as_i64()
            .ok_or_else(|| Error::invalid_option(name, "integer out of range")),
        _ => Err(Error::invalid_option(
            name,
            format!("expected an integer, found {}", value),
        )),
    }
}

fn expect_float(name: &str, value: &Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        other => other.as_f64().map(Some).ok_or_else(|| {
            Error::invalid_option(name, format!("expected a number, found {}", other))
        }),
    }
}

fn expect_string(name: &str, value: &Value) -> Result<String> {
    value
        .resolve()
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_option(name, format!("expected a string, found {}", value)))
}

fn expect_strings(name: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) | Value::Set(items) => {
            items.iter().map(|item| expect_string(name, item)).collect()
        }
        other => Err(Error::invalid_option(
            name,
            format!("expected a string or a list of strings, found {}", other),
        )),
    }
}

fn expect_groups(name: &str, value: &Value) -> Result<Vec<Vec<TypeTag>>> {
    let Some(items) = value.as_array() else {
        return Err(Error::invalid_option(
            name,
            format!("expected a list of type-name lists, found {}", value),
        ));
    };
    if items.iter().all(|item| item.resolve().is_string()) && !items.is_empty() {
        let group = expect_strings(name, value)?;
        return Ok(vec![group.into_iter().map(TypeTag::from).collect()]);
    }
    items
        .iter()
        .map(|group| {
            expect_strings(name, group.resolve())
                .map(|names| names.into_iter().map(TypeTag::from).collect())
        })
        .collect()
}

/// Options controlling pretty output.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::PrettyOptions;
///
/// let options = PrettyOptions::new().no_color(true).context(1);
/// assert_eq!(options.max_depth, 5);
/// assert_eq!(options.context, 1);
///
/// let header = PrettyOptions { path_header: true, ..PrettyOptions::default() };
/// assert!(!header.compact);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Collapse chains of single-child nodes into one label.
    pub compact: bool,
    /// Deeper subtrees are replaced by `...`.
    pub max_depth: usize,
    /// Unchanged sequence neighbours shown around each change.
    pub context: usize,
    pub no_color: bool,
    /// One path header per change instead of a tree.
    pub path_header: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        PrettyOptions {
            compact: false,
            max_depth: 5,
            context: 0,
            no_color: false,
            path_header: false,
        }
    }
}

impl PrettyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compact(mut self, value: bool) -> Self {
        self.compact = value;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    #[must_use]
    pub fn context(mut self, value: usize) -> Self {
        self.context = value;
        self
    }

    #[must_use]
    pub fn no_color(mut self, value: bool) -> Self {
        self.no_color = value;
        self
    }

    #[must_use]
    pub fn path_header(mut self, value: bool) -> Self {
        self.path_header = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_defaults() {
        let options = DiffOptions::default();
        assert_eq!(options.verbose_level, 1);
        assert!(!options.ignore_order);
        assert!(options.significant_digits.is_none());
    }

    #[test]
    fn test_from_value_full() {
        let config = value!({
            "ignore_order": true,
            "verbose_level": 2,
            "significant_digits": 3,
            "math_epsilon": null,
            "atol": 0.5,
            "rtol": 1,
            "ignore_numeric_type_changes": false,
            "ignore_type_in_groups": [["bool", "str"], ["int", "float"]],
            "include_paths": ["root['a']", "root['b']"],
            "exclude_paths": []
        });
        let options = DiffOptions::from_value(&config).unwrap();
        assert_eq!(options.verbose_level, 2);
        assert_eq!(options.significant_digits, Some(3));
        assert_eq!(options.atol, Some(0.5));
        assert_eq!(options.rtol, Some(1.0));
        assert_eq!(options.ignore_type_in_groups.len(), 2);
        assert_eq!(options.ignore_type_in_groups[0][1], TypeTag::STR);
        assert_eq!(options.include_paths.len(), 2);
    }

    #[test]
    fn test_flat_group_is_single_group() {
        let config = value!({"ignore_type_in_groups": ["bool", "str"]});
        let options = DiffOptions::from_value(&config).unwrap();
        assert_eq!(
            options.ignore_type_in_groups,
            vec![vec![TypeTag::BOOL, TypeTag::STR]]
        );
    }

    #[test]
    fn test_from_value_wrong_types() {
        let err = DiffOptions::from_value(&value!({"ignore_order": "yes"})).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));

        let err = DiffOptions::from_value(&value!({"verbose_level": 300})).unwrap_err();
        assert!(err.is_config());

        let err = DiffOptions::from_value(&value!([1, 2])).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_pretty_builder() {
        let options = PrettyOptions::new().compact(true).max_depth(2).path_header(true);
        assert!(options.compact && options.path_header);
        assert_eq!(options.max_depth, 2);
        assert!(!options.no_color);
    }
}
