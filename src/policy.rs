//! The validated, immutable rules a comparison runs under.
//!
//! [`EquivalencePolicy`] is built once from [`DiffOptions`] and shared
//! read-only by the whole traversal. Building it is where configuration
//! errors surface; after that, comparison cannot fail.

use crate::canonical::{category, Category};
use crate::{DiffOptions, Error, Number, PathFilter, Result, TypeTag, Value};
use num_bigint::BigInt;

const MAX_SIGNIFICANT_DIGITS: u32 = 17;

/// Validated comparison rules.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{DiffOptions, EquivalencePolicy, TypeTag, Value};
///
/// let policy = EquivalencePolicy::new(&DiffOptions::new().math_epsilon(0.001)).unwrap();
/// assert!(policy.numbers_equal(
///     &Value::from(1.0), &TypeTag::FLOAT,
///     &Value::from(1.0005), &TypeTag::FLOAT,
/// ));
///
/// assert!(EquivalencePolicy::new(&DiffOptions::new().atol(-1.0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalencePolicy {
    ignore_order: bool,
    ignore_numeric_type_changes: bool,
    significant_digits: Option<u32>,
    math_epsilon: Option<f64>,
    atol: Option<f64>,
    rtol: Option<f64>,
    groups: Vec<Vec<TypeTag>>,
    verbose_level: u8,
    filter: PathFilter,
}

impl Default for EquivalencePolicy {
    fn default() -> Self {
        EquivalencePolicy {
            ignore_order: false,
            ignore_numeric_type_changes: false,
            significant_digits: None,
            math_epsilon: None,
            atol: None,
            rtol: None,
            groups: Vec::new(),
            verbose_level: 1,
            filter: PathFilter::default(),
        }
    }
}

impl EquivalencePolicy {
    /// Validates options into a policy.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] for `verbose_level` above 2,
    /// `significant_digits` of 0 or above 17, negative or non-finite
    /// tolerances, empty type groups and path patterns not starting with
    /// `root`.
    pub fn new(options: &DiffOptions) -> Result<Self> {
        if options.verbose_level > 2 {
            return Err(Error::invalid_option(
                "verbose_level",
                format!("expected 0, 1 or 2, got {}", options.verbose_level),
            ));
        }
        if let Some(digits) = options.significant_digits {
            if digits == 0 || digits > MAX_SIGNIFICANT_DIGITS {
                return Err(Error::invalid_option(
                    "significant_digits",
                    format!("expected 1 to {}, got {}", MAX_SIGNIFICANT_DIGITS, digits),
                ));
            }
        }
        check_tolerance("math_epsilon", options.math_epsilon)?;
        check_tolerance("atol", options.atol)?;
        check_tolerance("rtol", options.rtol)?;
        if options.ignore_type_in_groups.iter().any(Vec::is_empty) {
            return Err(Error::invalid_option(
                "ignore_type_in_groups",
                "groups must name at least one type",
            ));
        }

        Ok(EquivalencePolicy {
            ignore_order: options.ignore_order,
            ignore_numeric_type_changes: options.ignore_numeric_type_changes,
            significant_digits: options.significant_digits,
            math_epsilon: options.math_epsilon,
            atol: options.atol,
            rtol: options.rtol,
            groups: options.ignore_type_in_groups.clone(),
            verbose_level: options.verbose_level,
            filter: PathFilter::new(options.include_paths.clone(), options.exclude_paths.clone())?,
        })
    }

    #[must_use]
    pub fn ignore_order(&self) -> bool {
        self.ignore_order
    }

    #[must_use]
    pub fn verbose_level(&self) -> u8 {
        self.verbose_level
    }

    #[must_use]
    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Returns `true` when both tags are the same or share a configured group.
    #[must_use]
    pub fn tags_grouped(&self, a: &TypeTag, b: &TypeTag) -> bool {
        a == b
            || self
                .groups
                .iter()
                .any(|group| group.contains(a) && group.contains(b))
    }

    /// Equality of two resolved scalars under this policy.
    ///
    /// Scalars of different categories are never equal. Outside the number
    /// category, scalars whose tags differ and share no group are never
    /// equal either.
    #[must_use]
    pub fn scalars_equal(&self, a: &Value, a_tag: &TypeTag, b: &Value, b_tag: &TypeTag) -> bool {
        match (category(a), category(b)) {
            (Some(Category::Number), Some(Category::Number)) => {
                self.numbers_equal(a, a_tag, b, b_tag)
            }
            (Some(x), Some(y)) if x == y => self.tags_grouped(a_tag, b_tag) && a == b,
            _ => false,
        }
    }

    /// Numeric equality. Exactly equal numbers are always equal; otherwise
    /// the first configured rule decides: significant digits, then
    /// `math_epsilon`, then `atol`/`rtol`. Without a rule the numbers differ.
    ///
    /// Exact comparison of numbers with different tags (`int` against
    /// `float`) only succeeds with `ignore_numeric_type_changes`, a group
    /// covering both tags, or a configured tolerance. NaN equals NaN.
    #[must_use]
    pub fn numbers_equal(&self, a: &Value, a_tag: &TypeTag, b: &Value, b_tag: &TypeTag) -> bool {
        let tolerant = self.significant_digits.is_some()
            || self.math_epsilon.is_some()
            || self.atol.is_some()
            || self.rtol.is_some();
        if exact_equal(a, b) {
            let cross_type = a_tag != b_tag || variant_differs(a, b);
            return !cross_type
                || tolerant
                || self.ignore_numeric_type_changes
                || self.tags_grouped(a_tag, b_tag);
        }

        let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
            return false;
        };

        if let Some(digits) = self.significant_digits {
            if x == 0.0 || y == 0.0 {
                return (x - y).abs() <= 10f64.powi(-(digits as i32));
            }
            return round_significant(x, digits) == round_significant(y, digits);
        }
        if let Some(epsilon) = self.math_epsilon {
            return (x - y).abs() <= epsilon;
        }
        if self.atol.is_some() || self.rtol.is_some() {
            let atol = self.atol.unwrap_or(0.0);
            let rtol = self.rtol.unwrap_or(0.0);
            return (x - y).abs() <= atol + rtol * y.abs();
        }
        false
    }
}

fn check_tolerance(option: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(Error::invalid_option(option, "must be finite")),
        Some(v) if v < 0.0 => Err(Error::invalid_option(
            option,
            format!("must not be negative, got {}", v),
        )),
        _ => Ok(()),
    }
}

/// Rounds to `digits` significant digits, halves away from zero.
fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor();
    let scale = 10f64.powf(digits as f64 - 1.0 - magnitude);
    (value * scale).round() / scale
}

fn variant_differs(a: &Value, b: &Value) -> bool {
    !matches!(
        (a, b),
        (Value::Number(Number::Integer(_)), Value::Number(Number::Integer(_)))
            | (Value::Number(Number::Float(_)), Value::Number(Number::Float(_)))
            | (
                Value::Number(Number::Integer(_)) | Value::BigInt(_),
                Value::Number(Number::Integer(_)) | Value::BigInt(_)
            )
    )
}

fn exact_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(Number::Integer(x)), Value::Number(Number::Integer(y))) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::Number(Number::Integer(x)), Value::BigInt(y))
        | (Value::BigInt(y), Value::Number(Number::Integer(x))) => &BigInt::from(*x) == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y || (x.is_nan() && y.is_nan()),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(options: DiffOptions) -> EquivalencePolicy {
        EquivalencePolicy::new(&options).unwrap()
    }

    fn floats_equal(policy: &EquivalencePolicy, a: f64, b: f64) -> bool {
        policy.numbers_equal(
            &Value::from(a),
            &TypeTag::FLOAT,
            &Value::from(b),
            &TypeTag::FLOAT,
        )
    }

    #[test]
    fn test_validation() {
        let bad = [
            DiffOptions::new().verbose_level(3),
            DiffOptions::new().significant_digits(0),
            DiffOptions::new().significant_digits(18),
            DiffOptions::new().math_epsilon(f64::NAN),
            DiffOptions::new().rtol(f64::INFINITY),
            DiffOptions::new().atol(-0.1),
            DiffOptions::new().ignore_type_in_groups(vec![Vec::<TypeTag>::new()]),
            DiffOptions::new().include_paths(["foo"]),
        ];
        for options in bad {
            let err = EquivalencePolicy::new(&options).unwrap_err();
            assert!(err.is_config(), "{:?} should be rejected", options);
        }
        assert!(EquivalencePolicy::new(&DiffOptions::new().significant_digits(17)).is_ok());
    }

    #[test]
    fn test_significant_digits() {
        let p = policy(DiffOptions::new().significant_digits(3));
        assert!(floats_equal(&p, 1.1234, 1.1235));
        assert!(!floats_equal(&p, 1.12, 1.13));

        let p = policy(DiffOptions::new().significant_digits(4));
        assert!(floats_equal(&p, 1.2344, 1.2343));
        assert!(floats_equal(&p, 5.67881, 5.67882));
    }

    #[test]
    fn test_significant_digits_with_zero() {
        let p = policy(DiffOptions::new().significant_digits(1));
        assert!(floats_equal(&p, 0.0, 7e-7));
        assert!(!floats_equal(&p, 0.0, 0.2));
    }

    #[test]
    fn test_tolerances() {
        let p = policy(DiffOptions::new().math_epsilon(0.001));
        assert!(floats_equal(&p, 1.0, 1.0005));
        assert!(!floats_equal(&p, 1.0, 1.002));

        let p = policy(DiffOptions::new().atol(0.001));
        assert!(floats_equal(&p, 1.0, 1.0005));

        let p = policy(DiffOptions::new().rtol(1e-3));
        assert!(floats_equal(&p, 1000.0, 1000.1));
        assert!(!floats_equal(&p, 1000.0, 1002.0));
    }

    #[test]
    fn test_int_float_needs_permission() {
        let ten = Value::from(10);
        let ten_f = Value::from(10.0);
        let strict = EquivalencePolicy::default();
        assert!(!strict.numbers_equal(&ten, &TypeTag::INT, &ten_f, &TypeTag::FLOAT));

        let relaxed = policy(DiffOptions::new().ignore_numeric_type_changes(true));
        assert!(relaxed.numbers_equal(&ten, &TypeTag::INT, &ten_f, &TypeTag::FLOAT));

        let grouped = policy(
            DiffOptions::new().ignore_type_in_groups([[TypeTag::INT, TypeTag::FLOAT]]),
        );
        assert!(grouped.numbers_equal(&ten, &TypeTag::INT, &ten_f, &TypeTag::FLOAT));
    }

    #[test]
    fn test_bigint_against_integer() {
        let strict = EquivalencePolicy::default();
        let big = Value::BigInt(BigInt::from(5));
        assert!(strict.numbers_equal(&big, &TypeTag::INT, &Value::from(5), &TypeTag::INT));
    }

    #[test]
    fn test_scalar_categories() {
        let p = EquivalencePolicy::default();
        assert!(p.scalars_equal(&Value::from("a"), &TypeTag::STR, &Value::from("a"), &TypeTag::STR));
        assert!(!p.scalars_equal(&Value::Bool(true), &TypeTag::BOOL, &Value::from(1), &TypeTag::INT));
        assert!(p.tags_grouped(&TypeTag::STR, &TypeTag::STR));
        assert!(!p.tags_grouped(&TypeTag::STR, &TypeTag::BOOL));
    }

    #[test]
    fn test_identical_big_integers_under_tolerance() {
        let huge = Value::BigInt(BigInt::from(10).pow(400));
        for options in [
            DiffOptions::new().atol(0.1),
            DiffOptions::new().math_epsilon(0.1),
            DiffOptions::new().significant_digits(3),
        ] {
            let p = policy(options);
            assert!(p.numbers_equal(&huge, &TypeTag::INT, &huge.clone(), &TypeTag::INT));
        }
    }

    #[test]
    fn test_nan_equals_nan() {
        let strict = EquivalencePolicy::default();
        assert!(floats_equal(&strict, f64::NAN, f64::NAN));
        assert!(!floats_equal(&strict, f64::NAN, 1.0));
        assert!(floats_equal(&policy(DiffOptions::new().atol(0.5)), f64::NAN, f64::NAN));
    }

    #[test]
    fn test_tagged_scalars_need_matching_tags() {
        let p = EquivalencePolicy::default();
        let my_str = TypeTag::new("MyStr");
        let a = Value::from("a");
        assert!(!p.scalars_equal(&a, &my_str, &a, &TypeTag::STR));

        let grouped = policy(DiffOptions::new().ignore_type_in_groups([[my_str.clone(), TypeTag::STR]]));
        assert!(grouped.scalars_equal(&a, &my_str, &a, &TypeTag::STR));
    }
}
