//! Error types for building values and configuring comparisons.
//!
//! Comparisons themselves never fail: cycles, adapter failures and
//! incomparable types all degrade to change records. Errors only come from two
//! places:
//!
//! - **Configuration**: an unknown option name or a nonsensical option value,
//!   detected when the [`EquivalencePolicy`](crate::EquivalencePolicy) is
//!   built, before any traversal starts.
//! - **Conversion**: a `T: Serialize` that cannot be represented as a
//!   [`Value`](crate::Value).
//!
//! ## Examples
//!
//! ```rust
//! use serde_deepdiff::{value, DeepDiff, Error};
//!
//! let config = value!({ "wrong_param": true });
//! let result = DeepDiff::from_config(value!(1), value!(2), &config);
//!
//! assert!(matches!(result, Err(Error::UnknownOption(_))));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A configuration key that is not one of the supported options.
    #[error("Unsupported option: {0}")]
    UnknownOption(String),

    /// A supported option with a value that cannot be used.
    #[error("Invalid value for option `{option}`: {reason}")]
    InvalidOption { option: String, reason: String },

    /// Unsupported type for conversion into a `Value`
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an unknown-option error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::Error;
    ///
    /// let err = Error::unknown_option("wrong_param");
    /// assert_eq!(err.to_string(), "Unsupported option: wrong_param");
    /// ```
    pub fn unknown_option(name: &str) -> Self {
        Error::UnknownOption(name.to_string())
    }

    /// Creates an invalid-option error naming the offending option.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::Error;
    ///
    /// let err = Error::invalid_option("atol", "must not be negative");
    /// assert!(err.to_string().contains("`atol`"));
    /// ```
    pub fn invalid_option<T: fmt::Display>(option: &str, reason: T) -> Self {
        Error::InvalidOption {
            option: option.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unsupported type error for types that cannot become a `Value`.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` for errors raised while validating configuration.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Error::UnknownOption(_) | Error::InvalidOption { .. })
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_classification() {
        assert!(Error::unknown_option("x").is_config());
        assert!(Error::invalid_option("rtol", "negative").is_config());
        assert!(!Error::custom("boom").is_config());
        assert!(!Error::unsupported_type("f128").is_config());
    }

    #[test]
    fn test_invalid_option_message() {
        let err = Error::invalid_option("verbose_level", "expected 0, 1 or 2, got 7");
        assert_eq!(
            err.to_string(),
            "Invalid value for option `verbose_level`: expected 0, 1 or 2, got 7"
        );
    }
}
