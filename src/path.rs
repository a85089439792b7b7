//! Addresses of nodes inside a compared value.
//!
//! A [`Path`] is an immutable list of [`Step`]s starting at `root`. Its string
//! form is what reports use as bucket keys:
//!
//! | step                 | rendered  |
//! |----------------------|-----------|
//! | string key `a`       | `['a']`   |
//! | integer key `1`      | `[1]`     |
//! | sequence index `0`   | `[0]`     |
//! | attribute `name`     | `.name`   |
//!
//! ```rust
//! use serde_deepdiff::{Key, Path, Step};
//!
//! let path = Path::root()
//!     .child(Step::Key(Key::from("users")))
//!     .child(Step::Index(0))
//!     .child(Step::Attribute("name".into()));
//! assert_eq!(path.to_string(), "root['users'][0].name");
//! assert_eq!(Path::parse("root['users'][0].name"), Some(path));
//! ```
//!
//! [`PathFilter`] decides which addresses a comparison looks at.

use crate::value::escape_str;
use crate::{Error, Key, Result};
use std::fmt;

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// A mapping key, string or integer.
    Key(Key),
    /// A position in a sequence, or a synthetic position assigned when
    /// pairing unordered elements.
    Index(usize),
    /// A named attribute of an object-like value.
    Attribute(String),
}

impl Step {
    /// The step that reaches the value stored under `key`.
    #[must_use]
    pub fn from_key(key: &Key) -> Self {
        match key {
            Key::Attr(name) => Step::Attribute(name.clone()),
            other => Step::Key(other.clone()),
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Step::Key(Key::Int(i)) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Step::Key(Key::Str(s)) | Step::Key(Key::Attr(s)) => {
                out.push_str("['");
                out.push_str(&escape_key(s));
                out.push_str("']");
            }
            Step::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Step::Attribute(name) => {
                out.push('.');
                out.push_str(name);
            }
        }
    }

    /// Short label used by the pretty printer: the bare key, `[i]` for
    /// positions, the bare attribute name.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Step::Key(Key::Str(s)) | Step::Key(Key::Attr(s)) | Step::Attribute(s) => s.clone(),
            Step::Key(Key::Int(i)) => format!("[{}]", i),
            Step::Index(i) => format!("[{}]", i),
        }
    }
}

fn escape_key(key: &str) -> String {
    key.replace('\\', "\\\\").replace('\'', "\\'")
}

/// An address, rendered as `root` followed by its steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<Step>,
    rendered: String,
}

impl Path {
    /// The address of the compared values themselves.
    #[must_use]
    pub fn root() -> Self {
        Path {
            steps: Vec::new(),
            rendered: "root".to_string(),
        }
    }

    /// Returns a new path one step deeper.
    #[must_use]
    pub fn child(&self, step: Step) -> Self {
        let mut rendered = self.rendered.clone();
        step.write_to(&mut rendered);
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Path { steps, rendered }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Parses a rendered address.
    ///
    /// Accepts single- or double-quoted string keys with backslash escapes,
    /// integer keys and attribute names. Non-negative bracketed integers parse
    /// as [`Step::Index`]; they render the same as integer keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::Path;
    ///
    /// let path = Path::parse(r#"root["it's"][2]"#).unwrap();
    /// assert_eq!(path.to_string(), r"root['it\'s'][2]");
    /// assert!(Path::parse("data['a']").is_none());
    /// assert!(Path::parse("root['open").is_none());
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Option<Path> {
        let rest = input.strip_prefix("root")?;
        let mut path = Path::root();
        let mut chars = rest.chars().peekable();

        while let Some(ch) = chars.next() {
            let step = match ch {
                '[' => match chars.peek() {
                    Some(&quote @ ('\'' | '"')) => {
                        chars.next();
                        let mut key = String::new();
                        loop {
                            match chars.next()? {
                                '\\' => key.push(chars.next()?),
                                c if c == quote => break,
                                c => key.push(c),
                            }
                        }
                        if chars.next()? != ']' {
                            return None;
                        }
                        Step::Key(Key::Str(key))
                    }
                    _ => {
                        let mut digits = String::new();
                        loop {
                            match chars.next()? {
                                ']' => break,
                                c => digits.push(c),
                            }
                        }
                        let number: i64 = digits.trim().parse().ok()?;
                        match usize::try_from(number) {
                            Ok(index) => Step::Index(index),
                            Err(_) => Step::Key(Key::Int(number)),
                        }
                    }
                },
                '.' => {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '[' || c == '.' {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    if name.is_empty() {
                        return None;
                    }
                    Step::Attribute(name)
                }
                _ => return None,
            };
            path = path.child(step);
        }

        Some(path)
    }

    /// Compact form used in pretty output: `a.b[0]`, `a['x y']`.
    ///
    /// The root path renders as `root`.
    #[must_use]
    pub fn compact(&self) -> String {
        if self.steps.is_empty() {
            return "root".to_string();
        }
        compact_steps(&self.steps)
    }
}

/// Renders steps in compact form without a leading `root`.
pub(crate) fn compact_steps(steps: &[Step]) -> String {
    let mut out = String::new();
    for (idx, step) in steps.iter().enumerate() {
        match step {
            Step::Key(Key::Str(name)) | Step::Key(Key::Attr(name)) | Step::Attribute(name)
                if is_simple_identifier(name) =>
            {
                if idx > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            Step::Key(Key::Str(name)) | Step::Key(Key::Attr(name)) | Step::Attribute(name) => {
                out.push_str("['");
                out.push_str(&escape_str(name));
                out.push_str("']");
            }
            Step::Key(Key::Int(i)) => out.push_str(&format!("[{}]", i)),
            Step::Index(i) => out.push_str(&format!("[{}]", i)),
        }
    }
    out
}

fn is_simple_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Returns `true` when `pattern` equals `rendered` or is a proper prefix of it
/// that ends exactly at a step boundary.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::path::matches_prefix;
///
/// assert!(matches_prefix("root['foo']['bar']", "root['foo']"));
/// assert!(matches_prefix("root['foo']", "root['foo']"));
/// assert!(!matches_prefix("root['foobar']", "root['foo"));
/// assert!(!matches_prefix("root[10]", "root[1"));
/// ```
#[must_use]
pub fn matches_prefix(rendered: &str, pattern: &str) -> bool {
    match rendered.strip_prefix(pattern) {
        Some("") => true,
        Some(rest) => rest.starts_with('[') || rest.starts_with('.'),
        None => false,
    }
}

/// Inclusion and exclusion patterns over rendered addresses.
///
/// Exclusion always wins. With no include patterns every address is allowed;
/// otherwise an address is allowed when it lies inside an included subtree or
/// is an ancestor of one.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{Path, PathFilter};
///
/// let filter = PathFilter::new(vec!["root['foo']".into()], vec!["root['foo']['secret']".into()]).unwrap();
/// assert!(filter.allows_str("root"));
/// assert!(filter.allows_str("root['foo']['bar']"));
/// assert!(!filter.allows_str("root['foo']['secret']"));
/// assert!(!filter.allows_str("root['other']"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathFilter {
    /// Builds a filter, normalizing each pattern to its rendered form.
    ///
    /// Patterns must be addresses starting with `root`.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Result<Self> {
        Ok(PathFilter {
            include: normalize_patterns("include_paths", include)?,
            exclude: normalize_patterns("exclude_paths", exclude)?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    #[must_use]
    pub fn allows(&self, path: &Path) -> bool {
        self.allows_str(path.as_str())
    }

    #[must_use]
    pub fn allows_str(&self, rendered: &str) -> bool {
        if self
            .exclude
            .iter()
            .any(|pattern| matches_prefix(rendered, pattern))
        {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|pattern| {
            matches_prefix(rendered, pattern) || matches_prefix(pattern, rendered)
        })
    }
}

fn normalize_patterns(option: &str, patterns: Vec<String>) -> Result<Vec<String>> {
    patterns
        .into_iter()
        .map(|pattern| match Path::parse(&pattern) {
            Some(path) => Ok(path.rendered),
            None => Err(Error::invalid_option(
                option,
                format!("`{}` is not an address starting with `root`", pattern),
            )),
        })
        .collect()
}
