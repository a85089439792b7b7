//! Dynamic value representation for compared data.
//!
//! This module provides the [`Value`] enum, the input model of the diff
//! engine. Any `T: Serialize` converts into a `Value` through
//! [`to_value`](crate::to_value); values can also be built by hand or with the
//! [`value!`](crate::value) macro when a shape serde cannot express is needed
//! (sets, tagged adapter types, shared or cyclic nodes).
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, big integer, string, bytes, date, array,
//!   set, object, table, tagged, shared and external values
//! - [`Number`]: integer or floating-point numbers
//! - [`TypeTag`]: the runtime type name used for type-change reporting
//! - [`SharedValue`]: an identity-bearing node that may participate in cycles
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_deepdiff::{value, Value, TypeTag};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let set = Value::set(vec![Value::from(1), Value::from(2)]);
//! let array = Value::tagged(TypeTag::new("ndarray"), value!([10, 5.6]));
//!
//! assert!(number.is_number());
//! assert!(set.is_set());
//! assert!(null.is_null());
//! assert_eq!(array.to_string(), "[10, 5.6]");
//! ```
//!
//! ## Cycles
//!
//! ```rust
//! use serde_deepdiff::{SharedValue, Value, ValueMap};
//!
//! let node = SharedValue::empty();
//! let mut map = ValueMap::new();
//! map.insert("self", Value::Shared(node.clone()));
//! node.set(Value::Object(map)).unwrap();
//!
//! assert_eq!(Value::Shared(node).to_string(), "{'self': {...}}");
//! ```

use crate::adapter::External;
use crate::{Key, ValueMap};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A dynamically-typed representation of any value the engine can compare.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{Value, Number};
///
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// assert_eq!(text.to_string(), "'hello'");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    BigInt(BigInt),
    String(String),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    /// Ordered sequence; position is significant.
    Array(Vec<Value>),
    /// Unordered collection; position is not significant.
    Set(Vec<Value>),
    Object(ValueMap),
    /// Tabular data, compared column by column.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// A value whose runtime type differs from its shape's default
    /// (`ndarray`, `tuple`, `float64`, ...).
    Tagged { tag: TypeTag, value: Box<Value> },
    Shared(SharedValue),
    External(External),
}

/// A numeric value that can be an integer or a float.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// assert_eq!(Number::Float(10.0).to_string(), "10.0");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Floats with no fractional part that fit in the `i64` range convert;
    /// everything else returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing `.0` on whole floats.
            Number::Float(fl) if fl.is_nan() => f.write_str("nan"),
            Number::Float(fl) if fl.is_infinite() => {
                f.write_str(if *fl > 0.0 { "inf" } else { "-inf" })
            }
            Number::Float(fl) => write!(f, "{:?}", fl),
        }
    }
}

/// The runtime type name of a value.
///
/// Tags appear in `type_changes` records and are the members of
/// equivalence groups. Built-in shapes use the constants below; adapters
/// declare their own through [`Value::tagged`].
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::TypeTag;
///
/// assert_eq!(TypeTag::INT.as_str(), "int");
/// assert_eq!(TypeTag::new("float64").to_string(), "float64");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    pub const NONE: TypeTag = TypeTag(Cow::Borrowed("NoneType"));
    pub const BOOL: TypeTag = TypeTag(Cow::Borrowed("bool"));
    pub const INT: TypeTag = TypeTag(Cow::Borrowed("int"));
    pub const FLOAT: TypeTag = TypeTag(Cow::Borrowed("float"));
    pub const STR: TypeTag = TypeTag(Cow::Borrowed("str"));
    pub const BYTES: TypeTag = TypeTag(Cow::Borrowed("bytes"));
    pub const DATETIME: TypeTag = TypeTag(Cow::Borrowed("datetime"));
    pub const LIST: TypeTag = TypeTag(Cow::Borrowed("list"));
    pub const SET: TypeTag = TypeTag(Cow::Borrowed("set"));
    pub const DICT: TypeTag = TypeTag(Cow::Borrowed("dict"));
    pub const TABLE: TypeTag = TypeTag(Cow::Borrowed("table"));

    /// Creates a tag from any type name.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        TypeTag(name.into())
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(value: &'static str) -> Self {
        TypeTag(Cow::Borrowed(value))
    }
}

impl From<String> for TypeTag {
    fn from(value: String) -> Self {
        TypeTag(Cow::Owned(value))
    }
}

/// An identity-bearing node.
///
/// Clones share the same identity. A `SharedValue` can be created empty and
/// filled later, which is how self-referential structures are built. Such
/// cycles keep their nodes alive for as long as the process runs.
///
/// Equality is identity: two shared nodes are equal only when they are the
/// same node. Structural comparison is the diff engine's job.
#[derive(Clone)]
pub struct SharedValue(Arc<OnceLock<Value>>);

impl SharedValue {
    /// Creates a shared node holding `value`.
    #[must_use]
    pub fn new(value: Value) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        SharedValue(Arc::new(cell))
    }

    /// Creates a shared node with no content yet.
    #[must_use]
    pub fn empty() -> Self {
        SharedValue(Arc::new(OnceLock::new()))
    }

    /// Fills an empty node. Returns the value back if the node was already set.
    pub fn set(&self, value: Value) -> std::result::Result<(), Value> {
        self.0.set(value)
    }

    /// Returns the content, or `None` for a node that was never filled.
    #[must_use]
    pub fn get(&self) -> Option<&Value> {
        self.0.get()
    }

    /// A number identifying this node for as long as it is alive.
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Returns `true` when both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &SharedValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedValue({:#x})", self.id())
    }
}

impl Value {
    /// Creates an unordered collection.
    #[must_use]
    pub fn set(items: Vec<Value>) -> Self {
        Value::Set(items)
    }

    /// Wraps a value with an explicit runtime type tag.
    #[must_use]
    pub fn tagged(tag: impl Into<TypeTag>, value: Value) -> Self {
        Value::Tagged {
            tag: tag.into(),
            value: Box::new(value),
        }
    }

    /// Wraps a value in a new shared node.
    #[must_use]
    pub fn shared(value: Value) -> Self {
        Value::Shared(SharedValue::new(value))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` for integers, floats and big integers.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_) | Value::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Value::Set(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        matches!(self, Value::Shared(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer or a whole-number float, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            Value::BigInt(bi) => bi.to_f64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Follows shared nodes, tags and adapters down to the value they stand for.
    ///
    /// Cyclic chains of shared nodes that only point at each other resolve
    /// to the last node visited.
    #[must_use]
    pub fn resolve(&self) -> &Value {
        let mut current = self;
        let mut hops = 0usize;
        loop {
            let next = match current {
                Value::Shared(node) => match node.get() {
                    Some(inner) => inner,
                    None => return current,
                },
                Value::External(external) => external.resolve(),
                Value::Tagged { value, .. } => &**value,
                _ => return current,
            };
            hops += 1;
            if hops > 64 {
                return current;
            }
            current = next;
        }
    }

    /// Builds the column mapping of a table: header → column cells.
    ///
    /// Rows shorter than the header are padded with `Null`; cells beyond the
    /// header are dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{value, Value};
    ///
    /// let table = Value::Table {
    ///     headers: vec!["a".into(), "b".into()],
    ///     rows: vec![vec![value!(1), value!(3)], vec![value!(2)]],
    /// };
    /// let columns = table.columns().unwrap();
    /// assert_eq!(columns.get("a"), Some(&value!([1, 2])));
    /// assert_eq!(columns.get("b"), Some(&value!([3, null])));
    /// ```
    #[must_use]
    pub fn columns(&self) -> Option<ValueMap> {
        let Value::Table { headers, rows } = self else {
            return None;
        };
        let mut columns = ValueMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cells = rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
                .collect();
            columns.insert(header.as_str(), Value::Array(cells));
        }
        Some(columns)
    }

    fn write_repr(&self, f: &mut fmt::Formatter<'_>, seen: &mut Vec<usize>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::String(s) => write!(f, "'{}'", escape_str(s)),
            Value::Bytes(bytes) => {
                f.write_str("b'")?;
                for b in bytes {
                    match b {
                        b'\\' => f.write_str("\\\\")?,
                        b'\'' => f.write_str("\\'")?,
                        0x20..=0x7e => write!(f, "{}", *b as char)?,
                        _ => write!(f, "\\x{:02x}", b)?,
                    }
                }
                f.write_str("'")
            }
            Value::Date(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Array(items) => {
                f.write_str("[")?;
                write_items(f, items, seen)?;
                f.write_str("]")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_items(f, items, seen)?;
                f.write_str("}")
            }
            Value::Object(map) => write_map(f, map, seen),
            Value::Table { .. } => match self.columns() {
                Some(columns) => write_map(f, &columns, seen),
                None => Ok(()),
            },
            Value::Tagged { value, .. } => value.write_repr(f, seen),
            Value::Shared(node) => {
                let id = node.id();
                if seen.contains(&id) {
                    return f.write_str(match node.get() {
                        Some(Value::Object(_)) => "{...}",
                        _ => "[...]",
                    });
                }
                match node.get() {
                    Some(inner) => {
                        seen.push(id);
                        let result = inner.write_repr(f, seen);
                        seen.pop();
                        result
                    }
                    None => f.write_str("<empty>"),
                }
            }
            Value::External(external) => external.resolve().write_repr(f, seen),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value], seen: &mut Vec<usize>) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        item.write_repr(f, seen)?;
    }
    Ok(())
}

fn write_map(f: &mut fmt::Formatter<'_>, map: &ValueMap, seen: &mut Vec<usize>) -> fmt::Result {
    f.write_str("{")?;
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        match key {
            Key::Int(i) => write!(f, "{}: ", i)?,
            Key::Str(s) | Key::Attr(s) => write!(f, "'{}': ", escape_str(s))?,
        }
        value.write_repr(f, seen)?;
    }
    f.write_str("}")
}

pub(crate) fn escape_str(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '\'', '\n', '\r', '\t']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Renders values in the notation used by reports and pretty output:
/// `'text'`, `True`, `None`, `[1, 2]`, `{'a': 1}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_repr(f, &mut Vec::new())
    }
}

struct Guarded<'a> {
    value: &'a Value,
    seen: &'a RefCell<Vec<usize>>,
}

impl<'a> Guarded<'a> {
    fn child(&self, value: &'a Value) -> Guarded<'a> {
        Guarded {
            value,
            seen: self.seen,
        }
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Array(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    match k {
                        Key::Int(i) => map.serialize_key(i)?,
                        Key::Str(s) | Key::Attr(s) => map.serialize_key(s)?,
                    }
                    map.serialize_value(&self.child(v))?;
                }
                map.end()
            }
            Value::Table { headers, rows } => {
                let mut seq = serializer.serialize_seq(Some(rows.len()))?;
                for row in rows {
                    let object: ValueMap = headers
                        .iter()
                        .zip(row.iter())
                        .map(|(header, cell)| (header.as_str(), cell.clone()))
                        .collect();
                    let row_value = Value::Object(object);
                    seq.serialize_element(&Guarded {
                        value: &row_value,
                        seen: self.seen,
                    })?;
                }
                seq.end()
            }
            Value::Tagged { value, .. } => self.child(value).serialize(serializer),
            Value::Shared(node) => {
                let id = node.id();
                if self.seen.borrow().contains(&id) {
                    return serializer.serialize_str("<cycle>");
                }
                match node.get() {
                    Some(inner) => {
                        self.seen.borrow_mut().push(id);
                        let result = self.child(inner).serialize(serializer);
                        self.seen.borrow_mut().pop();
                        result
                    }
                    None => serializer.serialize_unit(),
                }
            }
            Value::External(external) => self.child(external.resolve()).serialize(serializer),
        }
    }
}

/// Serializes the value's data. Shared nodes serialize their content; a node
/// already being serialized further up serializes as the string `"<cycle>"`.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let seen = RefCell::new(Vec::new());
        Guarded { value: self, seen: &seen }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ValueMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

/// Values above `i64::MAX` become big integers rather than lossy floats.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(value as f64))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::Number(Number::Float(42.0)).as_i64(), Some(42));
        assert_eq!(Value::String("test".to_string()).as_i64(), None);
    }

    #[test]
    fn test_bigint_as_f64() {
        let value = Value::BigInt(BigInt::from(u64::MAX) * 4);
        assert_eq!(value.as_f64(), Some(u64::MAX as f64 * 4.0));

        let huge = Value::BigInt(BigInt::from(10).pow(400));
        assert_eq!(huge.as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, null], "b": true}"#).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(
            map.get("a"),
            Some(&Value::Array(vec![Value::from(1), Value::from(2.5), Value::Null]))
        );
        assert_eq!(map.get("b"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_u64_overflow_becomes_bigint() {
        assert_eq!(Value::from(7u64), Value::Number(Number::Integer(7)));
        assert!(matches!(Value::from(u64::MAX), Value::BigInt(_)));
    }

    #[test]
    fn test_display_notation() {
        let mut map = ValueMap::new();
        map.insert("a", Value::from("it's"));
        map.insert(2, Value::Array(vec![Value::Null, Value::Bool(true)]));
        assert_eq!(
            Value::Object(map).to_string(),
            "{'a': 'it\\'s', 2: [None, True]}"
        );
        assert_eq!(Value::Set(vec![]).to_string(), "set()");
        assert_eq!(Value::Bytes(vec![b'a', 0]).to_string(), "b'a\\x00'");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_shared_identity_equality() {
        let a = SharedValue::new(Value::from(1));
        let b = SharedValue::new(Value::from(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(SharedValue::empty().get().is_none());
    }

    #[test]
    fn test_cyclic_display_terminates() {
        let node = SharedValue::empty();
        node.set(Value::Array(vec![Value::from(1), Value::Shared(node.clone())]))
            .unwrap();
        assert_eq!(Value::Shared(node).to_string(), "[1, [...]]");
    }

    #[test]
    fn test_resolve_peels_wrappers() {
        let inner = Value::tagged("ndarray", Value::Array(vec![Value::from(1)]));
        let shared = Value::shared(inner);
        assert_eq!(shared.resolve(), &Value::Array(vec![Value::from(1)]));
    }
}
