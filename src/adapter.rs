//! Adapters for external container types.
//!
//! An adapter turns a foreign object into a [`Value`] the engine can descend
//! into. The engine asks for the conversion lazily, the first time the value
//! is reached, and caches the result, so an adapter is invoked at most once
//! per [`External`] no matter how many comparisons reuse it.
//!
//! A failing adapter never aborts a comparison: the value degrades to an
//! opaque string scalar tagged with the adapter's type name, and a warning is
//! logged through `tracing`.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Serialize;
//! use serde_deepdiff::{DeepDiff, Model, Value};
//!
//! #[derive(Serialize)]
//! struct Settings { retries: u32 }
//!
//! let old = Value::from(Model(Settings { retries: 3 }));
//! let new = Value::from(Model(Settings { retries: 5 }));
//! let diff = DeepDiff::new(old, new);
//!
//! assert!(!diff.is_empty());
//! ```

use crate::{Result, TypeTag, Value};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// A conversion from an external object into a [`Value`].
pub trait Adapter: Send + Sync {
    /// The runtime type name reported for the converted value.
    fn type_name(&self) -> TypeTag;

    /// Converts the object. Mapping-shaped objects should return
    /// [`Value::Object`], sequence-shaped ones [`Value::Array`].
    fn dump(&self) -> Result<Value>;
}

/// A value backed by an [`Adapter`], converted on first use.
#[derive(Clone)]
pub struct External {
    adapter: Arc<dyn Adapter>,
    resolved: Arc<OnceLock<Value>>,
}

impl External {
    /// Wraps an adapter.
    pub fn new<A: Adapter + 'static>(adapter: A) -> Self {
        External {
            adapter: Arc::new(adapter),
            resolved: Arc::new(OnceLock::new()),
        }
    }

    /// The adapter's declared type name.
    #[must_use]
    pub fn type_name(&self) -> TypeTag {
        self.adapter.type_name()
    }

    /// Returns the converted value, running the adapter if needed.
    ///
    /// The result is always tagged with the adapter's type name.
    pub fn resolve(&self) -> &Value {
        self.resolved.get_or_init(|| {
            let tag = self.adapter.type_name();
            match self.adapter.dump() {
                Ok(value @ Value::Tagged { .. }) => value,
                Ok(value) => Value::tagged(tag, value),
                Err(err) => {
                    warn!(type_name = %tag, error = %err, "adapter failed, comparing as opaque value");
                    Value::tagged(tag, Value::String(format!("<adapter error: {}>", err)))
                }
            }
        })
    }
}

impl PartialEq for External {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resolved, &other.resolved)
    }
}

impl fmt::Debug for External {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "External({})", self.adapter.type_name())
    }
}

/// Any serializable object compared through its serde representation.
///
/// Structs dump to a mapping of their fields. The reported type name is the
/// type's own name without its module path.
#[derive(Clone, Debug)]
pub struct Model<T>(pub T);

impl<T> Adapter for Model<T>
where
    T: Serialize + Send + Sync,
{
    fn type_name(&self) -> TypeTag {
        TypeTag::new(short_type_name::<T>())
    }

    fn dump(&self) -> Result<Value> {
        crate::to_value(&self.0)
    }
}

impl<T> From<Model<T>> for Value
where
    T: Serialize + Send + Sync + 'static,
{
    fn from(model: Model<T>) -> Self {
        Value::External(External::new(model))
    }
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl Adapter for Counting {
        fn type_name(&self) -> TypeTag {
            TypeTag::new("Counting")
        }

        fn dump(&self) -> Result<Value> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Array(vec![Value::from(1)]))
        }
    }

    struct Broken;

    impl Adapter for Broken {
        fn type_name(&self) -> TypeTag {
            TypeTag::new("Broken")
        }

        fn dump(&self) -> Result<Value> {
            Err(Error::custom("no dump available"))
        }
    }

    #[derive(Serialize)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_adapter_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let external = External::new(Counting(calls.clone()));
        let first = external.resolve().clone();
        let second = external.clone().resolve().clone();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            first,
            Value::tagged("Counting", Value::Array(vec![Value::from(1)]))
        );
    }

    #[test]
    fn test_failing_adapter_degrades() {
        let external = External::new(Broken);
        match external.resolve() {
            Value::Tagged { tag, value } => {
                assert_eq!(tag.as_str(), "Broken");
                assert!(value.as_str().unwrap().starts_with("<adapter error"));
            }
            other => panic!("Expected tagged value, got {:?}", other),
        }
    }

    #[test]
    fn test_model_type_name() {
        assert_eq!(Model(Point { x: 1 }).type_name().as_str(), "Point");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }
}
