/// Builds a [`Value`](crate::Value) inline.
///
/// Objects take literal keys: string literals become string keys, integer
/// literals integer keys. Any other expression goes through
/// [`to_value`](crate::to_value); wrap negative numbers and other multi-token
/// expressions in parentheses.
///
/// ```rust
/// use serde_deepdiff::{value, Key, Value};
///
/// let v = value!({"name": "Alice", 1: [true, null, (-2)]});
/// let map = v.as_object().unwrap();
/// assert_eq!(map.get("name"), Some(&Value::from("Alice")));
/// assert_eq!(map.get(Key::Int(1)), Some(&value!([true, null, (-2)])));
/// ```
#[macro_export]
macro_rules! value {
    // Handle null
    (null) => {
        $crate::Value::Null
    };

    // Handle true
    (true) => {
        $crate::Value::Bool(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Bool(false)
    };

    // Handle empty array
    ([]) => {
        $crate::Value::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key, $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Fallback for any expression
    ($other:expr) => {{
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Key, Number, Value, ValueMap};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(false), Value::Bool(false));
        assert_eq!(value!(42), Value::Number(Number::Integer(42)));
        assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
        assert_eq!(value!((-7)), Value::Number(Number::Integer(-7)));
    }

    #[test]
    fn test_value_macro_arrays() {
        assert_eq!(value!([]), Value::Array(vec![]));

        match value!([1, [2, 3]]) {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 2);
                assert_eq!(vec[0], Value::Number(Number::Integer(1)));
                assert_eq!(vec[1], Value::Array(vec![Value::from(2), Value::from(3)]));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_value_macro_objects() {
        assert_eq!(value!({}), Value::Object(ValueMap::new()));

        let obj = value!({
            "name": "Alice",
            "age": 30,
            7: "seven"
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Number(Number::Integer(30))));
                assert!(map.contains_key(Key::Int(7)));
            }
            _ => panic!("Expected object"),
        }
    }
}
