//! Convenience macro for building argument lists.

/// Builds a `Vec<Value>` from a comma-separated list of convertible values.
///
/// Anything with a `From` conversion into [`Value`](crate::Value) works,
/// including existing `Value`s such as [`Value::Null`](crate::Value::Null).
///
/// # Examples
///
/// ```rust
/// use vfmt::{args, format_template, Value};
///
/// let out = format_template("%s is %d", &args!["x", 42]);
/// assert_eq!(out, "x is 42");
///
/// let out = format_template("%v", &args![Value::Null]);
/// assert_eq!(out, "<nil>");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::Value;

    #[test]
    fn builds_mixed_argument_lists() {
        let args = args![1, "two", 3.0, true];
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], Value::Int(1));
        assert_eq!(args[1], Value::Str("two".to_string()));
        assert_eq!(args[3], Value::Bool(true));
    }

    #[test]
    fn empty_list() {
        let args = args![];
        assert!(args.is_empty());
    }
}
