//! Dynamic value representation for formatter arguments.
//!
//! This module provides the [`Value`] enum, the crate's closed Kind
//! enumeration over every shape the engine knows how to render. Scalar kinds
//! (bool, integers, floats, complex, char, string, bytes) are handled by the
//! typed fast-path renderers; composite kinds (sequence, map, struct,
//! reference) and opaque [`Value::Dyn`] values go through the generic
//! reflective renderer.
//!
//! ## Creating values
//!
//! ```rust
//! use vfmt::{args, Value};
//!
//! let answer = Value::from(42);
//! let name = Value::from("Alice");
//! let row = Value::seq([1, 2, 3]);
//! let point = Value::record("Point", [("x", Value::from(1)), ("y", Value::from(2))]);
//!
//! // The args! macro builds a whole argument list
//! let argv = args![42, "Alice", true];
//! assert_eq!(argv.len(), 3);
//! ```
//!
//! ## Capability-bearing values
//!
//! Types that know how to render themselves implement [`Formattable`] and are
//! wrapped with [`Value::dynamic`]. The renderer probes the error, display,
//! and syntax hooks in priority order and contains any panic they raise.

use crate::ValueMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Optional self-rendering capabilities for opaque values.
///
/// All three hooks default to `None`; a value advertises a capability by
/// returning `Some`. The renderer prefers `syntax_text` when the alternate
/// form (`#`) is in effect, then `error_text` for any verb, then
/// `display_text` for `v` and `s`. A panic raised inside a hook is caught at
/// the call site and rendered as a `(PANIC=...)` diagnostic; it never reaches
/// the caller of a formatting entry point.
pub trait Formattable {
    /// Type name reported by `%T` and used in diagnostics.
    fn type_name(&self) -> &str;

    /// Error message, honored for every verb when present.
    fn error_text(&self) -> Option<String> {
        None
    }

    /// Human-readable text for `%v` and `%s`.
    fn display_text(&self) -> Option<String> {
        None
    }

    /// Source-syntax form, preferred under the alternate-form flag.
    fn syntax_text(&self) -> Option<String> {
        None
    }
}

/// A dynamically-typed formatter argument.
///
/// Every argument handed to a rendering entry point is a `Value`. Primitive
/// Rust types convert via `From`; arbitrary `serde::Serialize` types convert
/// via [`crate::to_value`].
///
/// # Examples
///
/// ```rust
/// use vfmt::Value;
///
/// let v = Value::from(42);
/// assert!(v.is_int());
/// assert_eq!(v.as_i64(), Some(42));
/// assert_eq!(v.type_name(), "i64");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// The nil argument.
    #[default]
    Null,
    Bool(bool),
    /// All signed integer widths funnel here.
    Int(i64),
    /// All unsigned integer widths funnel here.
    Uint(u64),
    F32(f32),
    F64(f64),
    /// Complex number as (real, imaginary).
    Complex(f64, f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(ValueMap),
    Struct {
        name: String,
        fields: Vec<(String, Value)>,
    },
    /// Reference kind; identity is the `Rc` allocation address, which the
    /// renderer's visited set uses for cycle detection.
    Ref(Rc<RefCell<Value>>),
    /// Opaque capability-bearing value.
    Dyn(Rc<dyn Formattable>),
}

impl Value {
    /// Builds a sequence value from anything iterable over convertible items.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vfmt::Value;
    ///
    /// let v = Value::seq([1, 2, 3]);
    /// assert!(v.is_seq());
    /// ```
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Builds a struct-kind value with a type name and ordered fields.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vfmt::{format_template, args, Value};
    ///
    /// let p = Value::record("Point", [("x", Value::from(1)), ("y", Value::from(2))]);
    /// assert_eq!(format_template("%+v", &args![p]), "{x:1 y:2}");
    /// ```
    pub fn record<N, I, K>(name: N, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct {
            name: name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Wraps a value in a reference cell, giving it a stable identity.
    ///
    /// Clones of the returned `Value` share the same pointee; rendering the
    /// same identity twice within one call reports a cyclic reference.
    #[must_use]
    pub fn reference(value: Value) -> Self {
        Value::Ref(Rc::new(RefCell::new(value)))
    }

    /// Wraps a capability-bearing value.
    pub fn dynamic<T: Formattable + 'static>(value: T) -> Self {
        Value::Dyn(Rc::new(value))
    }

    /// Wraps any displayable error as an error-capability value.
    ///
    /// The resulting value renders its message under every verb and is
    /// recognized as a cause by [`crate::format_error`]'s `%w` verb.
    pub fn from_error<E: fmt::Display>(err: E) -> Self {
        Value::Dyn(Rc::new(ErrorValue {
            text: err.to_string(),
        }))
    }

    /// Builds a byte-sequence value.
    #[must_use]
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    /// Returns `true` if the value is the nil argument.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a signed or unsigned integer.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_))
    }

    /// Returns `true` if the value is a float of either width.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::F32(_) | Value::F64(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Returns `true` if the value is a sequence.
    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Value::Seq(_))
    }

    /// Returns `true` if the value is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns `true` if the value is string-like (string or bytes).
    ///
    /// Default-format concatenation suppresses the separating space when
    /// either neighbor is string-like.
    #[inline]
    #[must_use]
    pub const fn is_string_like(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Bytes(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer representable as `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// If the value is an unsigned integer or a non-negative signed one,
    /// returns it as `u64`.
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(u) => Some(*u),
            Value::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// If the value is a float, returns it widened to `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(f) => Some(f64::from(*f)),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The type name reported by `%T` and used in mismatch diagnostics.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "<nil>".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "i64".to_string(),
            Value::Uint(_) => "u64".to_string(),
            Value::F32(_) => "f32".to_string(),
            Value::F64(_) => "f64".to_string(),
            Value::Complex(..) => "complex".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Bytes(_) => "bytes".to_string(),
            Value::Seq(_) => "seq".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Struct { name, .. } => name.clone(),
            Value::Ref(inner) => format!("&{}", inner.borrow().type_name()),
            Value::Dyn(d) => d.type_name().to_string(),
        }
    }
}

/// Error-capability wrapper produced by [`Value::from_error`].
struct ErrorValue {
    text: String,
}

impl Formattable for ErrorValue {
    fn type_name(&self) -> &str {
        "error"
    }

    fn error_text(&self) -> Option<String> {
        Some(self.text.clone())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => ar == br && ai == bi,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Struct {
                    name: an,
                    fields: af,
                },
                Value::Struct {
                    name: bn,
                    fields: bf,
                },
            ) => an == bn && af == bf,
            // Identity comparison: a shared reference equals itself.
            (Value::Ref(a), Value::Ref(b)) => Rc::ptr_eq(a, b),
            (Value::Dyn(a), Value::Dyn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Complex(re, im) => f.debug_tuple("Complex").field(re).field(im).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Bytes(b) => f.debug_tuple("Bytes").field(b).finish(),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Value::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Value::Struct { name, fields } => f
                .debug_struct("Struct")
                .field("name", name)
                .field("fields", fields)
                .finish(),
            Value::Ref(inner) => match inner.try_borrow() {
                Ok(v) => f.debug_tuple("Ref").field(&*v).finish(),
                Err(_) => f.write_str("Ref(<borrowed>)"),
            },
            Value::Dyn(d) => write!(f, "Dyn({})", d.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Uint(u64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Uint(u64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint(u64::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Uint(value as u64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(42u8), Value::Uint(42));
        assert_eq!(Value::from(3.5f64), Value::F64(3.5));
        assert_eq!(Value::from('x'), Value::Char('x'));
        assert_eq!(Value::from("test"), Value::Str("test".to_string()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(7)), Value::Int(7));
        assert_eq!(Value::from(vec![1, 2]), Value::seq([1, 2]));
    }

    #[test]
    fn accessor_conversions() {
        assert_eq!(Value::Uint(9).as_i64(), Some(9));
        assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::F32(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Str("hi".into()).as_str(), Some("hi"));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::from(1).type_name(), "i64");
        assert_eq!(Value::from("s").type_name(), "string");
        assert_eq!(Value::seq([1]).type_name(), "seq");
        let empty: Vec<(String, Value)> = Vec::new();
        assert_eq!(Value::record("Point", empty).type_name(), "Point");
        assert_eq!(
            Value::reference(Value::from(1)).type_name(),
            "&i64"
        );
    }

    #[test]
    fn reference_identity_equality() {
        let a = Value::reference(Value::from(1));
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::reference(Value::from(1)));
    }

    #[test]
    fn error_value_capability() {
        let v = Value::from_error("boom");
        match &v {
            Value::Dyn(d) => {
                assert_eq!(d.type_name(), "error");
                assert_eq!(d.error_text().as_deref(), Some("boom"));
                assert!(d.display_text().is_none());
            }
            _ => panic!("expected Dyn"),
        }
    }
}
