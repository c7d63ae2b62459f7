//! Runtime value model
//!
//! This module defines the runtime values the validators operate on and the
//! kind tags used by the primitive type checker.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Value Enum - Runtime values to be validated
// ============================================================================

/// Runtime value that can be validated
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (covers both null and undefined)
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// String value
    String(String),
    /// List/Array of values
    List(Vec<Value>),
    /// Object/Dictionary (key-value pairs, insertion order preserved)
    Object(Vec<(String, Value)>),
    /// Opaque callable (e.g. a setter or render callback)
    Function(NativeFn),
    /// Opaque host object, target of `instance_of` checks
    Opaque(OpaqueValue),
}

impl Value {
    /// Get the runtime kind of this value
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Boolean,
            Self::Int(_) | Self::Float(_) => Kind::Number,
            Self::String(_) => Kind::String,
            Self::List(_) => Kind::Array,
            // Host objects are object-kind, same as plain objects
            Self::Object(_) | Self::Opaque(_) => Kind::Object,
            Self::Function(_) => Kind::Function,
        }
    }

    /// Get human-readable kind name for error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if value is defined and non-null
    ///
    /// This is the predicate the `Maybe` wrapper short-circuits on: absent
    /// values are never, by themselves, a validation failure.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Null)
    }

    /// Look up a key on an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

// ============================================================================
// Kind - Runtime kind tags
// ============================================================================

/// Runtime kind of a value, as reported by the primitive type checker
///
/// Arrays are distinguished from generic objects even though structurally an
/// array is a kind of object; integers and floats both report `Number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Absent value
    Null,
    /// Boolean
    Boolean,
    /// Integer or float
    Number,
    /// String
    String,
    /// List of values
    Array,
    /// Key-value object (plain or opaque host object)
    Object,
    /// Callable value
    Function,
}

impl Kind {
    /// Human-readable kind name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// NativeFn - Opaque callable payload
// ============================================================================

/// Opaque callable held by `Value::Function`
///
/// The engine never invokes these; it only reports their kind. Invocation is
/// the concern of the setter/transform layer that owns the value.
#[derive(Clone)]
pub struct NativeFn(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl NativeFn {
    /// Wrap a callable
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the wrapped callable
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFn(<function>)")
    }
}

impl PartialEq for NativeFn {
    /// Identity comparison: two handles are equal iff they share the callable
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// OpaqueValue - Opaque host object payload
// ============================================================================

/// Opaque host object held by `Value::Opaque`
///
/// Wraps any `'static` type so `instance_of` can run a dynamic-type
/// membership test against it. The engine never mutates the payload.
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn Any + Send + Sync>);

impl OpaqueValue {
    /// Wrap a host object
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Check whether the payload is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_ref().is::<T>()
    }

    /// Borrow the payload as a `T`, if it is one
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_ref().downcast_ref::<T>()
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueValue(<opaque>)")
    }
}

impl PartialEq for OpaqueValue {
    /// Identity comparison: two handles are equal iff they share the payload
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Conversions
// ============================================================================

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(fields) => {
                Value::Object(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
            // Callables and host objects have no JSON representation
            Value::Function(_) | Value::Opaque(_) => serde_json::Value::Null,
        }
    }
}
