//! Higher-order validators built from other validators
//!
//! Combinators evaluate their sub-validators in a deterministic order and
//! stop at the first failure. A sub-validator's failure is never discarded:
//! it is either propagated verbatim or re-wrapped with positional/keyed
//! context. Combinator configuration is checked eagerly at construction;
//! misconfiguration is a programmer error and panics, never a
//! `ValidationError`.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use tracing::trace;

use crate::errors::{compose, ErrorType, OwnerContext, ValidationError, ValidationResult};
use crate::types::Value;
use crate::validators::{boxed, maybe, BoxedValidator, Maybe, Validator};

// ============================================================================
// ArrayOf
// ============================================================================

/// Validates that a value is an array whose every element passes an item
/// validator
pub struct ArrayOf {
    item: BoxedValidator,
}

impl ArrayOf {
    /// Create an array validator from an item validator
    pub fn new(item: impl Validator + 'static) -> Self {
        Self { item: boxed(item) }
    }
}

impl Validator for ArrayOf {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        let items = match value {
            Value::List(items) => items,
            _ => {
                return Err(compose(
                    &format!("expected type 'array', got '{}'", value.type_name()),
                    property,
                    owner,
                    ErrorType::TypeError,
                ));
            }
        };

        for (index, item) in items.iter().enumerate() {
            // Items are checked context-free; the one contextual wrap happens
            // here, naming the failing index and nesting the cause.
            if let Err(cause) = self.item.validate(item, None, None) {
                trace!(index, "array item failed validation");
                return Err(compose(
                    &format!("array item at index {} is invalid: {}", index, cause.message),
                    property,
                    owner,
                    cause.error_type,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ArrayOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ArrayOf(..)")
    }
}

/// Validator for arrays whose elements all pass `item`
pub fn array_of(item: impl Validator + 'static) -> Maybe<ArrayOf> {
    maybe(ArrayOf::new(item))
}

// ============================================================================
// ObjectOf
// ============================================================================

/// Validates that a value is an object whose every own value passes an item
/// validator
///
/// Unlike [`ArrayOf`], the failure message does not name the offending key;
/// only the inner cause is carried.
pub struct ObjectOf {
    item: BoxedValidator,
}

impl ObjectOf {
    /// Create an object validator from an item validator
    pub fn new(item: impl Validator + 'static) -> Self {
        Self { item: boxed(item) }
    }
}

impl Validator for ObjectOf {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        let pairs: &[(String, Value)] = match value {
            Value::Object(pairs) => pairs,
            // Host objects are object-kind but expose no enumerable values
            Value::Opaque(_) => &[],
            _ => {
                return Err(compose(
                    &format!("expected type 'object', got '{}'", value.type_name()),
                    property,
                    owner,
                    ErrorType::TypeError,
                ));
            }
        };

        for (_, item) in pairs {
            if let Err(cause) = self.item.validate(item, None, None) {
                return Err(compose(
                    &format!("expected values of one type: {}", cause.message),
                    property,
                    owner,
                    ErrorType::TypeError,
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectOf(..)")
    }
}

/// Validator for objects whose values all pass `item`
pub fn object_of(item: impl Validator + 'static) -> Maybe<ObjectOf> {
    maybe(ObjectOf::new(item))
}

// ============================================================================
// OneOf - Allowed-value membership
// ============================================================================

/// Validates that a value equals one of a set of allowed literal values
#[derive(Debug, Clone)]
pub struct OneOf {
    values: Vec<Value>,
}

impl OneOf {
    /// Create a membership validator
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: Vec<Value>) -> Self {
        assert!(
            !values.is_empty(),
            "one_of requires a non-empty list of allowed values"
        );
        Self { values }
    }
}

impl Validator for OneOf {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        if self.values.contains(value) {
            return Ok(());
        }
        Err(compose(
            &format!("expected one of [{}]", render_values(&self.values)),
            property,
            owner,
            ErrorType::ValueError,
        ))
    }
}

/// Validator accepting only the listed values
pub fn one_of(values: Vec<Value>) -> Maybe<OneOf> {
    maybe(OneOf::new(values))
}

fn render_values(values: &[Value]) -> String {
    values
        .iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::List(items) => format!("[{}]", render_values(items)),
        Value::Object(pairs) => {
            let fields = pairs
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", k, render_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{}}}", fields)
        }
        Value::Function(_) => "<function>".to_string(),
        Value::Opaque(_) => "<object>".to_string(),
    }
}

// ============================================================================
// OneOfType - Validator union
// ============================================================================

/// Validates that a value passes at least one of a list of validators,
/// tried in list order
pub struct OneOfType {
    validators: Vec<BoxedValidator>,
}

impl OneOfType {
    /// Create a union validator
    ///
    /// # Panics
    ///
    /// Panics if `validators` is empty.
    pub fn new(validators: Vec<BoxedValidator>) -> Self {
        assert!(
            !validators.is_empty(),
            "one_of_type requires a non-empty list of validators"
        );
        Self { validators }
    }
}

impl Validator for OneOfType {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        // Short-circuits on the first validator that accepts the value.
        for validator in &self.validators {
            if validator.validate(value, None, None).is_ok() {
                return Ok(());
            }
        }
        trace!(candidates = self.validators.len(), "no variant accepted the value");
        Err(compose(
            "expected one of the given types",
            property,
            owner,
            ErrorType::TypeError,
        ))
    }
}

impl fmt::Debug for OneOfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneOfType")
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Validator accepting values that pass any of `validators`
pub fn one_of_type(validators: Vec<BoxedValidator>) -> Maybe<OneOfType> {
    maybe(OneOfType::new(validators))
}

// ============================================================================
// ShapeOf - Declarative object shape
// ============================================================================

/// Per-key definition in a shape descriptor: a validator plus a required flag
///
/// A bare validator (`ShapeEntry::optional`) and the richer required form
/// both resolve to the same internal record at construction time, so shape
/// inspection happens once, not on every validation call.
pub struct ShapeEntry {
    required: bool,
    validator: BoxedValidator,
}

impl ShapeEntry {
    /// Key may be absent; when present, its value must pass `validator`
    pub fn optional(validator: impl Validator + 'static) -> Self {
        Self {
            required: false,
            validator: boxed(validator),
        }
    }

    /// Key must be present with a defined, non-null value passing `validator`
    pub fn required(validator: impl Validator + 'static) -> Self {
        Self {
            required: true,
            validator: boxed(validator),
        }
    }
}

struct ShapeField {
    key: String,
    required: bool,
    validator: BoxedValidator,
}

/// Validates that a value is an object conforming to a declarative shape
///
/// Keys are checked in insertion order and validation stops at the first
/// failing key. The failing key's validator is invoked with the qualified
/// property name (`property.key`), so the error it composes is
/// per-key-qualified.
pub struct ShapeOf {
    fields: Vec<ShapeField>,
}

static ABSENT: Value = Value::Null;

impl ShapeOf {
    /// Resolve a shape descriptor into a validator
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, ShapeEntry)>) -> Self {
        let fields: Vec<ShapeField> = entries
            .into_iter()
            .map(|(key, entry)| ShapeField {
                key: key.into(),
                required: entry.required,
                validator: entry.validator,
            })
            .collect();
        trace!(fields = fields.len(), "resolved shape descriptor");
        Self { fields }
    }
}

impl Validator for ShapeOf {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        // Host objects are object-kind; every shape key reads as absent on them.
        if !matches!(value, Value::Object(_) | Value::Opaque(_)) {
            return Err(compose(
                &format!("expected type 'object', got '{}'", value.type_name()),
                property,
                owner,
                ErrorType::TypeError,
            ));
        }

        for field in &self.fields {
            let item = value.get(&field.key).unwrap_or(&ABSENT);
            let qualified = match property {
                Some(p) => format!("{}.{}", p, field.key),
                None => field.key.clone(),
            };

            if field.required && !item.is_defined() {
                // Re-run the key's validator without null tolerance so the
                // absence is reported with the validator's normal message,
                // not a separate "missing" message shape.
                if let Err(err) = field.validator.validate_strict(item, Some(&qualified), owner) {
                    return Err(ValidationError {
                        error_type: ErrorType::Missing,
                        ..err
                    });
                }
                continue;
            }

            field.validator.validate(item, Some(&qualified), owner)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShapeOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeOf")
            .field("keys", &self.fields.iter().map(|field| field.key.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// Validator for objects matching a shape descriptor
pub fn shape_of<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, ShapeEntry)>,
) -> Maybe<ShapeOf> {
    maybe(ShapeOf::new(entries))
}

// ============================================================================
// InRange - Inclusive numeric range
// ============================================================================

/// Validates that a value is a number within an inclusive range
///
/// The failure message is deliberately flat (`invalid value`), matching the
/// boolean-only failure mode this check has always had.
#[derive(Debug, Clone, Copy)]
pub struct InRange {
    min: f64,
    max: f64,
}

impl InRange {
    /// Create a range validator over `min..=max`
    ///
    /// # Panics
    ///
    /// Panics if either bound is NaN or if `min > max`.
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            !min.is_nan() && !max.is_nan(),
            "in_range bounds must be numbers"
        );
        assert!(min <= max, "in_range requires min <= max");
        Self { min, max }
    }
}

impl Validator for InRange {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        let n = match value {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            _ => {
                return Err(compose("invalid value", property, owner, ErrorType::ValueError));
            }
        };
        if n >= self.min && n <= self.max {
            Ok(())
        } else {
            Err(compose("invalid value", property, owner, ErrorType::ValueError))
        }
    }
}

/// Validator for numbers in `min..=max`
pub fn in_range(min: f64, max: f64) -> Maybe<InRange> {
    maybe(InRange::new(min, max))
}

// ============================================================================
// InstanceOf - Dynamic-type membership
// ============================================================================

/// Validates that a value is an opaque host object of type `T`
pub struct InstanceOf<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T: Any> InstanceOf<T> {
    /// Create an instance check for `T`
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }

    fn expected_name() -> &'static str {
        let full = type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl<T: Any> Default for InstanceOf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> Validator for InstanceOf<T> {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        match value {
            Value::Opaque(opaque) if opaque.is::<T>() => Ok(()),
            _ => Err(compose(
                &format!("expected an instance of '{}'", Self::expected_name()),
                property,
                owner,
                ErrorType::TypeError,
            )),
        }
    }
}

impl<T> fmt::Debug for InstanceOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceOf({})", type_name::<T>())
    }
}

/// Validator for opaque values holding a `T`
pub fn instance_of<T: Any>() -> Maybe<InstanceOf<T>> {
    maybe(InstanceOf::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpaqueValue;
    use crate::validators::{boolean, number, string};

    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn test_array_of_all_items_pass() {
        let validator = array_of(number());
        let value = list(vec![Value::Int(1), Value::Float(2.5), Value::Int(3)]);
        assert!(validator.validate(&value, None, None).is_ok());
    }

    #[test]
    fn test_array_of_reports_first_failing_index() {
        let validator = array_of(number());
        let value = list(vec![
            Value::Int(1),
            Value::String("x".to_string()),
            Value::Bool(true),
        ]);
        let err = validator.validate(&value, None, None).unwrap_err();
        assert!(err.message.contains("index 1"), "message: {}", err.message);
        assert!(err.message.contains("expected type 'number', got 'string'"));
    }

    #[test]
    fn test_array_of_rejects_non_array() {
        let validator = array_of(number());
        let err = validator.validate(&Value::Int(1), None, None).unwrap_err();
        assert_eq!(err.message, "expected type 'array', got 'number'");
    }

    #[test]
    fn test_object_of_generic_failure_keeps_cause() {
        let validator = object_of(number());
        let good = obj(vec![("a", Value::Int(1)), ("b", Value::Float(2.0))]);
        assert!(validator.validate(&good, None, None).is_ok());

        let bad = obj(vec![("a", Value::Int(1)), ("b", Value::Bool(true))]);
        let err = validator.validate(&bad, None, None).unwrap_err();
        assert!(err.message.starts_with("expected values of one type"));
        assert!(err.message.contains("got 'boolean'"));
        // The offending key is deliberately not named.
        assert!(!err.message.contains("'b'"));
    }

    #[test]
    fn test_object_of_accepts_host_object() {
        // Opaque host objects are object-kind with no enumerable values, so
        // they are vacuously valid; rejecting them would claim
        // "expected type 'object'" against a value whose kind is 'object'.
        let validator = object_of(number());
        let value = Value::Opaque(OpaqueValue::new("host"));
        assert_eq!(value.type_name(), "object");
        assert!(validator.validate(&value, None, None).is_ok());
    }

    #[test]
    fn test_shape_of_host_object_keys_read_as_absent() {
        let value = Value::Opaque(OpaqueValue::new("host"));

        let optional_only = shape_of(vec![("a", ShapeEntry::optional(number()))]);
        assert!(optional_only.validate(&value, None, None).is_ok());

        let with_required = shape_of(vec![("a", ShapeEntry::required(number()))]);
        let err = with_required.validate(&value, None, None).unwrap_err();
        assert_eq!(err.error_type, ErrorType::Missing);
        assert!(err.message.contains("got 'null'"), "message: {}", err.message);
    }

    #[test]
    fn test_one_of_lists_allowed_values() {
        let validator = one_of(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(validator.validate(&Value::Int(2), None, None).is_ok());

        let err = validator.validate(&Value::Int(4), None, None).unwrap_err();
        assert!(err.message.contains("[1, 2, 3]"), "message: {}", err.message);
        assert_eq!(err.error_type, ErrorType::ValueError);
    }

    #[test]
    fn test_one_of_renders_strings_quoted() {
        let validator = one_of(vec![
            Value::String("red".to_string()),
            Value::String("blue".to_string()),
        ]);
        let err = validator
            .validate(&Value::String("green".to_string()), None, None)
            .unwrap_err();
        assert!(err.message.contains("\"red\", \"blue\""));
    }

    #[test]
    fn test_one_of_renders_composite_values_json_style() {
        let validator = one_of(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::Object(vec![("a".to_string(), Value::Bool(true))]),
        ]);
        let err = validator.validate(&Value::Int(3), None, None).unwrap_err();
        assert!(err.message.contains("[1, 2]"), "message: {}", err.message);
        assert!(err.message.contains("{\"a\": true}"), "message: {}", err.message);
        assert!(!err.message.contains("Int("), "message: {}", err.message);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_one_of_empty_is_misuse() {
        let _ = OneOf::new(Vec::new());
    }

    #[test]
    fn test_one_of_type_tries_in_order() {
        let validator = one_of_type(vec![boxed(boolean()), boxed(number())]);
        assert!(validator.validate(&Value::Bool(true), None, None).is_ok());
        assert!(validator.validate(&Value::Int(5), None, None).is_ok());

        let err = validator
            .validate(&Value::String("x".to_string()), None, None)
            .unwrap_err();
        assert_eq!(err.message, "expected one of the given types");
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_one_of_type_empty_is_misuse() {
        let _ = OneOfType::new(Vec::new());
    }

    #[test]
    fn test_shape_of_required_key_absent() {
        let validator = shape_of(vec![
            ("a", ShapeEntry::optional(number())),
            ("b", ShapeEntry::required(string())),
        ]);

        let err = validator
            .validate(&obj(vec![("a", Value::Int(1))]), None, None)
            .unwrap_err();
        // The absent key fails with its own validator's message, qualified by key.
        assert!(err.message.contains("'b'"), "message: {}", err.message);
        assert!(err.message.contains("expected type 'string', got 'null'"));
        assert_eq!(err.error_type, ErrorType::Missing);
    }

    #[test]
    fn test_shape_of_accepts_conforming_object() {
        let validator = shape_of(vec![
            ("a", ShapeEntry::optional(number())),
            ("b", ShapeEntry::required(string())),
        ]);
        let value = obj(vec![("a", Value::Int(1)), ("b", Value::String("x".to_string()))]);
        assert!(validator.validate(&value, None, None).is_ok());
    }

    #[test]
    fn test_shape_of_key_type_mismatch_is_qualified() {
        let validator = shape_of(vec![
            ("a", ShapeEntry::optional(number())),
            ("b", ShapeEntry::required(string())),
        ]);
        let value = obj(vec![
            ("a", Value::String("y".to_string())),
            ("b", Value::String("x".to_string())),
        ]);
        let err = validator.validate(&value, Some("config"), None).unwrap_err();
        assert!(err.message.contains("'config.a'"), "message: {}", err.message);
        assert!(err.message.contains("expected type 'number', got 'string'"));
    }

    #[test]
    fn test_shape_of_optional_key_may_be_absent() {
        let validator = shape_of(vec![("a", ShapeEntry::optional(number()))]);
        assert!(validator.validate(&obj(vec![]), None, None).is_ok());
    }

    #[test]
    fn test_shape_of_rejects_non_object() {
        let validator = shape_of(vec![("a", ShapeEntry::optional(number()))]);
        let err = validator.validate(&Value::Int(3), None, None).unwrap_err();
        assert_eq!(err.message, "expected type 'object', got 'number'");
    }

    #[test]
    fn test_in_range_inclusive_bounds() {
        let validator = in_range(1.0, 10.0);
        assert!(validator.validate(&Value::Int(5), None, None).is_ok());
        assert!(validator.validate(&Value::Int(1), None, None).is_ok());
        assert!(validator.validate(&Value::Int(10), None, None).is_ok());
        assert!(validator.validate(&Value::Float(10.0), None, None).is_ok());
        assert!(validator.validate(&Value::Int(11), None, None).is_err());
        assert!(validator.validate(&Value::Int(0), None, None).is_err());
    }

    #[test]
    fn test_in_range_flat_failure_message() {
        let validator = in_range(1.0, 10.0);
        let err = validator.validate(&Value::Int(11), None, None).unwrap_err();
        assert_eq!(err.message, "invalid value");

        let err = validator
            .validate(&Value::String("5".to_string()), None, None)
            .unwrap_err();
        assert_eq!(err.message, "invalid value");
    }

    #[test]
    #[should_panic(expected = "min <= max")]
    fn test_in_range_inverted_bounds_is_misuse() {
        let _ = InRange::new(10.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "must be numbers")]
    fn test_in_range_nan_bound_is_misuse() {
        let _ = InRange::new(f64::NAN, 1.0);
    }

    #[test]
    fn test_instance_of() {
        struct Widget;
        struct Other;

        let validator = instance_of::<Widget>();
        let value = Value::Opaque(OpaqueValue::new(Widget));
        assert!(validator.validate(&value, None, None).is_ok());

        let wrong = Value::Opaque(OpaqueValue::new(Other));
        let err = validator.validate(&wrong, None, None).unwrap_err();
        assert!(err.message.contains("'Widget'"), "message: {}", err.message);

        let not_opaque = Value::Int(1);
        assert!(validator.validate(&not_opaque, None, None).is_err());
    }

    #[test]
    fn test_combinators_tolerate_null() {
        struct Widget;
        assert!(array_of(number()).validate(&Value::Null, None, None).is_ok());
        assert!(object_of(number()).validate(&Value::Null, None, None).is_ok());
        assert!(one_of(vec![Value::Int(1)]).validate(&Value::Null, None, None).is_ok());
        assert!(one_of_type(vec![boxed(number())]).validate(&Value::Null, None, None).is_ok());
        assert!(shape_of(vec![("a", ShapeEntry::required(number()))])
            .validate(&Value::Null, None, None)
            .is_ok());
        assert!(in_range(0.0, 1.0).validate(&Value::Null, None, None).is_ok());
        assert!(instance_of::<Widget>().validate(&Value::Null, None, None).is_ok());
    }
}
