//! Validator trait, null tolerance, and primitive type checkers
//!
//! A validator is a pure, stateless check invoked as
//! `validate(value, property, owner)`; `property` and `owner` only enrich the
//! error text and may be omitted. Every validator this crate hands out is
//! wrapped in [`Maybe`], so an absent value is valid everywhere unless a
//! required binding says otherwise.

use std::sync::Arc;

use tracing::trace;

use crate::errors::{compose, ErrorType, OwnerContext, ValidationResult};
use crate::types::{Kind, Value};

// ============================================================================
// Validator Trait
// ============================================================================

/// Trait for all validators, primitive and composed
///
/// Validators hold no mutable state and may be shared freely across threads;
/// the same instance gives equal outcomes for equal inputs.
pub trait Validator: Send + Sync {
    /// Validate a value
    ///
    /// # Arguments
    /// * `value` - The value to check
    /// * `property` - Name of the property the value was assigned to
    /// * `owner` - The object on whose behalf the value is validated
    ///
    /// # Returns
    /// * `Ok(())` - Valid
    /// * `Err(ValidationError)` - Invalid, with a rendered message
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult;

    /// Validate without null tolerance
    ///
    /// [`Maybe`] overrides this to run its inner checker even against an
    /// absent value; everything else delegates to [`Validator::validate`].
    /// `ShapeOf` uses it to report a required-but-absent key with the key's
    /// own validator message.
    fn validate_strict(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        self.validate(value, property, owner)
    }
}

/// Type alias for a shared, type-erased validator
pub type BoxedValidator = Arc<dyn Validator>;

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        (**self).validate(value, property, owner)
    }

    fn validate_strict(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        (**self).validate_strict(value, property, owner)
    }
}

/// Erase a validator's type for storage in heterogeneous collections
pub fn boxed(validator: impl Validator + 'static) -> BoxedValidator {
    Arc::new(validator)
}

// ============================================================================
// Maybe - Null/undefined tolerance wrapper
// ============================================================================

/// Null tolerance wrapper
///
/// Short-circuits to valid when the incoming value is absent, otherwise
/// forwards `(value, property, owner)` unchanged to the inner checker.
/// Absence of a value is never, by itself, a validation failure at this
/// layer; enforcing presence is the consumer's `required` flag.
#[derive(Debug, Clone, Copy)]
pub struct Maybe<V> {
    inner: V,
}

impl<V> Maybe<V> {
    /// Wrap a checker
    pub fn new(inner: V) -> Self {
        Self { inner }
    }

    /// Returns a reference to the inner checker
    pub fn inner(&self) -> &V {
        &self.inner
    }

    /// Extracts the inner checker
    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V: Validator> Validator for Maybe<V> {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        if !value.is_defined() {
            return Ok(());
        }
        self.inner.validate(value, property, owner)
    }

    fn validate_strict(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        self.inner.validate_strict(value, property, owner)
    }
}

/// Wrap a checker so absent values short-circuit to valid
pub fn maybe<V: Validator>(inner: V) -> Maybe<V> {
    Maybe::new(inner)
}

// ============================================================================
// TypeOf - Primitive type checker
// ============================================================================

/// Checks that a value's runtime kind equals an expected kind
#[derive(Debug, Clone, Copy)]
pub struct TypeOf {
    expected: Kind,
}

impl TypeOf {
    /// Create a checker for the given kind
    pub fn new(expected: Kind) -> Self {
        Self { expected }
    }

    /// The kind this checker expects
    pub fn expected(&self) -> Kind {
        self.expected
    }
}

impl Validator for TypeOf {
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        let actual = value.kind();
        if actual == self.expected {
            return Ok(());
        }
        trace!(expected = self.expected.name(), actual = actual.name(), "kind mismatch");
        Err(compose(
            &format!(
                "expected type '{}', got '{}'",
                self.expected.name(),
                actual.name()
            ),
            property,
            owner,
            ErrorType::TypeError,
        ))
    }
}

// ============================================================================
// Anything - The "any" checker
// ============================================================================

/// Accepts every value
#[derive(Debug, Clone, Copy, Default)]
pub struct Anything;

impl Validator for Anything {
    fn validate(
        &self,
        _value: &Value,
        _property: Option<&str>,
        _owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        Ok(())
    }
}

// ============================================================================
// Primitive Factories
// ============================================================================
//
// Zero-argument factories give every validator the same calling convention:
// a parameterless validator is just a validator with no stored configuration,
// so `number()` is interchangeable with any configured combinator at the
// binding site.

/// Validator accepting any value
pub fn any() -> Maybe<Anything> {
    maybe(Anything)
}

/// Validator for array values
pub fn array() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::Array))
}

/// Validator for boolean values
pub fn boolean() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::Boolean))
}

/// Validator for callable values
pub fn function() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::Function))
}

/// Validator for numeric values (integer or float)
pub fn number() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::Number))
}

/// Validator for object values
pub fn object() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::Object))
}

/// Validator for string values
pub fn string() -> Maybe<TypeOf> {
    maybe(TypeOf::new(Kind::String))
}

// ============================================================================
// Function-based Validators (for ergonomic API)
// ============================================================================

/// A validator built from a closure
pub struct FnValidator<F>
where
    F: Fn(&Value, Option<&str>, Option<&dyn OwnerContext>) -> ValidationResult + Send + Sync,
{
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value, Option<&str>, Option<&dyn OwnerContext>) -> ValidationResult + Send + Sync,
{
    /// Create a validator from a closure
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value, Option<&str>, Option<&dyn OwnerContext>) -> ValidationResult + Send + Sync,
{
    fn validate(
        &self,
        value: &Value,
        property: Option<&str>,
        owner: Option<&dyn OwnerContext>,
    ) -> ValidationResult {
        (self.check)(value, property, owner)
    }
}

/// Create a null-tolerant validator from a closure
pub fn from_fn<F>(check: F) -> Maybe<FnValidator<F>>
where
    F: Fn(&Value, Option<&str>, Option<&dyn OwnerContext>) -> ValidationResult + Send + Sync,
{
    maybe(FnValidator::new(check))
}
