//! Propshape Validation
//!
//! Composable value validators for declarative property definitions.
//!
//! The crate provides small predicate validators that check whether a runtime
//! [`Value`] conforms to an expected shape, and combinators that build new
//! validators out of existing ones. A consuming configuration layer attaches
//! these validators to named property definitions and invokes them at
//! assignment time; failures come back as contextual, human-readable
//! [`ValidationError`]s, never as panics.
//!
//! Every validator this crate hands out tolerates absent values: `Null` is
//! valid everywhere, and presence is enforced separately by a `required`
//! flag on the binding (see [`ShapeEntry::required`]).
//!
//! # Example
//!
//! ```rust
//! use propshape_validation::{array_of, number, shape_of, string, ShapeEntry, Validator, Value};
//!
//! let profile = shape_of(vec![
//!     ("name", ShapeEntry::required(string())),
//!     ("scores", ShapeEntry::optional(array_of(number()))),
//! ]);
//!
//! let value = Value::Object(vec![
//!     ("name".to_string(), Value::String("ada".to_string())),
//!     ("scores".to_string(), Value::List(vec![Value::Int(1), Value::Int(2)])),
//! ]);
//! assert!(profile.validate(&value, Some("profile"), None).is_ok());
//!
//! let missing = Value::Object(vec![]);
//! let err = profile.validate(&missing, Some("profile"), None).unwrap_err();
//! assert!(err.message.contains("profile.name"));
//! ```

// Public modules
pub mod combinators;
pub mod errors;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use combinators::{
    array_of, in_range, instance_of, object_of, one_of, one_of_type, shape_of, ArrayOf, InRange,
    InstanceOf, ObjectOf, OneOf, OneOfType, ShapeEntry, ShapeOf,
};
pub use errors::{
    compose, ErrorType, NamedOwner, OwnerContext, ValidationError, ValidationResult,
};
pub use types::{Kind, NativeFn, OpaqueValue, Value};
pub use validators::{
    any, array, boolean, boxed, from_fn, function, maybe, number, object, string, Anything,
    BoxedValidator, FnValidator, Maybe, TypeOf, Validator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_validators_are_plain_values() {
        // A factory result and a configured combinator share the same calling
        // convention, so either can be attached to a property definition.
        let bindings: Vec<BoxedValidator> = vec![
            boxed(number()),
            boxed(one_of(vec![Value::Int(1), Value::Int(2)])),
        ];
        for validator in &bindings {
            assert!(validator.validate(&Value::Int(1), None, None).is_ok());
        }
    }
}
