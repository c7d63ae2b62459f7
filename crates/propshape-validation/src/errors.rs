//! Validation error types and the error composer
//!
//! Validation failures are values, never panics: a validator returns
//! `Err(ValidationError)` and the caller decides what to do with the rendered
//! message. The composer enriches a raw reason with the property name and the
//! owning object's type, when those are available.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Validation Result
// ============================================================================

/// Validation result type: `Ok(())` is the success marker
pub type ValidationResult = Result<(), ValidationError>;

// ============================================================================
// Single Validation Error
// ============================================================================

/// A single validation error
///
/// Carries the fully rendered, human-readable message. The message is a
/// terminal description meant for a developer debugging their declarations;
/// no other component is allowed to parse it. The `error_type` classification
/// and `property` path are advisory extras.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{message}")]
pub struct ValidationError {
    /// Property path the error was composed for (e.g. "profile.name")
    pub property: Option<String>,

    /// Fully rendered human-readable message
    pub message: String,

    /// Error type classification
    pub error_type: ErrorType,
}

impl ValidationError {
    /// Create a new validation error from an already-rendered message
    pub fn new(property: Option<String>, message: String, error_type: ErrorType) -> Self {
        Self {
            property,
            message,
            error_type,
        }
    }
}

// ============================================================================
// Error Type Classification
// ============================================================================

/// Classification of validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorType {
    /// Kind mismatch (e.g. expected number, got string)
    TypeError,

    /// Value constraint violation (e.g. not in the allowed set, out of range)
    ValueError,

    /// Required binding received an absent value
    Missing,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeError => write!(f, "type_error"),
            Self::ValueError => write!(f, "value_error"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

// ============================================================================
// Owner Context
// ============================================================================

/// Optional-capability view of the object on whose behalf a value is being
/// validated
///
/// Both accessors are best-effort and independently absent-safe: a missing
/// capability just omits that fragment of the rendered message. The engine
/// only ever reads identity information from the context, never mutates it.
pub trait OwnerContext {
    /// Display name of the owning object's type
    fn type_name(&self) -> Option<String> {
        None
    }

    /// The object one level up that renders/supplies this owner
    fn parent(&self) -> Option<&dyn OwnerContext> {
        None
    }
}

/// Simple concrete owner context with a name and an optional parent
#[derive(Debug, Clone)]
pub struct NamedOwner {
    name: String,
    parent: Option<std::sync::Arc<NamedOwner>>,
}

impl NamedOwner {
    /// Create an owner context with the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Set the parent owner
    pub fn with_parent(mut self, parent: NamedOwner) -> Self {
        self.parent = Some(std::sync::Arc::new(parent));
        self
    }
}

impl OwnerContext for NamedOwner {
    fn type_name(&self) -> Option<String> {
        // An empty name is the same as no name; it would render a dangling
        // " on " fragment.
        if self.name.is_empty() {
            None
        } else {
            Some(self.name.clone())
        }
    }

    fn parent(&self) -> Option<&dyn OwnerContext> {
        self.parent.as_deref().map(|p| p as &dyn OwnerContext)
    }
}

// ============================================================================
// Error Composer
// ============================================================================

/// Build a contextual validation error from a raw reason
///
/// The rendered text states which property received invalid state, the
/// underlying reason, which owning object's type received it, and, when the
/// owner's parent resolves a name, a hint pointing at the parent as the place
/// to inspect. Every context lookup fails soft: with no property and no
/// owner, the message is just the raw reason.
pub fn compose(
    message: &str,
    property: Option<&str>,
    owner: Option<&dyn OwnerContext>,
    error_type: ErrorType,
) -> ValidationError {
    let mut text = match property {
        Some(p) => format!("property '{}' received invalid state: {}", p, message),
        None => message.to_string(),
    };

    if let Some(owner) = owner {
        let owner_name = owner.type_name();
        let parent_name = owner.parent().and_then(|p| p.type_name());

        if let Some(name) = &owner_name {
            text.push_str(&format!(" on {}", name));
        }
        match (owner_name, parent_name) {
            (Some(name), Some(parent)) => {
                text.push_str(&format!(" (check {}, which renders {})", parent, name));
            }
            (None, Some(parent)) => {
                text.push_str(&format!(" (check {})", parent));
            }
            _ => {}
        }
    }

    ValidationError::new(property.map(str::to_string), text, error_type)
}
