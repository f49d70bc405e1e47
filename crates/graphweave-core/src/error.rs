//! Error types for type-graph construction.
//!
//! Every failure is terminal for the current build pass: the first
//! violation encountered while resolving wins and no partial graph is
//! returned. Each variant carries the offending name(s) for diagnostics.

use thiserror::Error;

use crate::descriptor::TypeDefKind;

/// Errors that can occur while registering or resolving types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A name was referenced but is not known to the registry.
    #[error("Missing type {name}{}", suggestion_hint(.suggestions))]
    MissingType {
        name: String,
        suggestions: Vec<String>,
    },

    /// Two distinct descriptors (or a descriptor and a predefined type) share a name.
    #[error("Type {0} was defined more than once, type names must be unique")]
    AlreadyDefined(String),

    /// A name was requested while it was still being resolved.
    #[error("Circular dependency detected while resolving: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// An interface or union has no resolveType function.
    #[error("Missing resolveType for the abstract type {0}")]
    MissingResolveType(String),

    /// A union resolved to zero member types.
    #[error("Union {0} must have at least one member type")]
    EmptyUnion(String),

    /// A field descriptor was declared without a type.
    #[error("Missing type for field {field_name} on {type_name}")]
    MissingFieldType {
        type_name: String,
        field_name: String,
    },

    /// A field or argument set both `nullable` and `required`.
    #[error("Cannot set both nullable and required on {type_name}.{field_name}")]
    ConflictingNullability {
        type_name: String,
        field_name: String,
    },

    /// A name resolved to a kind that cannot fill the requested role.
    #[error("Expected {name} to be {expected}, but it is {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: TypeDefKind,
    },

    /// A field modification targets a field no implemented interface declares.
    #[error("Cannot modify field {field_name} on {type_name}: no implemented interface declares it")]
    UnknownModifiedField {
        type_name: String,
        field_name: String,
    },

    /// The attached artifact sink failed.
    #[error("Artifact generation failed: {0}")]
    Artifact(String),
}

fn suggestion_hint(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean {}?", suggestions.join(", "))
    }
}

impl BuildError {
    /// Create a new MissingType error
    pub fn missing_type(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::MissingType {
            name: name.into(),
            suggestions,
        }
    }

    /// Create a new AlreadyDefined error
    pub fn already_defined(name: impl Into<String>) -> Self {
        Self::AlreadyDefined(name.into())
    }

    /// Create a new MissingFieldType error
    pub fn missing_field_type(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::MissingFieldType {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Create a new ConflictingNullability error
    pub fn conflicting_nullability(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self::ConflictingNullability {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    /// Create a new TypeMismatch error
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        actual: TypeDefKind,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Returns a stable error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingType { .. } => "MISSING_TYPE",
            Self::AlreadyDefined(_) => "ALREADY_DEFINED",
            Self::CircularDependency { .. } => "CIRCULAR_DEPENDENCY",
            Self::MissingResolveType(_) => "MISSING_RESOLVE_TYPE",
            Self::EmptyUnion(_) => "EMPTY_UNION",
            Self::MissingFieldType { .. } => "MISSING_FIELD_TYPE",
            Self::ConflictingNullability { .. } => "CONFLICTING_NULLABILITY",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::UnknownModifiedField { .. } => "UNKNOWN_MODIFIED_FIELD",
            Self::Artifact(_) => "ARTIFACT_FAILED",
        }
    }

    /// Check if this error comes from resolving a name (as opposed to a
    /// malformed descriptor).
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::MissingType { .. }
                | Self::CircularDependency { .. }
                | Self::TypeMismatch { .. }
                | Self::UnknownModifiedField { .. }
        )
    }
}
