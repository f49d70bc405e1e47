//! Error types for dynamic schema generation.

use graphweave_core::BuildError;
use thiserror::Error;

/// Errors that can occur while handing a type graph to async-graphql.
#[derive(Debug, Error)]
pub enum DynamicSchemaError {
    /// Forcing a deferred field or member set failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The adapter configuration is invalid.
    #[error("Invalid dynamic schema configuration: {0}")]
    InvalidConfig(String),

    /// async-graphql rejected the generated schema.
    #[error("Failed to build dynamic schema: {0}")]
    SchemaBuildFailed(String),
}

impl DynamicSchemaError {
    /// Returns a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Build(err) => err.error_code(),
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_is_transparent() {
        let err = DynamicSchemaError::from(BuildError::EmptyUnion("Result".into()));
        assert_eq!(
            err.to_string(),
            BuildError::EmptyUnion("Result".into()).to_string()
        );
        assert_eq!(err.error_code(), "EMPTY_UNION");
    }

    #[test]
    fn test_schema_build_failed_message() {
        let err = DynamicSchemaError::SchemaBuildFailed("Type \"Query\" not found".into());
        assert_eq!(
            err.to_string(),
            "Failed to build dynamic schema: Type \"Query\" not found"
        );
        assert_eq!(err.error_code(), "SCHEMA_BUILD_FAILED");
    }
}
