//! Builder configuration.
//!
//! The configuration is passed explicitly to [`SchemaBuilder::new`](crate::SchemaBuilder::new);
//! nothing in the builder reads process environment. It can be embedded in a
//! larger TOML document:
//!
//! ```toml
//! [schema]
//! artifacts = false
//! dangling_extensions = "warn"
//! suggestion_distance = 3
//! max_suggestions = 5
//!
//! [schema.nullability]
//! output = true
//! input = false
//! ```

use serde::{Deserialize, Serialize};

/// Non-null defaults for output and input positions.
///
/// `Some(true)` makes positions non-null by default, `Some(false)` makes
/// them nullable, and `None` defers to the next tier: a type's override
/// defers to the builder's global setting, which defers to the language
/// default (outputs non-null, inputs nullable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullabilityConfig {
    /// Default for object and interface fields.
    #[serde(default)]
    pub output: Option<bool>,

    /// Default for arguments and input object fields.
    #[serde(default)]
    pub input: Option<bool>,
}

impl NullabilityConfig {
    /// Both positions non-null by default.
    #[must_use]
    pub fn non_null() -> Self {
        Self {
            output: Some(true),
            input: Some(true),
        }
    }

    /// Both positions nullable by default.
    #[must_use]
    pub fn nullable() -> Self {
        Self {
            output: Some(false),
            input: Some(false),
        }
    }

    /// Overrides the output default.
    #[must_use]
    pub fn with_output(mut self, non_null: bool) -> Self {
        self.output = Some(non_null);
        self
    }

    /// Overrides the input default.
    #[must_use]
    pub fn with_input(mut self, non_null: bool) -> Self {
        self.input = Some(non_null);
        self
    }
}

/// What finalize does with extensions whose target never resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingExtensionPolicy {
    /// Fail the build with `MissingType` for the target name.
    #[default]
    Error,
    /// Log a warning and drop the extension.
    Warn,
}

/// Type-graph builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Global non-null defaults.
    #[serde(default)]
    pub nullability: NullabilityConfig,

    /// Handling of extensions that target unknown types.
    /// Default: error
    #[serde(default)]
    pub dangling_extensions: DanglingExtensionPolicy,

    /// Maximum edit distance for "did you mean" suggestions.
    /// Default: 3
    #[serde(default = "default_suggestion_distance")]
    pub suggestion_distance: usize,

    /// Maximum number of suggestions attached to a `MissingType` error.
    /// Default: 5
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Hand the finished graph to the attached artifact sink.
    /// Default: false
    #[serde(default = "default_artifacts")]
    pub artifacts: bool,
}

fn default_suggestion_distance() -> usize {
    3
}

fn default_max_suggestions() -> usize {
    5
}

fn default_artifacts() -> bool {
    false
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            nullability: NullabilityConfig::default(),
            dangling_extensions: DanglingExtensionPolicy::default(),
            suggestion_distance: default_suggestion_distance(),
            max_suggestions: default_max_suggestions(),
            artifacts: default_artifacts(),
        }
    }
}

impl BuilderConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.suggestion_distance == 0 {
            return Err("schema.suggestion_distance must be > 0".into());
        }
        if self.max_suggestions == 0 {
            return Err("schema.max_suggestions must be > 0".into());
        }
        Ok(())
    }

    /// Returns a copy with the given global nullability defaults.
    #[must_use]
    pub fn with_nullability(mut self, nullability: NullabilityConfig) -> Self {
        self.nullability = nullability;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuilderConfig::default();
        assert_eq!(config.nullability, NullabilityConfig::default());
        assert_eq!(config.dangling_extensions, DanglingExtensionPolicy::Error);
        assert_eq!(config.suggestion_distance, 3);
        assert_eq!(config.max_suggestions, 5);
        assert!(!config.artifacts);
    }

    #[test]
    fn test_valid_config() {
        assert!(BuilderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_suggestion_distance() {
        let mut config = BuilderConfig::default();
        config.suggestion_distance = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_suggestions() {
        let mut config = BuilderConfig::default();
        config.max_suggestions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            artifacts = true
            dangling_extensions = "warn"

            [nullability]
            output = false
        "#;

        let config: BuilderConfig = toml::from_str(toml).unwrap();
        assert!(config.artifacts);
        assert_eq!(config.dangling_extensions, DanglingExtensionPolicy::Warn);
        assert_eq!(config.nullability.output, Some(false));
        assert_eq!(config.nullability.input, None);
        assert_eq!(config.suggestion_distance, 3);
    }

    #[test]
    fn test_nullability_builders() {
        let n = NullabilityConfig::default().with_input(true);
        assert_eq!(n.input, Some(true));
        assert_eq!(n.output, None);
        assert_eq!(NullabilityConfig::nullable().output, Some(false));
        assert_eq!(NullabilityConfig::non_null().input, Some(true));
    }
}
