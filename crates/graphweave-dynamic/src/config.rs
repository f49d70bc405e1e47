//! Dynamic schema configuration.
//!
//! Can be embedded in a larger TOML document:
//!
//! ```toml
//! [dynamic]
//! query = "Query"
//! mutation = "Mutation"
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

/// Options for the generated async-graphql schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicSchemaConfig {
    /// Name of the query root object.
    /// Default: "Query"
    #[serde(default = "default_query")]
    pub query: String,

    /// Name of the mutation root object, if any.
    /// Default: none
    #[serde(default)]
    pub mutation: Option<String>,

    /// Maximum query depth allowed.
    /// Default: unlimited
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Maximum query complexity allowed.
    /// Default: unlimited
    #[serde(default)]
    pub max_complexity: Option<usize>,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_query() -> String {
    "Query".to_string()
}

fn default_introspection() -> bool {
    true
}

impl Default for DynamicSchemaConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            mutation: None,
            max_depth: None,
            max_complexity: None,
            introspection: default_introspection(),
        }
    }
}

impl DynamicSchemaConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.query.is_empty() {
            return Err("dynamic.query must not be empty".into());
        }
        if self.mutation.as_deref() == Some("") {
            return Err("dynamic.mutation must not be empty when set".into());
        }
        if self.max_depth == Some(0) {
            return Err("dynamic.max_depth must be > 0".into());
        }
        if self.max_complexity == Some(0) {
            return Err("dynamic.max_complexity must be > 0".into());
        }
        Ok(())
    }

    /// Sets the mutation root.
    #[must_use]
    pub fn with_mutation(mut self, name: impl Into<String>) -> Self {
        self.mutation = Some(name.into());
        self
    }
}
