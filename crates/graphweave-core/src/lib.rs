//! # graphweave-core
//!
//! Lazy type-graph builder for GraphQL schemas.
//!
//! Type authors describe object, interface, union, enum, scalar and input
//! object types as descriptors, in any order and with arbitrary mutual
//! references. The builder resolves every descriptor into a finalized
//! [`NamedType`], handing back a [`TypeGraph`] that a schema-execution engine
//! can consume. It supports:
//!
//! - Forward references between types declared in any order
//! - Detection of genuine circular resolution (diamond references are fine)
//! - Layered nullability defaults: field, then type, then global config
//! - Interface field inheritance into implementing types
//! - Validation of abstract types (resolvers, non-empty unions)
//! - Field extensions merged into existing types
//!
//! ## Modules
//!
//! - [`config`] - Builder configuration
//! - [`descriptor`] - Unbuilt type descriptors and definition blocks
//! - [`types`] - Finalized named types and deferred computations
//! - [`schema`] - Registry, lazy resolver and the build pass
//! - [`error`] - Error types for graph construction

pub mod config;
pub mod descriptor;
pub mod error;
pub mod schema;
pub mod suggest;
pub mod types;

// Re-export main types
pub use config::{BuilderConfig, DanglingExtensionPolicy, NullabilityConfig};
pub use descriptor::{
    EnumValueDef, ExtensionDefinition, FieldDef, FieldModification, FieldResolveFn,
    InputObjectDefinition, InputValueDef, InterfaceDefinition, ItemNullability, ListSpec,
    ObjectDefinition, ResolveError, ResolveParams, ScalarDef, ScalarFn, TypeDef, TypeDefKind,
    TypeResolveFn, TypeSource, UnionDefinition,
};
pub use error::BuildError;
pub use schema::{ArtifactSink, SchemaBuilder, TypeGraph, TypeResolver};
pub use types::{
    EnumType, EnumValue, FieldMap, InputFieldMap, InputObjectType, InputValue, InterfaceType,
    NamedType, ObjectType, OutputField, ScalarType, Thunk, TypeRef, UnionType,
};

/// Result type for graph construction.
pub type Result<T> = std::result::Result<T, BuildError>;
