//! # graphweave-dynamic
//!
//! Hands a finalized graphweave [`TypeGraph`](graphweave_core::TypeGraph) to
//! async-graphql's dynamic schema, producing an executable
//! [`Schema`](async_graphql::dynamic::Schema).
//!
//! - Object fields run their resolver, or read the parent value's key of the
//!   same name when they have none
//! - Values returned for interface and union fields are tagged with the
//!   concrete type picked by the abstract type's resolver
//! - Enum fields translate internal values back to value names; enum
//!   arguments arrive at resolvers as internal values
//! - Custom scalars apply their serialize callback on output and their
//!   parse callback to incoming arguments
//!
//! ## Example
//!
//! ```
//! use graphweave_core::{BuilderConfig, FieldDef, SchemaBuilder, TypeDef};
//! use graphweave_dynamic::{DynamicSchemaConfig, into_dynamic_schema};
//!
//! let builder = SchemaBuilder::new(BuilderConfig::default());
//! builder
//!     .register(TypeDef::object("Query", |t| {
//!         t.field(FieldDef::new("version", "String").resolve(|_| Ok("1.0".into())));
//!     }))
//!     .unwrap();
//! let graph = builder.finalize().unwrap();
//!
//! let schema = into_dynamic_schema(&graph, &DynamicSchemaConfig::default()).unwrap();
//! assert!(schema.sdl().contains("version: String!"));
//! ```

pub mod config;
pub mod convert;
pub mod error;
mod resolve;
pub mod schema;

pub use config::DynamicSchemaConfig;
pub use convert::{graphql_value_to_json, json_to_graphql_value, to_dynamic_type_ref};
pub use error::DynamicSchemaError;
pub use schema::into_dynamic_schema;
