//! Type-graph construction.
//!
//! ## Components
//!
//! - [`TypeResolver`] - Descriptor store and lazy resolver with cycle guard
//! - [`SchemaBuilder`] - Registration entry point and the final build pass
//! - [`TypeGraph`] - The finalized name to type map
//!
//! ## Architecture
//!
//! The build pass:
//! 1. Descriptors and predefined types are registered by name
//! 2. `finalize()` resolves every registered name; resolution builds a type
//!    once and caches it, following references on demand
//! 3. Every built type's deferred field/member sets are forced once so
//!    contract violations fail the build
//! 4. Extensions are checked against their targets
//! 5. The graph is handed to the artifact sink when enabled

mod builders;
pub(crate) mod extensions;
pub(crate) mod fields;
mod graph;
mod inherit;
mod registry;
pub mod wrapping;

pub use graph::{ArtifactSink, SchemaBuilder, TypeGraph};
pub use registry::{BUILTIN_SCALARS, TypeResolver, is_builtin_scalar};
