//! Schema builder and the finalized type graph.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use super::TypeResolver;
use crate::config::{BuilderConfig, DanglingExtensionPolicy};
use crate::descriptor::TypeDef;
use crate::error::BuildError;
use crate::types::{FieldMap, NamedType};
use crate::Result;

/// Receives the finished graph, e.g. to write schema files.
pub trait ArtifactSink {
    /// # Errors
    ///
    /// Returns a message describing why the artifacts could not be produced.
    fn write(&self, graph: &TypeGraph) -> std::result::Result<(), String>;
}

/// Builds a [`TypeGraph`] from type descriptors.
///
/// # Example
///
/// ```
/// use graphweave_core::{BuilderConfig, FieldDef, SchemaBuilder, TypeDef};
///
/// let builder = SchemaBuilder::new(BuilderConfig::default());
/// builder
///     .register(TypeDef::object("Query", |t| {
///         t.field(FieldDef::new("bar", "Bar"));
///     }))
///     .unwrap();
/// builder
///     .register(TypeDef::object("Bar", |t| {
///         t.field(FieldDef::new("ok", "Boolean"));
///     }))
///     .unwrap();
///
/// let graph = builder.finalize().unwrap();
/// let query = graph.fields("Query").unwrap();
/// assert_eq!(query["bar"].ty.to_string(), "Bar!");
/// ```
pub struct SchemaBuilder {
    resolver: TypeResolver,
    artifact_sink: Option<Box<dyn ArtifactSink>>,
}

impl SchemaBuilder {
    /// Creates a new builder with the given configuration.
    #[must_use]
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            resolver: TypeResolver::new(config),
            artifact_sink: None,
        }
    }

    /// Attaches the sink that receives the graph when `config.artifacts` is on.
    #[must_use]
    pub fn with_artifact_sink(mut self, sink: impl ArtifactSink + 'static) -> Self {
        self.artifact_sink = Some(Box::new(sink));
        self
    }

    /// Registers a type or extension descriptor.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDefined` if a different descriptor already uses the name.
    pub fn register(&self, def: impl Into<Rc<TypeDef>>) -> Result<()> {
        self.resolver.register(def.into())
    }

    /// Registers several descriptors, stopping at the first conflict.
    pub fn register_all<I, D>(&self, defs: I) -> Result<()>
    where
        I: IntoIterator<Item = D>,
        D: Into<Rc<TypeDef>>,
    {
        defs.into_iter().try_for_each(|def| self.register(def))
    }

    /// Adds a type that is already built.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDefined` if the name is taken.
    pub fn add_predefined(&self, ty: impl Into<Rc<NamedType>>) -> Result<()> {
        self.resolver.add_predefined(ty.into())
    }

    /// The resolver backing this builder.
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Resolves every registered name and validates the result.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; no partial graph is produced.
    pub fn finalize(self) -> Result<TypeGraph> {
        let resolver = &self.resolver;
        debug!(
            count = resolver.registered_names().len(),
            "Starting type graph build"
        );

        let mut validated: HashSet<String> = HashSet::new();
        loop {
            let mut progressed = false;
            for name in resolver.registered_names() {
                if validated.contains(&name) {
                    continue;
                }
                let resolved = resolver.resolve(&name);
                resolver.clear_in_progress();
                let ty = resolved?;
                validate(resolver, &ty)?;
                validated.insert(name);
                progressed = true;
            }
            // forcing deferred sets may register inline descriptors
            if !progressed {
                break;
            }
        }

        check_extensions(resolver)?;

        let graph = TypeGraph {
            types: resolver.resolved_types(),
            resolver: self.resolver,
        };
        debug!(count = graph.len(), "Type graph build complete");

        if graph.resolver.config().artifacts
            && let Some(sink) = &self.artifact_sink
        {
            debug!("Writing type graph artifacts");
            sink.write(&graph).map_err(BuildError::Artifact)?;
        }

        Ok(graph)
    }
}

/// Forces every deferred computation of `ty` once.
fn validate(resolver: &TypeResolver, ty: &NamedType) -> Result<()> {
    trace!(type_name = %ty.name(), "Validating type");
    match ty {
        NamedType::Object(object) => {
            object.interfaces(resolver)?;
            object.fields(resolver)?;
        }
        NamedType::Interface(interface) => {
            interface.fields(resolver)?;
        }
        NamedType::Union(union) => {
            union.members(resolver)?;
        }
        NamedType::InputObject(input) => {
            input.fields(resolver)?;
        }
        NamedType::Enum(_) | NamedType::Scalar(_) => {}
    }
    Ok(())
}

fn check_extensions(resolver: &TypeResolver) -> Result<()> {
    for target in resolver.extension_targets() {
        let resolved = resolver.resolve(&target);
        resolver.clear_in_progress();
        match resolved {
            Ok(ty) => match &*ty {
                NamedType::Object(_) | NamedType::Interface(_) | NamedType::InputObject(_) => {}
                NamedType::Union(_) | NamedType::Enum(_) | NamedType::Scalar(_) => {
                    return Err(BuildError::type_mismatch(
                        target,
                        "an object, interface or input object type",
                        ty.kind(),
                    ));
                }
            },
            Err(err @ BuildError::MissingType { .. }) => match resolver.config().dangling_extensions
            {
                DanglingExtensionPolicy::Error => return Err(err),
                DanglingExtensionPolicy::Warn => {
                    warn!(target_type = %target, "Dropping extension of unknown type");
                }
            },
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// The finalized type graph.
pub struct TypeGraph {
    types: IndexMap<String, Rc<NamedType>>,
    resolver: TypeResolver,
}

impl TypeGraph {
    /// The type named `name`; builtin scalars included.
    pub fn get(&self, name: &str) -> Option<Rc<NamedType>> {
        self.types
            .get(name)
            .cloned()
            .or_else(|| self.resolver.builtin(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered types, in resolution order. Builtins are not listed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rc<NamedType>)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The resolver that deferred computations are forced against.
    ///
    /// Only resolution and read-only queries are public; a finalized graph
    /// takes no further descriptors.
    ///
    /// ```compile_fail
    /// use std::rc::Rc;
    /// use graphweave_core::{BuilderConfig, FieldDef, SchemaBuilder, TypeDef};
    ///
    /// let graph = SchemaBuilder::new(BuilderConfig::default()).finalize().unwrap();
    /// graph
    ///     .resolver()
    ///     .register(Rc::new(TypeDef::extend("Query", |t| {
    ///         t.field(FieldDef::new("ghost", "Nope"));
    ///     })))
    ///     .unwrap();
    /// ```
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// Output fields of the object or interface named `name`.
    ///
    /// # Errors
    ///
    /// `MissingType` for unknown names, `TypeMismatch` for other kinds.
    pub fn fields(&self, name: &str) -> Result<FieldMap> {
        let ty = self.resolver.resolve(name)?;
        ty.output_fields(&self.resolver).unwrap_or_else(|| {
            Err(BuildError::type_mismatch(
                name,
                "an object or interface",
                ty.kind(),
            ))
        })
    }
}

impl fmt::Debug for TypeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeGraph")
            .field("types", &self.types.values().collect::<Vec<_>>())
            .finish()
    }
}
