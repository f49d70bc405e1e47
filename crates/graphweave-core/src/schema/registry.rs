//! Descriptor store and lazy resolver.
//!
//! [`TypeResolver`] owns all mutable registry state of one build: pending
//! descriptors, finalized types, predefined types, extensions and the
//! in-progress set used to detect circular resolution. Other components only
//! see `register` / `resolve` and read-only queries.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::config::BuilderConfig;
use crate::descriptor::{TypeDef, TypeDefKind, TypeSource};
use crate::error::BuildError;
use crate::suggest::suggest;
use crate::types::{NamedType, ScalarType};
use crate::Result;

/// Builtin scalar names with their descriptions.
pub const BUILTIN_SCALARS: [(&str, &str); 5] = [
    (
        "String",
        "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
    ),
    (
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values.",
    ),
    (
        "Float",
        "The `Float` scalar type represents signed double-precision fractional values.",
    ),
    ("Boolean", "The `Boolean` scalar type represents `true` or `false`."),
    (
        "ID",
        "The `ID` scalar type represents a unique identifier.",
    ),
];

/// Checks if a name is one of the builtin scalars.
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.iter().any(|(builtin, _)| *builtin == name)
}

#[derive(Default)]
struct RegistryState {
    /// Descriptors awaiting (or done with) resolution.
    pending: IndexMap<String, Rc<TypeDef>>,
    /// Types resolved so far, in resolution order.
    finals: IndexMap<String, Rc<NamedType>>,
    /// Types supplied already built.
    predefined: IndexMap<String, Rc<NamedType>>,
    /// Extension descriptors per target name, in registration order.
    extensions: IndexMap<String, Vec<Rc<TypeDef>>>,
    /// Names currently being resolved, outermost first.
    in_progress: IndexSet<String>,
}

/// Registry state plus the lazy resolver of one build.
pub struct TypeResolver {
    config: BuilderConfig,
    builtins: IndexMap<&'static str, Rc<NamedType>>,
    state: RefCell<RegistryState>,
}

impl TypeResolver {
    /// Creates an empty registry.
    pub fn new(config: BuilderConfig) -> Self {
        let builtins = BUILTIN_SCALARS
            .iter()
            .map(|(name, description)| {
                (
                    *name,
                    Rc::new(NamedType::Scalar(ScalarType::builtin(name, description))),
                )
            })
            .collect();

        Self {
            config,
            builtins,
            state: RefCell::new(RegistryState::default()),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Registers a descriptor.
    ///
    /// Extensions always succeed. Registering the same `Rc` twice is a no-op;
    /// a different descriptor under a taken name fails with `AlreadyDefined`.
    pub(crate) fn register(&self, def: Rc<TypeDef>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let name = def.name().to_string();

        if def.kind() == TypeDefKind::Extend {
            trace!(target_type = %name, "Registering extension");
            state.extensions.entry(name).or_default().push(def);
            return Ok(());
        }

        if is_builtin_scalar(&name) || state.predefined.contains_key(&name) {
            return Err(BuildError::already_defined(name));
        }

        if let Some(existing) = state.pending.get(&name) {
            if Rc::ptr_eq(existing, &def) {
                return Ok(());
            }
            return Err(BuildError::already_defined(name));
        }

        trace!(type_name = %name, kind = %def.kind(), "Registering type");
        state.pending.insert(name, def);
        Ok(())
    }

    /// Adds a type that is already built. It is never rebuilt or replaced.
    pub(crate) fn add_predefined(&self, ty: Rc<NamedType>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let name = ty.name().to_string();

        if let Some(existing) = state.predefined.get(&name) {
            if Rc::ptr_eq(existing, &ty) {
                return Ok(());
            }
            return Err(BuildError::already_defined(name));
        }
        if is_builtin_scalar(&name) || state.pending.contains_key(&name) {
            return Err(BuildError::already_defined(name));
        }

        trace!(type_name = %name, kind = %ty.kind(), "Adding predefined type");
        state.predefined.insert(name.clone(), Rc::clone(&ty));
        state.finals.insert(name, ty);
        Ok(())
    }

    /// Resolves a name to its finalized type, building it on first request.
    ///
    /// # Errors
    ///
    /// `MissingType` when nothing is registered under `name`,
    /// `CircularDependency` when `name` is already being resolved, or any
    /// error raised while building the type.
    pub fn resolve(&self, name: &str) -> Result<Rc<NamedType>> {
        if let Some(builtin) = self.builtins.get(name) {
            return Ok(Rc::clone(builtin));
        }

        let def = {
            let mut state = self.state.borrow_mut();
            if let Some(ty) = state.finals.get(name) {
                return Ok(Rc::clone(ty));
            }
            if state.in_progress.contains(name) {
                let mut chain: Vec<String> = state.in_progress.iter().cloned().collect();
                chain.push(name.to_string());
                return Err(BuildError::CircularDependency { chain });
            }
            let pending = state.pending.get(name).cloned();
            let Some(def) = pending else {
                drop(state);
                return Err(BuildError::missing_type(name, self.suggestions_for(name)));
            };
            state.in_progress.insert(name.to_string());
            def
        };

        trace!(type_name = %name, kind = %def.kind(), "Building type");
        let built = self.build(&def);
        self.state.borrow_mut().in_progress.shift_remove(name);

        let ty = Rc::new(built?);
        self.state
            .borrow_mut()
            .finals
            .insert(name.to_string(), Rc::clone(&ty));
        Ok(ty)
    }

    /// Resolves a descriptor reference. Inline descriptors are registered
    /// first; an inline extension is not a type and is rejected.
    pub(crate) fn resolve_source(&self, source: &TypeSource) -> Result<Rc<NamedType>> {
        match source {
            TypeSource::Name(name) => self.resolve(name),
            TypeSource::Def(def) if def.kind() == TypeDefKind::Extend => Err(
                BuildError::type_mismatch(def.name(), "a type definition", TypeDefKind::Extend),
            ),
            TypeSource::Def(def) => {
                self.register(Rc::clone(def))?;
                self.resolve(def.name())
            }
        }
    }

    /// Resolves a reference that must name an interface.
    pub(crate) fn resolve_interface(&self, source: &TypeSource) -> Result<Rc<NamedType>> {
        let ty = self.resolve_source(source)?;
        if ty.kind() != TypeDefKind::Interface {
            return Err(BuildError::type_mismatch(
                ty.name(),
                "an interface",
                ty.kind(),
            ));
        }
        Ok(ty)
    }

    /// Resolves a reference that must name an object type.
    pub(crate) fn resolve_object(&self, source: &TypeSource) -> Result<Rc<NamedType>> {
        let ty = self.resolve_source(source)?;
        if ty.kind() != TypeDefKind::Object {
            return Err(BuildError::type_mismatch(
                ty.name(),
                "an object type",
                ty.kind(),
            ));
        }
        Ok(ty)
    }

    /// Extension descriptors registered for `name`.
    pub fn extensions_for(&self, name: &str) -> Vec<Rc<TypeDef>> {
        self.state
            .borrow()
            .extensions
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Names that have extensions registered.
    pub fn extension_targets(&self) -> Vec<String> {
        self.state.borrow().extensions.keys().cloned().collect()
    }

    /// Pending and predefined names, in registration order.
    pub fn registered_names(&self) -> Vec<String> {
        let state = self.state.borrow();
        state
            .predefined
            .keys()
            .chain(state.pending.keys())
            .cloned()
            .collect()
    }

    /// Whether `name` has been resolved.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.state.borrow().finals.contains_key(name)
    }

    /// Names currently being resolved, outermost first.
    pub fn in_progress(&self) -> Vec<String> {
        self.state.borrow().in_progress.iter().cloned().collect()
    }

    /// Finalized types, in resolution order.
    pub fn resolved_types(&self) -> IndexMap<String, Rc<NamedType>> {
        self.state.borrow().finals.clone()
    }

    /// The builtin scalar named `name`.
    pub fn builtin(&self, name: &str) -> Option<Rc<NamedType>> {
        self.builtins.get(name).cloned()
    }

    pub(crate) fn clear_in_progress(&self) {
        self.state.borrow_mut().in_progress.clear();
    }

    fn suggestions_for(&self, name: &str) -> Vec<String> {
        let state = self.state.borrow();
        let candidates: Vec<&str> = state
            .in_progress
            .iter()
            .chain(state.finals.keys())
            .chain(state.pending.keys())
            .map(String::as_str)
            .chain(self.builtins.keys().copied())
            .collect();
        suggest(
            name,
            candidates,
            self.config.suggestion_distance,
            self.config.max_suggestions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumValueDef, FieldDef, ScalarDef};

    fn resolver() -> TypeResolver {
        TypeResolver::new(BuilderConfig::default())
    }

    #[test]
    fn test_builtins_resolve_by_identity() {
        let r = resolver();
        let a = r.resolve("String").unwrap();
        let b = r.resolve("String").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(a.is_builtin());
        assert!(!r.is_resolved("String"));
    }

    #[test]
    fn test_register_same_reference_twice() {
        let r = resolver();
        let def = Rc::new(TypeDef::scalar("Date", ScalarDef::new()));
        r.register(Rc::clone(&def)).unwrap();
        r.register(Rc::clone(&def)).unwrap();
        assert_eq!(r.registered_names(), vec!["Date".to_string()]);
    }

    #[test]
    fn test_register_conflict() {
        let r = resolver();
        r.register(Rc::new(TypeDef::scalar("Date", ScalarDef::new())))
            .unwrap();
        let err = r
            .register(Rc::new(TypeDef::scalar("Date", ScalarDef::new())))
            .unwrap_err();
        assert_eq!(err, BuildError::AlreadyDefined("Date".into()));
    }

    #[test]
    fn test_register_builtin_name_conflicts() {
        let r = resolver();
        let err = r
            .register(Rc::new(TypeDef::scalar("Int", ScalarDef::new())))
            .unwrap_err();
        assert_eq!(err, BuildError::AlreadyDefined("Int".into()));
    }

    #[test]
    fn test_extensions_never_conflict() {
        let r = resolver();
        for _ in 0..2 {
            r.register(Rc::new(TypeDef::extend("Query", |t| {
                t.field(FieldDef::new("ok", "Boolean"));
            })))
            .unwrap();
        }
        assert_eq!(r.extensions_for("Query").len(), 2);
        assert_eq!(r.extension_targets(), vec!["Query".to_string()]);
        assert!(r.registered_names().is_empty());
    }

    #[test]
    fn test_inline_extension_is_not_a_type() {
        let r = resolver();
        let source = TypeSource::Def(Rc::new(TypeDef::extend("Query", |t| {
            t.field(FieldDef::new("ok", "Boolean"));
        })));
        for _ in 0..2 {
            let err = r.resolve_source(&source).unwrap_err();
            assert!(matches!(
                err,
                BuildError::TypeMismatch {
                    actual: TypeDefKind::Extend,
                    ..
                }
            ));
        }
        assert!(r.extension_targets().is_empty());
    }

    #[test]
    fn test_resolve_memoizes() {
        let r = resolver();
        r.register(Rc::new(TypeDef::enumeration(
            "Color",
            [EnumValueDef::new("RED")],
        )))
        .unwrap();
        let a = r.resolve("Color").unwrap();
        let b = r.resolve("Color").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(r.in_progress().is_empty());
    }

    #[test]
    fn test_missing_type_suggestions() {
        let r = resolver();
        r.register(Rc::new(TypeDef::scalar("Users", ScalarDef::new())))
            .unwrap();
        match r.resolve("User").unwrap_err() {
            BuildError::MissingType { name, suggestions } => {
                assert_eq!(name, "User");
                assert_eq!(suggestions, vec!["Users".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_predefined_blocks_descriptor() {
        let r = resolver();
        let date = Rc::new(NamedType::Scalar(ScalarType {
            name: "Date".into(),
            description: None,
            serialize: None,
            parse_value: None,
            specified_by: None,
            builtin: false,
        }));
        r.add_predefined(Rc::clone(&date)).unwrap();
        r.add_predefined(Rc::clone(&date)).unwrap();
        let err = r
            .register(Rc::new(TypeDef::scalar("Date", ScalarDef::new())))
            .unwrap_err();
        assert_eq!(err, BuildError::AlreadyDefined("Date".into()));
        assert!(Rc::ptr_eq(&r.resolve("Date").unwrap(), &date));
    }
}
