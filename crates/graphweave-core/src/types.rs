//! Finalized named types.
//!
//! A [`NamedType`] is created exactly once per name and cached by the
//! resolver. Field, interface and member sets of the composite kinds are not
//! stored on the type: they are [`Thunk`]s, repeatable deferred computations
//! that a consumer forces against the [`TypeResolver`] whenever it needs
//! them. Forcing twice yields structurally equal results, which is what makes
//! mutually recursive object, interface and union types safe to build.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::Result;
use crate::config::NullabilityConfig;
use crate::descriptor::{FieldResolveFn, ScalarFn, TypeDefKind, TypeResolveFn};
use crate::schema::extensions;
use crate::schema::fields::FieldOwner;
use crate::schema::TypeResolver;

/// Output fields keyed by name, in declaration order.
pub type FieldMap = IndexMap<String, OutputField>;

/// Input fields or arguments keyed by name, in declaration order.
pub type InputFieldMap = IndexMap<String, InputValue>;

/// A repeatable deferred computation.
pub struct Thunk<T>(Rc<dyn Fn(&TypeResolver) -> Result<T>>);

impl<T> Thunk<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&TypeResolver) -> Result<T> + 'static,
    {
        Self(Rc::new(f))
    }

    /// Runs the computation.
    pub fn force(&self, resolver: &TypeResolver) -> Result<T> {
        (self.0)(resolver)
    }
}

impl<T: Clone + 'static> Thunk<T> {
    /// A computation that always yields `value`.
    pub fn ready(value: T) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }
}

impl<T> Clone for Thunk<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

/// A named type wrapped in list and non-null modifiers.
#[derive(Clone)]
pub enum TypeRef {
    Named(Rc<NamedType>),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(ty: Rc<NamedType>) -> Self {
        Self::Named(ty)
    }

    /// Wraps in non-null unless already non-null.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Drops an outer non-null wrapper, if any.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// The innermost named type.
    pub fn named_type(&self) -> &Rc<NamedType> {
        match self {
            Self::Named(ty) => ty,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(ty) => f.write_str(ty.name()),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({self})")
    }
}

/// An argument or input object field.
#[derive(Clone, Debug)]
pub struct InputValue {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

/// A compiled output field.
#[derive(Clone)]
pub struct OutputField {
    pub name: String,
    pub ty: TypeRef,
    pub args: InputFieldMap,
    /// `None` leaves field access to the execution engine's default.
    pub resolver: Option<FieldResolveFn>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

impl fmt::Debug for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputField")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("args", &self.args)
            .field("has_resolver", &self.resolver.is_some())
            .field("deprecation_reason", &self.deprecation_reason)
            .finish()
    }
}

/// A built object type.
pub struct ObjectType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) nullability: NullabilityConfig,
    pub(crate) default_resolver: Option<FieldResolveFn>,
    pub(crate) interfaces: Thunk<Vec<Rc<NamedType>>>,
    pub(crate) fields: Thunk<FieldMap>,
}

impl ObjectType {
    /// An object type supplied already built.
    pub fn new(name: impl Into<String>, fields: Thunk<FieldMap>) -> Self {
        Self {
            name: name.into(),
            description: None,
            nullability: NullabilityConfig::default(),
            default_resolver: None,
            interfaces: Thunk::ready(Vec::new()),
            fields,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Thunk<Vec<Rc<NamedType>>>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_resolver(&self) -> Option<&FieldResolveFn> {
        self.default_resolver.as_ref()
    }

    /// Own, inherited and extension fields.
    pub fn fields(&self, resolver: &TypeResolver) -> Result<FieldMap> {
        let mut fields = self.fields.force(resolver)?;
        extensions::apply_output(resolver, &self.owner(), &mut fields)?;
        Ok(fields)
    }

    /// Declared interfaces, in declaration order.
    pub fn interfaces(&self, resolver: &TypeResolver) -> Result<Vec<Rc<NamedType>>> {
        self.interfaces.force(resolver)
    }

    fn owner(&self) -> FieldOwner {
        FieldOwner {
            type_name: self.name.clone(),
            nullability: self.nullability,
            default_resolver: self.default_resolver.clone(),
        }
    }
}

/// A built interface type.
pub struct InterfaceType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) nullability: NullabilityConfig,
    pub(crate) resolve_type: TypeResolveFn,
    pub(crate) interfaces: Vec<Rc<NamedType>>,
    pub(crate) fields: Thunk<FieldMap>,
}

impl InterfaceType {
    /// An interface type supplied already built.
    pub fn new(name: impl Into<String>, resolve_type: TypeResolveFn, fields: Thunk<FieldMap>) -> Self {
        Self {
            name: name.into(),
            description: None,
            nullability: NullabilityConfig::default(),
            resolve_type,
            interfaces: Vec::new(),
            fields,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn resolve_type(&self) -> &TypeResolveFn {
        &self.resolve_type
    }

    /// Parent interfaces, resolved when the interface was built.
    pub fn interfaces(&self) -> &[Rc<NamedType>] {
        &self.interfaces
    }

    /// Own, inherited and extension fields.
    pub fn fields(&self, resolver: &TypeResolver) -> Result<FieldMap> {
        let mut fields = self.fields.force(resolver)?;
        let owner = FieldOwner {
            type_name: self.name.clone(),
            nullability: self.nullability,
            default_resolver: None,
        };
        extensions::apply_output(resolver, &owner, &mut fields)?;
        Ok(fields)
    }
}

/// A built union type.
pub struct UnionType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) resolve_type: TypeResolveFn,
    pub(crate) members: Thunk<Vec<Rc<NamedType>>>,
}

impl UnionType {
    /// A union type supplied already built.
    pub fn new(
        name: impl Into<String>,
        resolve_type: TypeResolveFn,
        members: Thunk<Vec<Rc<NamedType>>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            resolve_type,
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn resolve_type(&self) -> &TypeResolveFn {
        &self.resolve_type
    }

    /// Member object types, in declaration order.
    pub fn members(&self, resolver: &TypeResolver) -> Result<Vec<Rc<NamedType>>> {
        self.members.force(resolver)
    }
}

/// One value of a built enum.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub value: Value,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

/// A built enum type.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: IndexMap<String, EnumValue>,
}

/// A built scalar type.
#[derive(Clone)]
pub struct ScalarType {
    pub name: String,
    pub description: Option<String>,
    pub serialize: Option<ScalarFn>,
    pub parse_value: Option<ScalarFn>,
    pub specified_by: Option<String>,
    pub(crate) builtin: bool,
}

impl ScalarType {
    pub(crate) fn builtin(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            serialize: None,
            parse_value: None,
            specified_by: None,
            builtin: true,
        }
    }

    /// Whether this is one of `String`, `Int`, `Float`, `Boolean`, `ID`.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }
}

/// A built input object type.
pub struct InputObjectType {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) nullability: NullabilityConfig,
    pub(crate) fields: Thunk<InputFieldMap>,
}

impl InputObjectType {
    /// An input object type supplied already built.
    pub fn new(name: impl Into<String>, fields: Thunk<InputFieldMap>) -> Self {
        Self {
            name: name.into(),
            description: None,
            nullability: NullabilityConfig::default(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Own and extension fields.
    pub fn fields(&self, resolver: &TypeResolver) -> Result<InputFieldMap> {
        let mut fields = self.fields.force(resolver)?;
        let owner = FieldOwner {
            type_name: self.name.clone(),
            nullability: self.nullability,
            default_resolver: None,
        };
        extensions::apply_input(resolver, &owner, &mut fields)?;
        Ok(fields)
    }
}

/// A finalized, uniquely named node of the type graph.
pub enum NamedType {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(ScalarType),
    InputObject(InputObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(t) => &t.name,
            Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::Scalar(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object(t) => t.description.as_deref(),
            Self::Interface(t) => t.description.as_deref(),
            Self::Union(t) => t.description.as_deref(),
            Self::Enum(t) => t.description.as_deref(),
            Self::Scalar(t) => t.description.as_deref(),
            Self::InputObject(t) => t.description.as_deref(),
        }
    }

    pub fn kind(&self) -> TypeDefKind {
        match self {
            Self::Object(_) => TypeDefKind::Object,
            Self::Interface(_) => TypeDefKind::Interface,
            Self::Union(_) => TypeDefKind::Union,
            Self::Enum(_) => TypeDefKind::Enum,
            Self::Scalar(_) => TypeDefKind::Scalar,
            Self::InputObject(_) => TypeDefKind::InputObject,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Scalar(s) if s.builtin)
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceType> {
        match self {
            Self::Interface(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            Self::Union(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            Self::Scalar(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_input_object(&self) -> Option<&InputObjectType> {
        match self {
            Self::InputObject(t) => Some(t),
            _ => None,
        }
    }

    /// Output fields of an object or interface, `None` for other kinds.
    pub fn output_fields(&self, resolver: &TypeResolver) -> Option<Result<FieldMap>> {
        match self {
            Self::Object(t) => Some(t.fields(resolver)),
            Self::Interface(t) => Some(t.fields(resolver)),
            _ => None,
        }
    }
}

impl fmt::Debug for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(name: &str) -> Rc<NamedType> {
        Rc::new(NamedType::Scalar(ScalarType::builtin(name, "test")))
    }

    #[test]
    fn test_type_ref_display() {
        let ty = TypeRef::named(scalar("Int")).non_null().list().non_null();
        assert_eq!(ty.to_string(), "[Int!]!");
        assert!(ty.is_list());
        assert!(ty.is_non_null());
        assert_eq!(ty.named_type().name(), "Int");
    }

    #[test]
    fn test_non_null_is_idempotent() {
        let ty = TypeRef::named(scalar("ID")).non_null().non_null();
        assert_eq!(ty.to_string(), "ID!");
    }

    #[test]
    fn test_named_type_accessors() {
        let ty = scalar("String");
        assert!(ty.is_builtin());
        assert_eq!(ty.kind(), TypeDefKind::Scalar);
        assert!(ty.as_object().is_none());
        assert_eq!(format!("{ty:?}"), "scalar String");
    }

    #[test]
    fn test_ready_thunk_repeats() {
        let resolver = TypeResolver::new(Default::default());
        let thunk = Thunk::ready(vec![1, 2, 3]);
        assert_eq!(thunk.force(&resolver).unwrap(), vec![1, 2, 3]);
        assert_eq!(thunk.force(&resolver).unwrap(), vec![1, 2, 3]);
    }
}
