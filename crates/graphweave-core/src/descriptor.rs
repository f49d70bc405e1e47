//! Type descriptors.
//!
//! A descriptor is the unbuilt, declarative form of a named type. Object,
//! interface, union and input object descriptors carry a definition callback
//! that is invoked once, when the type is built, against a definition block
//! that collects fields, interfaces and members. Enum and scalar descriptors
//! carry their values directly. Extension descriptors collect their fields
//! immediately.
//!
//! Descriptors are shared as `Rc<TypeDef>`; registering the same `Rc` twice
//! is a no-op, registering a different descriptor under a taken name fails.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::NullabilityConfig;

/// Error returned by field resolvers.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Input handed to a field resolver.
#[derive(Debug, Clone, Copy)]
pub struct ResolveParams<'a> {
    /// The value of the parent object (`Null` at the root).
    pub parent: &'a Value,
    /// Field arguments, keyed by argument name.
    pub args: &'a Map<String, Value>,
}

/// Field resolver. Returns the field's value; `Null` for absent.
pub type FieldResolveFn =
    Arc<dyn Fn(ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync>;

/// Abstract-type resolver: picks the concrete object type name of a value.
pub type TypeResolveFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Scalar serialize / parse callback.
pub type ScalarFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// The kind of a descriptor or named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
    Extend,
}

impl TypeDefKind {
    /// Returns the GraphQL keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Scalar => "scalar",
            Self::InputObject => "input object",
            Self::Extend => "extension",
        }
    }

    /// Whether a value of this kind can be returned by a field.
    pub fn is_output(&self) -> bool {
        matches!(
            self,
            Self::Object | Self::Interface | Self::Union | Self::Enum | Self::Scalar
        )
    }

    /// Whether a value of this kind can be passed as an argument.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Enum | Self::Scalar | Self::InputObject)
    }
}

impl fmt::Display for TypeDefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nullability of the items at one list depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemNullability {
    Nullable,
    NonNull,
}

/// List wrapping of a field or argument type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSpec {
    /// One list level with non-null items.
    Single,
    /// One list level per entry, outermost first; each entry sets the
    /// nullability of the items at that depth.
    Depths(Vec<ItemNullability>),
}

impl ListSpec {
    /// Builds a nested spec from flags where `true` means the items at that
    /// depth are nullable.
    pub fn from_flags(flags: &[bool]) -> Self {
        Self::Depths(
            flags
                .iter()
                .map(|nullable| {
                    if *nullable {
                        ItemNullability::Nullable
                    } else {
                        ItemNullability::NonNull
                    }
                })
                .collect(),
        )
    }

    /// Number of list levels this spec applies.
    pub fn depth(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Depths(depths) => depths.len(),
        }
    }
}

/// A type reference in a descriptor: a name, or an inline descriptor.
#[derive(Clone)]
pub enum TypeSource {
    Name(String),
    Def(Rc<TypeDef>),
}

impl TypeSource {
    /// The referenced type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Def(def) => def.name(),
        }
    }
}

impl fmt::Debug for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "Name({name})"),
            Self::Def(def) => write!(f, "Def({})", def.name()),
        }
    }
}

impl From<&str> for TypeSource {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TypeSource {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Rc<TypeDef>> for TypeSource {
    fn from(def: Rc<TypeDef>) -> Self {
        Self::Def(def)
    }
}

impl From<&Rc<TypeDef>> for TypeSource {
    fn from(def: &Rc<TypeDef>) -> Self {
        Self::Def(Rc::clone(def))
    }
}

/// An argument or input object field.
#[derive(Clone, Debug)]
pub struct InputValueDef {
    pub(crate) name: String,
    pub(crate) ty: TypeSource,
    pub(crate) list: Option<ListSpec>,
    pub(crate) nullable: Option<bool>,
    pub(crate) required: Option<bool>,
    pub(crate) default_value: Option<Value>,
    pub(crate) description: Option<String>,
}

impl InputValueDef {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeSource>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            list: None,
            nullable: None,
            required: None,
            default_value: None,
            description: None,
        }
    }

    pub fn list(mut self, list: ListSpec) -> Self {
        self.list = Some(list);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An output field of an object, interface or extension.
#[derive(Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) ty: Option<TypeSource>,
    pub(crate) list: Option<ListSpec>,
    pub(crate) nullable: Option<bool>,
    pub(crate) required: Option<bool>,
    pub(crate) args: IndexMap<String, InputValueDef>,
    pub(crate) resolver: Option<FieldResolveFn>,
    pub(crate) description: Option<String>,
    pub(crate) deprecation: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeSource>) -> Self {
        let mut field = Self::untyped(name);
        field.ty = Some(ty.into());
        field
    }

    /// A field whose type has not been set yet.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            list: None,
            nullable: None,
            required: None,
            args: IndexMap::new(),
            resolver: None,
            description: None,
            deprecation: None,
        }
    }

    pub fn of_type(mut self, ty: impl Into<TypeSource>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn list(mut self, list: ListSpec) -> Self {
        self.list = Some(list);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn arg(mut self, arg: InputValueDef) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }

    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("list", &self.list)
            .field("args", &self.args.keys().collect::<Vec<_>>())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

/// Override of a field inherited from an interface.
///
/// With [`of_type`](Self::of_type) the field is rewrapped from scratch.
/// Without it, `list`, `nullable` and `required` rewrap the inherited named
/// type; setting only `nullable` or `required` keeps the inherited list
/// levels.
#[derive(Clone)]
pub struct FieldModification {
    pub(crate) field: String,
    pub(crate) ty: Option<TypeSource>,
    pub(crate) list: Option<ListSpec>,
    pub(crate) nullable: Option<bool>,
    pub(crate) required: Option<bool>,
    pub(crate) args: IndexMap<String, InputValueDef>,
    pub(crate) resolver: Option<FieldResolveFn>,
    pub(crate) description: Option<String>,
}

impl FieldModification {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ty: None,
            list: None,
            nullable: None,
            required: None,
            args: IndexMap::new(),
            resolver: None,
            description: None,
        }
    }

    pub fn of_type(mut self, ty: impl Into<TypeSource>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn list(mut self, list: ListSpec) -> Self {
        self.list = Some(list);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn arg(mut self, arg: InputValueDef) -> Self {
        self.args.insert(arg.name.clone(), arg);
        self
    }

    pub fn resolve<F>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One value of an enum descriptor.
#[derive(Clone, Debug)]
pub struct EnumValueDef {
    pub(crate) name: String,
    pub(crate) value: Value,
    pub(crate) description: Option<String>,
    pub(crate) deprecation: Option<String>,
}

impl EnumValueDef {
    /// A value whose internal representation is its own name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: Value::String(name.clone()),
            name,
            description: None,
            deprecation: None,
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }
}

/// Scalar callbacks, kept verbatim on the built type.
#[derive(Clone, Default)]
pub struct ScalarDef {
    pub(crate) serialize: Option<ScalarFn>,
    pub(crate) parse_value: Option<ScalarFn>,
    pub(crate) specified_by: Option<String>,
}

impl ScalarDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(f));
        self
    }

    pub fn parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(f));
        self
    }

    pub fn specified_by(mut self, url: impl Into<String>) -> Self {
        self.specified_by = Some(url.into());
        self
    }
}

/// Definition block for object types.
#[derive(Default)]
pub struct ObjectDefinition {
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) interfaces: Vec<TypeSource>,
    pub(crate) modifications: Vec<FieldModification>,
    pub(crate) default_resolver: Option<FieldResolveFn>,
}

impl ObjectDefinition {
    pub fn field(&mut self, field: FieldDef) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn implements(&mut self, interface: impl Into<TypeSource>) -> &mut Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn modify(&mut self, modification: FieldModification) -> &mut Self {
        self.modifications.push(modification);
        self
    }

    /// Resolver used by declared fields that do not set their own.
    pub fn default_resolver<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(ResolveParams<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        self.default_resolver = Some(Arc::new(resolver));
        self
    }
}

/// Definition block for interface types.
#[derive(Default)]
pub struct InterfaceDefinition {
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) interfaces: Vec<TypeSource>,
    pub(crate) resolve_type: Option<TypeResolveFn>,
}

impl InterfaceDefinition {
    pub fn field(&mut self, field: FieldDef) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn implements(&mut self, interface: impl Into<TypeSource>) -> &mut Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn resolve_type<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }
}

/// Definition block for union types.
#[derive(Default)]
pub struct UnionDefinition {
    pub(crate) members: Vec<TypeSource>,
    pub(crate) resolve_type: Option<TypeResolveFn>,
}

impl UnionDefinition {
    pub fn member(&mut self, member: impl Into<TypeSource>) -> &mut Self {
        self.members.push(member.into());
        self
    }

    pub fn members<I, S>(&mut self, members: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TypeSource>,
    {
        self.members.extend(members.into_iter().map(Into::into));
        self
    }

    pub fn resolve_type<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(resolver));
        self
    }
}

/// Definition block for input object types.
#[derive(Default)]
pub struct InputObjectDefinition {
    pub(crate) fields: Vec<InputValueDef>,
}

impl InputObjectDefinition {
    pub fn field(&mut self, field: InputValueDef) -> &mut Self {
        self.fields.push(field);
        self
    }
}

/// Definition block for extensions of an existing type.
#[derive(Default)]
pub struct ExtensionDefinition {
    pub(crate) fields: Vec<FieldDef>,
}

impl ExtensionDefinition {
    pub fn field(&mut self, field: FieldDef) -> &mut Self {
        self.fields.push(field);
        self
    }
}

pub(crate) type Definer<T> = Rc<dyn Fn(&mut T)>;

/// Kind-specific payload of a descriptor.
pub(crate) enum TypeDefSpec {
    Object(Definer<ObjectDefinition>),
    Interface(Definer<InterfaceDefinition>),
    Union(Definer<UnionDefinition>),
    Enum(Vec<EnumValueDef>),
    Scalar(ScalarDef),
    InputObject(Definer<InputObjectDefinition>),
    Extend(Vec<FieldDef>),
}

/// An unbuilt type descriptor.
pub struct TypeDef {
    name: String,
    description: Option<String>,
    nullability: NullabilityConfig,
    spec: TypeDefSpec,
}

impl TypeDef {
    fn with_spec(name: impl Into<String>, spec: TypeDefSpec) -> Self {
        Self {
            name: name.into(),
            description: None,
            nullability: NullabilityConfig::default(),
            spec,
        }
    }

    pub fn object<F>(name: impl Into<String>, definition: F) -> Self
    where
        F: Fn(&mut ObjectDefinition) + 'static,
    {
        Self::with_spec(name, TypeDefSpec::Object(Rc::new(definition)))
    }

    pub fn interface<F>(name: impl Into<String>, definition: F) -> Self
    where
        F: Fn(&mut InterfaceDefinition) + 'static,
    {
        Self::with_spec(name, TypeDefSpec::Interface(Rc::new(definition)))
    }

    pub fn union<F>(name: impl Into<String>, definition: F) -> Self
    where
        F: Fn(&mut UnionDefinition) + 'static,
    {
        Self::with_spec(name, TypeDefSpec::Union(Rc::new(definition)))
    }

    pub fn input_object<F>(name: impl Into<String>, definition: F) -> Self
    where
        F: Fn(&mut InputObjectDefinition) + 'static,
    {
        Self::with_spec(name, TypeDefSpec::InputObject(Rc::new(definition)))
    }

    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = EnumValueDef>,
    ) -> Self {
        Self::with_spec(name, TypeDefSpec::Enum(values.into_iter().collect()))
    }

    pub fn scalar(name: impl Into<String>, scalar: ScalarDef) -> Self {
        Self::with_spec(name, TypeDefSpec::Scalar(scalar))
    }

    /// Extra fields for the type named `target`. The definition runs
    /// immediately.
    pub fn extend<F>(target: impl Into<String>, definition: F) -> Self
    where
        F: FnOnce(&mut ExtensionDefinition),
    {
        let mut block = ExtensionDefinition::default();
        definition(&mut block);
        Self::with_spec(target, TypeDefSpec::Extend(block.fields))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Type-level non-null defaults, consulted before the builder's global ones.
    pub fn with_nullability(mut self, nullability: NullabilityConfig) -> Self {
        self.nullability = nullability;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn nullability(&self) -> NullabilityConfig {
        self.nullability
    }

    pub fn kind(&self) -> TypeDefKind {
        match &self.spec {
            TypeDefSpec::Object(_) => TypeDefKind::Object,
            TypeDefSpec::Interface(_) => TypeDefKind::Interface,
            TypeDefSpec::Union(_) => TypeDefKind::Union,
            TypeDefSpec::Enum(_) => TypeDefKind::Enum,
            TypeDefSpec::Scalar(_) => TypeDefKind::Scalar,
            TypeDefSpec::InputObject(_) => TypeDefKind::InputObject,
            TypeDefSpec::Extend(_) => TypeDefKind::Extend,
        }
    }

    pub(crate) fn spec(&self) -> &TypeDefSpec {
        &self.spec
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}
