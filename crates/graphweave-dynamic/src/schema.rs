//! Dynamic schema generation.
//!
//! Walks a finalized [`TypeGraph`], forces every deferred field and member
//! set, and registers the result with async-graphql's dynamic schema
//! builder. Builtin scalars are provided by async-graphql and are not
//! registered again.

use std::rc::Rc;
use std::sync::Arc;

use async_graphql::dynamic::{
    Enum, EnumItem, InputObject, InputValue, Interface, InterfaceField, Object, Scalar, Schema,
    SchemaBuilder as DynSchemaBuilder, Union,
};
use graphweave_core::{
    EnumType, InputFieldMap, InputObjectType, InterfaceType, NamedType, ObjectType, ScalarType,
    TypeGraph, TypeResolver, UnionType,
};
use tracing::{debug, trace};

use crate::config::DynamicSchemaConfig;
use crate::convert::{graphql_value_to_json, json_to_graphql_value, to_dynamic_type_ref};
use crate::error::DynamicSchemaError;
use crate::resolve::{ArgumentShapes, InputObjectShapes, InputShape, OutputShape, output_field};

type Result<T> = std::result::Result<T, DynamicSchemaError>;

/// Builds an executable async-graphql schema from a finalized type graph.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, forcing a deferred
/// computation fails, or async-graphql rejects the schema (e.g. the query
/// root is missing).
pub fn into_dynamic_schema(graph: &TypeGraph, config: &DynamicSchemaConfig) -> Result<Schema> {
    config
        .validate()
        .map_err(DynamicSchemaError::InvalidConfig)?;

    debug!(count = graph.len(), query = %config.query, "Starting dynamic schema build");

    let resolver = graph.resolver();
    let inputs = Arc::new(input_object_shapes(graph)?);
    let mut builder = Schema::build(&config.query, config.mutation.as_deref(), None);

    for (name, ty) in graph.iter() {
        if ty.is_builtin() {
            continue;
        }
        trace!(type_name = %name, kind = %ty.kind(), "Registering dynamic type");
        builder = register(builder, resolver, &inputs, ty)?;
    }

    if let Some(max_depth) = config.max_depth {
        builder = builder.limit_depth(max_depth);
    }
    if let Some(max_complexity) = config.max_complexity {
        builder = builder.limit_complexity(max_complexity);
    }
    if !config.introspection {
        builder = builder.disable_introspection();
    }

    let schema = builder
        .finish()
        .map_err(|e| DynamicSchemaError::SchemaBuildFailed(e.to_string()))?;

    debug!("Dynamic schema build complete");
    Ok(schema)
}

fn register(
    builder: DynSchemaBuilder,
    resolver: &TypeResolver,
    inputs: &Arc<InputObjectShapes>,
    ty: &NamedType,
) -> Result<DynSchemaBuilder> {
    Ok(match ty {
        NamedType::Object(object) => builder.register(object_type(resolver, inputs, object)?),
        NamedType::Interface(interface) => {
            builder.register(interface_type(resolver, interface)?)
        }
        NamedType::Union(union) => builder.register(union_type(resolver, union)?),
        NamedType::Enum(enumeration) => builder.register(enum_type(enumeration)),
        NamedType::Scalar(scalar) => builder.register(scalar_type(scalar)),
        NamedType::InputObject(input) => builder.register(input_object_type(resolver, input)?),
    })
}

/// Collects how each input object's fields are converted before they reach
/// resolvers.
fn input_object_shapes(graph: &TypeGraph) -> Result<InputObjectShapes> {
    let mut shapes = InputObjectShapes::new();
    for (name, ty) in graph.iter() {
        if let NamedType::InputObject(input) = &**ty {
            let fields = input
                .fields(graph.resolver())?
                .iter()
                .map(|(field, value)| (field.clone(), InputShape::of(&value.ty)))
                .collect();
            shapes.insert(name.to_string(), fields);
        }
    }
    Ok(shapes)
}

fn object_type(
    resolver: &TypeResolver,
    inputs: &Arc<InputObjectShapes>,
    object: &ObjectType,
) -> Result<Object> {
    let mut dyn_object = Object::new(object.name());
    if let Some(description) = object.description() {
        dyn_object = dyn_object.description(description);
    }

    for interface in transitive_interfaces(&object.interfaces(resolver)?) {
        dyn_object = dyn_object.implement(interface);
    }

    for (name, field) in object.fields(resolver)? {
        let mut dyn_field = output_field(
            &name,
            to_dynamic_type_ref(&field.ty),
            field.resolver.clone(),
            ArgumentShapes::new(&field.args, Arc::clone(inputs)),
            OutputShape::of(&field.ty),
        );
        for arg in arguments(&field.args) {
            dyn_field = dyn_field.argument(arg);
        }
        if let Some(description) = &field.description {
            dyn_field = dyn_field.description(description);
        }
        if let Some(reason) = &field.deprecation_reason {
            dyn_field = dyn_field.deprecation(Some(reason.as_str()));
        }
        dyn_object = dyn_object.field(dyn_field);
    }

    Ok(dyn_object)
}

fn interface_type(resolver: &TypeResolver, interface: &InterfaceType) -> Result<Interface> {
    let mut dyn_interface = Interface::new(interface.name());
    if let Some(description) = interface.description() {
        dyn_interface = dyn_interface.description(description);
    }

    for parent in transitive_interfaces(interface.interfaces()) {
        dyn_interface = dyn_interface.implement(parent);
    }

    for (name, field) in interface.fields(resolver)? {
        let mut dyn_field = InterfaceField::new(name, to_dynamic_type_ref(&field.ty));
        for arg in arguments(&field.args) {
            dyn_field = dyn_field.argument(arg);
        }
        if let Some(description) = &field.description {
            dyn_field = dyn_field.description(description);
        }
        if let Some(reason) = &field.deprecation_reason {
            dyn_field = dyn_field.deprecation(Some(reason.as_str()));
        }
        dyn_interface = dyn_interface.field(dyn_field);
    }

    Ok(dyn_interface)
}

fn union_type(resolver: &TypeResolver, union: &UnionType) -> Result<Union> {
    let mut dyn_union = Union::new(union.name());
    if let Some(description) = union.description() {
        dyn_union = dyn_union.description(description);
    }
    for member in union.members(resolver)? {
        dyn_union = dyn_union.possible_type(member.name());
    }
    Ok(dyn_union)
}

fn enum_type(enumeration: &EnumType) -> Enum {
    let mut dyn_enum = Enum::new(&enumeration.name);
    if let Some(description) = &enumeration.description {
        dyn_enum = dyn_enum.description(description);
    }
    for value in enumeration.values.values() {
        let mut item = EnumItem::new(&value.name);
        if let Some(description) = &value.description {
            item = item.description(description);
        }
        if let Some(reason) = &value.deprecation_reason {
            item = item.deprecation(Some(reason.as_str()));
        }
        dyn_enum = dyn_enum.item(item);
    }
    dyn_enum
}

fn scalar_type(scalar: &ScalarType) -> Scalar {
    let mut dyn_scalar = Scalar::new(&scalar.name);
    if let Some(description) = &scalar.description {
        dyn_scalar = dyn_scalar.description(description);
    }
    if let Some(url) = &scalar.specified_by {
        dyn_scalar = dyn_scalar.specified_by_url(url);
    }
    if let Some(parse) = scalar.parse_value.clone() {
        dyn_scalar = dyn_scalar.validator(move |value| parse(&graphql_value_to_json(value)).is_ok());
    }
    dyn_scalar
}

fn input_object_type(resolver: &TypeResolver, input: &InputObjectType) -> Result<InputObject> {
    let mut dyn_input = InputObject::new(input.name());
    if let Some(description) = input.description() {
        dyn_input = dyn_input.description(description);
    }
    for field in arguments(&input.fields(resolver)?) {
        dyn_input = dyn_input.field(field);
    }
    Ok(dyn_input)
}

fn arguments(args: &InputFieldMap) -> Vec<InputValue> {
    args.values()
        .map(|arg| {
            let mut value = InputValue::new(&arg.name, to_dynamic_type_ref(&arg.ty));
            if let Some(default) = &arg.default_value {
                value = value.default_value(json_to_graphql_value(default));
            }
            if let Some(description) = &arg.description {
                value = value.description(description);
            }
            value
        })
        .collect()
}

/// Interface names in declaration order, followed by their ancestors.
fn transitive_interfaces(interfaces: &[Rc<NamedType>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut queue: Vec<Rc<NamedType>> = interfaces.to_vec();
    let mut index = 0;
    while let Some(interface) = queue.get(index).cloned() {
        index += 1;
        if names.iter().any(|name| name == interface.name()) {
            continue;
        }
        names.push(interface.name().to_string());
        if let NamedType::Interface(inner) = &*interface {
            queue.extend(inner.interfaces().iter().cloned());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use graphweave_core::{BuilderConfig, FieldDef, SchemaBuilder, TypeDef};

    use super::*;

    #[test]
    fn test_transitive_interfaces_follow_parents() {
        let builder = SchemaBuilder::new(BuilderConfig::default());
        builder
            .register(TypeDef::interface("Node", |t| {
                t.field(FieldDef::new("id", "ID"));
                t.resolve_type(|_| None);
            }))
            .unwrap();
        builder
            .register(TypeDef::interface("Entity", |t| {
                t.implements("Node");
                t.resolve_type(|_| None);
            }))
            .unwrap();
        let graph = builder.finalize().unwrap();

        let entity = graph.get("Entity").unwrap();
        let names = transitive_interfaces(&[entity, graph.get("Node").unwrap()]);
        assert_eq!(names, vec!["Entity".to_string(), "Node".to_string()]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let graph = SchemaBuilder::new(BuilderConfig::default())
            .finalize()
            .unwrap();
        let config = DynamicSchemaConfig {
            max_depth: Some(0),
            ..DynamicSchemaConfig::default()
        };
        let err = into_dynamic_schema(&graph, &config).err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
