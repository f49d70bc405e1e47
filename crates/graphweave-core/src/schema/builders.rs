//! Kind-specific construction of named types.
//!
//! Definition callbacks run once, synchronously, when a type is built.
//! Composite kinds hand back field, interface and member sets as thunks so
//! their references are only followed when a consumer asks for them. The
//! only names resolved eagerly are an interface's parent interfaces, which
//! is what turns an inheritance cycle into a `CircularDependency`.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use super::fields::{self, FieldOwner};
use super::inherit;
use super::TypeResolver;
use crate::descriptor::{
    EnumValueDef, InputObjectDefinition, InterfaceDefinition, ObjectDefinition, ScalarDef,
    TypeDef, TypeDefKind, TypeDefSpec, UnionDefinition,
};
use crate::error::BuildError;
use crate::types::{
    EnumType, EnumValue, FieldMap, InputFieldMap, InputObjectType, InterfaceType, NamedType,
    ObjectType, ScalarType, Thunk, UnionType,
};
use crate::Result;

impl TypeResolver {
    /// Dispatches a descriptor to the builder for its kind.
    pub(crate) fn build(&self, def: &TypeDef) -> Result<NamedType> {
        match def.spec() {
            TypeDefSpec::Object(define) => {
                let mut block = ObjectDefinition::default();
                define(&mut block);
                Ok(build_object(def, block))
            }
            TypeDefSpec::Interface(define) => {
                let mut block = InterfaceDefinition::default();
                define(&mut block);
                self.build_interface(def, block)
            }
            TypeDefSpec::Union(define) => {
                let mut block = UnionDefinition::default();
                define(&mut block);
                build_union(def, block)
            }
            TypeDefSpec::Enum(values) => Ok(build_enum(def, values)),
            TypeDefSpec::Scalar(scalar) => Ok(build_scalar(def, scalar)),
            TypeDefSpec::InputObject(define) => {
                let mut block = InputObjectDefinition::default();
                define(&mut block);
                Ok(build_input_object(def, block))
            }
            TypeDefSpec::Extend(_) => Err(BuildError::type_mismatch(
                def.name(),
                "a named type definition",
                TypeDefKind::Extend,
            )),
        }
    }

    fn build_interface(&self, def: &TypeDef, block: InterfaceDefinition) -> Result<NamedType> {
        let InterfaceDefinition {
            fields: declared,
            interfaces,
            resolve_type,
        } = block;

        let Some(resolve_type) = resolve_type else {
            return Err(BuildError::MissingResolveType(def.name().to_string()));
        };

        let parents = interfaces
            .iter()
            .map(|parent| self.resolve_interface(parent))
            .collect::<Result<Vec<_>>>()?;

        let owner = FieldOwner {
            type_name: def.name().to_string(),
            nullability: def.nullability(),
            default_resolver: None,
        };
        let inherited = parents.clone();
        let field_thunk = Thunk::new(move |resolver| {
            trace!(type_name = %owner.type_name, "Computing interface fields");
            let mut map = FieldMap::new();
            for parent in &inherited {
                inherit::merge_interface_fields(resolver, parent, &mut map)?;
            }
            for field in &declared {
                let compiled = fields::compile_output_field(resolver, &owner, field)?;
                map.insert(compiled.name.clone(), compiled);
            }
            Ok(map)
        });

        Ok(NamedType::Interface(InterfaceType {
            name: def.name().to_string(),
            description: def.description().map(str::to_string),
            nullability: def.nullability(),
            resolve_type,
            interfaces: parents,
            fields: field_thunk,
        }))
    }
}

fn build_object(def: &TypeDef, block: ObjectDefinition) -> NamedType {
    let ObjectDefinition {
        fields: declared,
        interfaces,
        modifications,
        default_resolver,
    } = block;

    let owner = FieldOwner {
        type_name: def.name().to_string(),
        nullability: def.nullability(),
        default_resolver: default_resolver.clone(),
    };
    let interfaces = Rc::new(interfaces);

    let field_interfaces = Rc::clone(&interfaces);
    let field_thunk = Thunk::new(move |resolver| {
        trace!(type_name = %owner.type_name, "Computing object fields");
        let mut map = FieldMap::new();
        for interface in field_interfaces.iter() {
            let interface = resolver.resolve_interface(interface)?;
            inherit::merge_interface_fields(resolver, &interface, &mut map)?;
        }
        inherit::apply_modifications(resolver, &owner, &modifications, &mut map)?;
        for field in &declared {
            let compiled = fields::compile_output_field(resolver, &owner, field)?;
            map.insert(compiled.name.clone(), compiled);
        }
        Ok(map)
    });

    let interface_thunk = Thunk::new(move |resolver| {
        interfaces
            .iter()
            .map(|interface| resolver.resolve_interface(interface))
            .collect()
    });

    NamedType::Object(ObjectType {
        name: def.name().to_string(),
        description: def.description().map(str::to_string),
        nullability: def.nullability(),
        default_resolver,
        interfaces: interface_thunk,
        fields: field_thunk,
    })
}

fn build_union(def: &TypeDef, block: UnionDefinition) -> Result<NamedType> {
    let UnionDefinition {
        members,
        resolve_type,
    } = block;

    let Some(resolve_type) = resolve_type else {
        return Err(BuildError::MissingResolveType(def.name().to_string()));
    };

    let union_name = def.name().to_string();
    let member_thunk = Thunk::new(move |resolver| {
        trace!(type_name = %union_name, "Computing union members");
        let mut resolved: Vec<Rc<NamedType>> = Vec::with_capacity(members.len());
        for member in &members {
            let member = resolver.resolve_object(member)?;
            if !resolved.iter().any(|seen| seen.name() == member.name()) {
                resolved.push(member);
            }
        }
        if resolved.is_empty() {
            return Err(BuildError::EmptyUnion(union_name.clone()));
        }
        Ok(resolved)
    });

    Ok(NamedType::Union(UnionType {
        name: def.name().to_string(),
        description: def.description().map(str::to_string),
        resolve_type,
        members: member_thunk,
    }))
}

fn build_enum(def: &TypeDef, values: &[EnumValueDef]) -> NamedType {
    let values: IndexMap<String, EnumValue> = values
        .iter()
        .map(|value| {
            (
                value.name.clone(),
                EnumValue {
                    name: value.name.clone(),
                    value: value.value.clone(),
                    description: value.description.clone(),
                    deprecation_reason: value.deprecation.clone(),
                },
            )
        })
        .collect();

    NamedType::Enum(EnumType {
        name: def.name().to_string(),
        description: def.description().map(str::to_string),
        values,
    })
}

fn build_scalar(def: &TypeDef, scalar: &ScalarDef) -> NamedType {
    NamedType::Scalar(ScalarType {
        name: def.name().to_string(),
        description: def.description().map(str::to_string),
        serialize: scalar.serialize.clone(),
        parse_value: scalar.parse_value.clone(),
        specified_by: scalar.specified_by.clone(),
        builtin: false,
    })
}

fn build_input_object(def: &TypeDef, block: InputObjectDefinition) -> NamedType {
    let InputObjectDefinition { fields: declared } = block;

    let owner = FieldOwner {
        type_name: def.name().to_string(),
        nullability: def.nullability(),
        default_resolver: None,
    };
    let field_thunk = Thunk::new(move |resolver| {
        trace!(type_name = %owner.type_name, "Computing input fields");
        let mut map = InputFieldMap::new();
        for field in &declared {
            let compiled = fields::compile_input_value(resolver, &owner, &field.name, field)?;
            map.insert(compiled.name.clone(), compiled);
        }
        Ok(map)
    });

    NamedType::InputObject(InputObjectType {
        name: def.name().to_string(),
        description: def.description().map(str::to_string),
        nullability: def.nullability(),
        fields: field_thunk,
    })
}
