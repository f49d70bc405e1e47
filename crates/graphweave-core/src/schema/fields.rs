//! Field and argument compilation.
//!
//! Turns field, argument and input field descriptors into wrapped, resolved
//! entries. Every referenced type name goes back through the resolver, so
//! compilation is where forward references are followed.

use std::rc::Rc;

use tracing::trace;

use super::wrapping::{self, Position};
use super::TypeResolver;
use crate::config::NullabilityConfig;
use crate::descriptor::{FieldDef, FieldResolveFn, InputValueDef, ListSpec, TypeSource};
use crate::error::BuildError;
use crate::types::{InputFieldMap, InputValue, NamedType, OutputField, TypeRef};
use crate::Result;

/// The type a field is compiled on behalf of.
#[derive(Clone)]
pub(crate) struct FieldOwner {
    pub type_name: String,
    pub nullability: NullabilityConfig,
    pub default_resolver: Option<FieldResolveFn>,
}

/// Type reference plus wrapping flags, shared by every compiled position.
pub(crate) struct WrapRequest<'a> {
    pub ty: &'a TypeSource,
    pub list: Option<&'a ListSpec>,
    pub nullable: Option<bool>,
    pub required: Option<bool>,
}

impl TypeResolver {
    /// Resolves a type usable as a field result.
    pub(crate) fn resolve_output(&self, source: &TypeSource) -> Result<Rc<NamedType>> {
        let ty = self.resolve_source(source)?;
        if !ty.kind().is_output() {
            return Err(BuildError::type_mismatch(
                ty.name(),
                "an output type",
                ty.kind(),
            ));
        }
        Ok(ty)
    }

    /// Resolves a type usable as an argument or input field.
    pub(crate) fn resolve_input(&self, source: &TypeSource) -> Result<Rc<NamedType>> {
        let ty = self.resolve_source(source)?;
        if !ty.kind().is_input() {
            return Err(BuildError::type_mismatch(
                ty.name(),
                "an input type",
                ty.kind(),
            ));
        }
        Ok(ty)
    }

    /// Resolves and wraps one position.
    pub(crate) fn wrap_position(
        &self,
        owner: &FieldOwner,
        field_name: &str,
        request: WrapRequest<'_>,
        position: Position,
    ) -> Result<TypeRef> {
        let non_null = wrapping::resolve_non_null(
            request.nullable,
            request.required,
            &owner.nullability,
            &self.config().nullability,
            position,
        )
        .map_err(|_| BuildError::conflicting_nullability(&owner.type_name, field_name))?;

        let base = match position {
            Position::Output => self.resolve_output(request.ty)?,
            Position::Input => self.resolve_input(request.ty)?,
        };
        Ok(wrapping::wrap(base, request.list, non_null))
    }
}

/// Compiles an output field declared on (or extending) `owner`.
pub(crate) fn compile_output_field(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    def: &FieldDef,
) -> Result<OutputField> {
    let Some(ty) = &def.ty else {
        return Err(BuildError::missing_field_type(&owner.type_name, &def.name));
    };

    trace!(type_name = %owner.type_name, field = %def.name, "Compiling output field");

    let ty = resolver.wrap_position(
        owner,
        &def.name,
        WrapRequest {
            ty,
            list: def.list.as_ref(),
            nullable: def.nullable,
            required: def.required,
        },
        Position::Output,
    )?;
    let args = compile_args(resolver, owner, &def.name, def.args.values())?;

    Ok(OutputField {
        name: def.name.clone(),
        ty,
        args,
        resolver: def
            .resolver
            .clone()
            .or_else(|| owner.default_resolver.clone()),
        description: def.description.clone(),
        deprecation_reason: def.deprecation.clone(),
    })
}

/// Compiles field arguments, keyed by argument name.
pub(crate) fn compile_args<'a>(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    field_name: &str,
    args: impl IntoIterator<Item = &'a InputValueDef>,
) -> Result<InputFieldMap> {
    let mut compiled = InputFieldMap::new();
    for arg in args {
        let label = format!("{field_name}({})", arg.name);
        let value = compile_input_value(resolver, owner, &label, arg)?;
        compiled.insert(arg.name.clone(), value);
    }
    Ok(compiled)
}

/// Compiles an argument or input object field. `label` names the position
/// in errors.
pub(crate) fn compile_input_value(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    label: &str,
    def: &InputValueDef,
) -> Result<InputValue> {
    let ty = resolver.wrap_position(
        owner,
        label,
        WrapRequest {
            ty: &def.ty,
            list: def.list.as_ref(),
            nullable: def.nullable,
            required: def.required,
        },
        Position::Input,
    )?;

    Ok(InputValue {
        name: def.name.clone(),
        ty,
        default_value: def.default_value.clone(),
        description: def.description.clone(),
    })
}

/// Compiles an extension field declared against an input object.
pub(crate) fn compile_input_field_from_output(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    def: &FieldDef,
) -> Result<InputValue> {
    let Some(ty) = &def.ty else {
        return Err(BuildError::missing_field_type(&owner.type_name, &def.name));
    };

    let ty = resolver.wrap_position(
        owner,
        &def.name,
        WrapRequest {
            ty,
            list: def.list.as_ref(),
            nullable: def.nullable,
            required: def.required,
        },
        Position::Input,
    )?;

    Ok(InputValue {
        name: def.name.clone(),
        ty,
        default_value: None,
        description: def.description.clone(),
    })
}
