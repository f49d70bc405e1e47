//! Interface inheritance.
//!
//! Object and interface field maps are seeded with the fields of every
//! implemented interface before their own fields are compiled on top.
//! Inherited fields keep the interface's type, arguments and resolver but
//! drop the deprecation reason. Field modifications then rewrite inherited
//! entries in place.

use std::rc::Rc;

use tracing::trace;

use super::fields::{self, FieldOwner, WrapRequest};
use super::wrapping::{self, Position};
use super::TypeResolver;
use crate::descriptor::FieldModification;
use crate::error::BuildError;
use crate::types::{FieldMap, NamedType, OutputField};
use crate::Result;

/// Adds the fields of `interface` to `fields`. Later interfaces overwrite
/// earlier ones on a name clash.
pub(crate) fn merge_interface_fields(
    resolver: &TypeResolver,
    interface: &NamedType,
    fields: &mut FieldMap,
) -> Result<()> {
    let NamedType::Interface(interface) = interface else {
        return Err(BuildError::type_mismatch(
            interface.name(),
            "an interface",
            interface.kind(),
        ));
    };

    for (name, field) in interface.fields(resolver)? {
        trace!(interface = %interface.name(), field = %name, "Inheriting field");
        fields.insert(
            name,
            OutputField {
                deprecation_reason: None,
                ..field
            },
        );
    }
    Ok(())
}

/// Applies field modifications to inherited fields.
pub(crate) fn apply_modifications(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    modifications: &[FieldModification],
    fields: &mut FieldMap,
) -> Result<()> {
    for modification in modifications {
        let Some(field) = fields.get_mut(&modification.field) else {
            return Err(BuildError::UnknownModifiedField {
                type_name: owner.type_name.clone(),
                field_name: modification.field.clone(),
            });
        };

        match &modification.ty {
            Some(ty) => {
                field.ty = resolver.wrap_position(
                    owner,
                    &modification.field,
                    WrapRequest {
                        ty,
                        list: modification.list.as_ref(),
                        nullable: modification.nullable,
                        required: modification.required,
                    },
                    Position::Output,
                )?;
            }
            None => reshape_inherited(resolver, owner, modification, field)?,
        }
        if let Some(resolve) = &modification.resolver {
            field.resolver = Some(resolve.clone());
        }
        if let Some(description) = &modification.description {
            field.description = Some(description.clone());
        }
        if !modification.args.is_empty() {
            let args = fields::compile_args(
                resolver,
                owner,
                &modification.field,
                modification.args.values(),
            )?;
            field.args.extend(args);
        }
    }
    Ok(())
}

/// Re-wraps an inherited field's own type with the modification's flags.
/// Without a list spec the inherited list levels are kept and only the
/// outer nullability changes.
fn reshape_inherited(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    modification: &FieldModification,
    field: &mut OutputField,
) -> Result<()> {
    let non_null = wrapping::resolve_non_null(
        modification.nullable,
        modification.required,
        &owner.nullability,
        &resolver.config().nullability,
        Position::Output,
    )
    .map_err(|_| BuildError::conflicting_nullability(&owner.type_name, &modification.field))?;

    if let Some(list) = &modification.list {
        field.ty = wrapping::wrap(Rc::clone(field.ty.named_type()), Some(list), non_null);
    } else if modification.nullable.is_some() || modification.required.is_some() {
        let inner = field.ty.clone().nullable();
        field.ty = if non_null { inner.non_null() } else { inner };
    }
    Ok(())
}
