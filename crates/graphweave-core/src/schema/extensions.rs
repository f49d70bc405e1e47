//! Extension application.
//!
//! Extensions are stored per target name when registered and merged into the
//! target's field map every time that map is computed, after own and
//! inherited fields, in registration order.

use super::fields::{self, FieldOwner};
use super::TypeResolver;
use crate::descriptor::TypeDefSpec;
use crate::types::{FieldMap, InputFieldMap};
use crate::Result;

/// Appends extension fields to an object or interface field map.
pub(crate) fn apply_output(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    fields: &mut FieldMap,
) -> Result<()> {
    for extension in resolver.extensions_for(&owner.type_name) {
        if let TypeDefSpec::Extend(defs) = extension.spec() {
            for def in defs {
                let field = fields::compile_output_field(resolver, owner, def)?;
                fields.insert(field.name.clone(), field);
            }
        }
    }
    Ok(())
}

/// Appends extension fields to an input object field map. Arguments and
/// resolvers of the extension fields are ignored.
pub(crate) fn apply_input(
    resolver: &TypeResolver,
    owner: &FieldOwner,
    fields: &mut InputFieldMap,
) -> Result<()> {
    for extension in resolver.extensions_for(&owner.type_name) {
        if let TypeDefSpec::Extend(defs) = extension.spec() {
            for def in defs {
                let field = fields::compile_input_field_from_output(resolver, owner, def)?;
                fields.insert(field.name.clone(), field);
            }
        }
    }
    Ok(())
}
