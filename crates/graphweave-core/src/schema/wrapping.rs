//! List wrapping and non-null resolution.
//!
//! Outer nullability of a field, argument or input field is decided by the
//! first tier that has an opinion:
//!
//! 1. the descriptor's own `nullable` / `required` flag,
//! 2. the owning type's override for the position (output or input),
//! 3. the builder's global override,
//! 4. the language default: outputs non-null, inputs nullable.

use std::rc::Rc;

use crate::config::NullabilityConfig;
use crate::descriptor::{ItemNullability, ListSpec};
use crate::types::{NamedType, TypeRef};

/// Which side of the schema a position is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Object and interface fields.
    Output,
    /// Arguments and input object fields.
    Input,
}

impl Position {
    fn language_default(self) -> bool {
        match self {
            Self::Output => true,
            Self::Input => false,
        }
    }

    fn pick(self, config: &NullabilityConfig) -> Option<bool> {
        match self {
            Self::Output => config.output,
            Self::Input => config.input,
        }
    }
}

/// Both `nullable` and `required` were set on one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullabilityConflict;

/// Resolves whether a position is wrapped non-null.
pub fn resolve_non_null(
    nullable: Option<bool>,
    required: Option<bool>,
    owner: &NullabilityConfig,
    global: &NullabilityConfig,
    position: Position,
) -> Result<bool, NullabilityConflict> {
    match (nullable, required) {
        (Some(_), Some(_)) => Err(NullabilityConflict),
        (Some(nullable), None) => Ok(!nullable),
        (None, Some(required)) => Ok(required),
        (None, None) => Ok(position
            .pick(owner)
            .or_else(|| position.pick(global))
            .unwrap_or_else(|| position.language_default())),
    }
}

/// Wraps `base` in the list levels of `list`, then in non-null when `non_null`.
pub fn wrap(base: Rc<NamedType>, list: Option<&ListSpec>, non_null: bool) -> TypeRef {
    let mut ty = TypeRef::named(base);
    match list {
        None => {}
        Some(ListSpec::Single) => ty = ty.non_null().list(),
        Some(ListSpec::Depths(depths)) => {
            for item in depths.iter().rev() {
                if *item == ItemNullability::NonNull {
                    ty = ty.non_null();
                }
                ty = ty.list();
            }
        }
    }
    if non_null { ty.non_null() } else { ty }
}
