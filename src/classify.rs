use std::str::FromStr;

use hcl_edit::structure::Structure;

use crate::types::{FieldKind, LegacyField, Multiplicity, TargetResource};

/// Where a legacy field goes: its target resource and how it is absorbed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationEntry {
    pub field: LegacyField,
    pub target: TargetResource,
    pub multiplicity: Multiplicity,
}

impl From<LegacyField> for ClassificationEntry {
    fn from(field: LegacyField) -> Self {
        Self {
            field,
            target: field.target(),
            multiplicity: field.multiplicity(),
        }
    }
}

/// Look up a field by name and kind.
///
/// A known name used with the wrong kind (e.g. a `logging = ...` attribute) is
/// not classified, so it stays on the source resource untouched.
pub fn classify(name: &str, kind: FieldKind) -> Option<ClassificationEntry> {
    let field = LegacyField::from_str(name).ok()?;
    (field.kind() == kind).then(|| field.into())
}

/// The field name and kind a body structure represents.
///
/// `dynamic "<field>" { ... }` blocks are reported under their label, with
/// `is_dynamic` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldRef<'a> {
    pub name: &'a str,
    pub kind: FieldKind,
    pub is_dynamic: bool,
}

pub(crate) fn field_ref(structure: &Structure) -> FieldRef<'_> {
    match structure {
        Structure::Attribute(attr) => FieldRef {
            name: attr.key.as_str(),
            kind: FieldKind::Attribute,
            is_dynamic: false,
        },
        Structure::Block(block) => {
            if block.ident.as_str() == "dynamic" && block.labels.len() == 1 {
                FieldRef {
                    name: block.labels[0].as_str(),
                    kind: FieldKind::Block,
                    is_dynamic: true,
                }
            } else {
                FieldRef {
                    name: block.ident.as_str(),
                    kind: FieldKind::Block,
                    is_dynamic: false,
                }
            }
        }
    }
}
