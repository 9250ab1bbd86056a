//! `acl` and `grant` both land in `aws_s3_bucket_acl`.
//!
//! Legacy grants carry a list of `permissions`; the v4 `grant` block holds a
//! single `permission`, so each grant is exploded into one block per element.

use hcl_edit::expr::Expression;
use hcl_edit::structure::{Body, Structure};
use itertools::Itertools;

use super::{Member, Notes};
use crate::document::{
    DynamicBlock, attr, block, copy_attr, detach, dynamic_block, expr_text, structure_text,
};
use crate::error::RuleError;
use crate::types::LegacyField;

pub(super) fn build(members: &[Member], notes: &mut Notes) -> Result<Vec<Structure>, RuleError> {
    let mut canned = Vec::new();
    let mut grants = Vec::new();
    let mut has_grants = false;

    for member in members {
        if member.field == LegacyField::Acl {
            canned.push(member);
            continue;
        }
        has_grants = true;
        let source = member
            .as_block()
            .ok_or_else(|| member.shape_error("expected a block"))?;
        match DynamicBlock::parse(source) {
            None => grants.extend(explode(&source.body, notes)),
            Some(dynamic) => grants.push(dynamic_grant(&dynamic, member, notes)?),
        }
    }

    if has_grants {
        for member in canned {
            notes.push(format!(
                "acl and grant cannot be combined, grants were migrated and the canned ACL was not: {}",
                structure_text(&member.structure)
            ));
        }
        notes.push(
            "access_control_policy requires an owner block: owner { id = <canonical user ID of the bucket owner> }",
        );
        return Ok(vec![block("access_control_policy", grants)]);
    }

    let (first, rest) = canned
        .split_first()
        .ok_or_else(|| RuleError::Shape {
            field: LegacyField::Acl.to_string(),
            reason: "no acl or grant".to_string(),
        })?;
    for member in rest {
        notes.push(format!(
            "only one acl is allowed, not migrated: {}",
            structure_text(&member.structure)
        ));
    }
    let value = first
        .as_attribute_value()
        .ok_or_else(|| first.shape_error("expected an attribute"))?;
    Ok(vec![attr("acl", detach(value))])
}

/// The grantee arguments of a legacy grant (`id`, `type`, `uri`, ...).
fn grantee(body: &Body, context: &str, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) if source.key.as_str() == "permissions" => {}
            Structure::Attribute(source) => out.push(copy_attr(source)),
            other => notes.unmapped(context, other),
        }
    }
    block("grantee", out)
}

/// One `grant { grantee, permission }` per element of `permissions`, in list order.
fn explode(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let grantee = grantee(body, "grant", notes);

    match body.get_attribute("permissions").map(|attr| &attr.value) {
        Some(Expression::Array(permissions)) if !permissions.is_empty() => permissions
            .iter()
            .map(|permission| {
                block(
                    "grant",
                    [grantee.clone(), attr("permission", detach(permission))],
                )
            })
            .collect(),
        Some(other) => {
            notes.push(format!(
                "grant permission left unset, add one grant per permission of: permissions = {}",
                expr_text(other)
            ));
            vec![block("grant", [grantee])]
        }
        None => {
            notes.push("grant permission left unset, the legacy grant had no permissions");
            vec![block("grant", [grantee])]
        }
    }
}

/// `dynamic "grant"` keeps its label; its content is reshaped like a plain grant.
fn dynamic_grant(
    dynamic: &DynamicBlock<'_>,
    member: &Member,
    notes: &mut Notes,
) -> Result<Structure, RuleError> {
    let for_each = dynamic
        .for_each
        .ok_or_else(|| member.shape_error("dynamic block has no for_each"))?;
    let content = dynamic
        .content
        .ok_or_else(|| member.shape_error("dynamic block has no content"))?;

    let mut structures = vec![attr("for_each", detach(for_each))];
    if let Some(iterator) = dynamic.iterator {
        structures.push(attr("iterator", detach(iterator)));
    }
    for other in &dynamic.others {
        notes.unmapped("dynamic \"grant\"", other);
    }

    let mut grant = vec![grantee(content, "dynamic \"grant\"", notes)];
    match content.get_attribute("permissions").map(|attr| &attr.value) {
        Some(Expression::Array(permissions)) if permissions.iter().exactly_one().is_ok() => {
            grant.extend(
                permissions
                    .iter()
                    .map(|permission| attr("permission", detach(permission))),
            );
        }
        Some(other) => notes.push(format!(
            "dynamic grant permission left unset, each grant takes a single permission: permissions = {}",
            expr_text(other)
        )),
        None => notes.push("dynamic grant permission left unset, the legacy grant had no permissions"),
    }
    structures.push(block("content", grant));

    Ok(dynamic_block("grant", structures))
}
