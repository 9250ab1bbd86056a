//! `lifecycle_rule` blocks become `rule` blocks of `aws_s3_bucket_lifecycle_configuration`.

use hcl_edit::structure::{Body, Structure};

use super::{Member, Notes, filter};
use crate::document::{
    self, DynamicBlock, attr, block, copy_attr, detach, dynamic_block, expr_text, rename_attr,
    toggle,
};
use crate::error::RuleError;

pub(super) fn build(members: &[Member], notes: &mut Notes) -> Result<Vec<Structure>, RuleError> {
    let mut rules = Vec::with_capacity(members.len());
    for member in members {
        let source = member
            .as_block()
            .ok_or_else(|| member.shape_error("expected a block"))?;
        let rule = match DynamicBlock::parse(source) {
            None => block("rule", rule_body(&source.body, notes)),
            Some(dynamic) => dynamic_rule(&dynamic, member, notes)?,
        };
        rules.push(rule);
    }
    Ok(rules)
}

/// `dynamic "lifecycle_rule"` becomes `dynamic "rule"`. The content keeps
/// referring to the old name, so it is pinned with `iterator`.
fn dynamic_rule(
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
    for other in &dynamic.others {
        notes.unmapped("dynamic \"lifecycle_rule\"", other);
    }

    Ok(dynamic_block(
        "rule",
        [
            attr("for_each", detach(for_each)),
            attr("iterator", document::parse(&dynamic.iterator_name())?),
            block("content", rule_body(content, notes)),
        ],
    ))
}

fn rule_body(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    let mut filtered = false;

    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) => match source.key.as_str() {
                "id" => out.push(copy_attr(source)),
                "enabled" => match toggle(&source.value, "Enabled", "Disabled") {
                    Some(status) => out.push(attr("status", status)),
                    None => notes.push(format!(
                        "lifecycle rule status left unset, enabled = {} is not a literal boolean",
                        expr_text(&source.value)
                    )),
                },
                "abort_incomplete_multipart_upload_days" => out.push(block(
                    "abort_incomplete_multipart_upload",
                    [rename_attr("days_after_initiation", source)],
                )),
                "prefix" | "tags" => {
                    if !filtered {
                        filtered = true;
                        out.extend(filter::from_body(body));
                    }
                }
                _ => notes.unmapped("lifecycle_rule", structure),
            },
            Structure::Block(inner) => {
                let name = DynamicBlock::parse(inner)
                    .map(|dynamic| dynamic.label)
                    .unwrap_or(inner.ident.as_str());
                match (inner.ident.as_str(), name) {
                    (_, "expiration" | "transition") => {
                        out.push(document::detach_structure(structure))
                    }
                    ("noncurrent_version_expiration", _) => out.push(noncurrent(
                        "noncurrent_version_expiration",
                        &inner.body,
                        &[],
                        notes,
                    )),
                    ("noncurrent_version_transition", _) => out.push(noncurrent(
                        "noncurrent_version_transition",
                        &inner.body,
                        &["storage_class"],
                        notes,
                    )),
                    _ => notes.unmapped("lifecycle_rule", structure),
                }
            }
        }
    }

    out
}

/// `days` is called `noncurrent_days` in the v4 schema.
fn noncurrent(
    name: &'static str,
    body: &Body,
    copied: &[&str],
    notes: &mut Notes,
) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) if source.key.as_str() == "days" => {
                out.push(rename_attr("noncurrent_days", source));
            }
            Structure::Attribute(source) if copied.contains(&source.key.as_str()) => {
                out.push(copy_attr(source));
            }
            other => notes.unmapped(name, other),
        }
    }
    block(name, out)
}
