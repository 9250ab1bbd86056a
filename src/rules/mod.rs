//! Per-target transform rules.
//!
//! [`synthesize`] turns one [`TargetGroup`] into a complete resource block:
//! meta-arguments, the `bucket` back-reference and the content produced by the
//! target's rule. Values that cannot be mapped with confidence are written as
//! `# TODO:` lines above the first argument.

mod acl;
mod cors;
mod filter;
mod lifecycle;
mod logging;
mod passthrough;
mod replication;
mod simple;
mod versioning;
mod website;

use hcl_edit::expr::Expression;
use hcl_edit::repr::{Decorate, Decorated};
use hcl_edit::structure::{Block, Body, Structure};
use hcl_edit::Ident;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::document::{self, DynamicBlock, attr, body_of, detach, expr_text, string_label};
use crate::error::RuleError;
use crate::types::{LegacyField, ResourceAddress, TargetResource};

/// `each.` or `count.` outside a longer traversal.
static PARENT_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^\w.])(each|count)\.").expect("valid binding pattern"));

/// How the legacy resource is instantiated.
#[derive(Debug, Clone, Default)]
pub(crate) enum Repetition {
    #[default]
    Single,
    Count(Expression),
    ForEach(Expression),
}

impl Repetition {
    /// The index appended to the parent address in the back-reference.
    fn index(&self) -> &'static str {
        match self {
            Repetition::Single => "",
            Repetition::Count(_) => "[count.index]",
            Repetition::ForEach(_) => "[each.key]",
        }
    }

    fn meta(&self) -> Option<Structure> {
        match self {
            Repetition::Single => None,
            Repetition::Count(expr) => Some(attr("count", detach(expr))),
            Repetition::ForEach(expr) => Some(attr("for_each", detach(expr))),
        }
    }
}

/// What the synthesized resources inherit from the legacy resource.
#[derive(Debug, Clone)]
pub(crate) struct Parent {
    pub address: ResourceAddress,
    pub repetition: Repetition,
    pub provider: Option<Expression>,
}

/// One classified source structure, with its position in the source body.
#[derive(Debug, Clone)]
pub(crate) struct Member {
    pub field: LegacyField,
    pub index: usize,
    pub structure: Structure,
}

impl Member {
    pub fn as_attribute_value(&self) -> Option<&Expression> {
        self.structure.as_attribute().map(|attr| &attr.value)
    }

    pub fn as_block(&self) -> Option<&Block> {
        self.structure.as_block()
    }

    fn shape_error(&self, reason: &str) -> RuleError {
        RuleError::Shape {
            field: self.field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// All members routed to one target, in source order.
#[derive(Debug, Clone)]
pub(crate) struct TargetGroup {
    pub target: TargetResource,
    pub members: Vec<Member>,
}

impl TargetGroup {
    pub fn new(target: TargetResource) -> Self {
        Self {
            target,
            members: Vec::new(),
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|member| member.index)
    }
}

/// Explanatory comments for values that were not mapped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Notes(Vec<String>);

impl Notes {
    pub fn push(&mut self, note: impl Into<String>) {
        self.0.push(document::flatten(&note.into()));
    }

    /// Keep a structure the rule has no mapping for.
    pub fn unmapped(&mut self, context: &str, structure: &Structure) {
        let (kind, name) = match structure {
            Structure::Attribute(attr) => ("attribute", attr.key.as_str()),
            Structure::Block(block) => ("block", block.ident.as_str()),
        };
        self.push(format!(
            "unmapped {kind} '{name}' in {context}: {}",
            document::structure_text(structure)
        ));
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn render(&self) -> String {
        self.0.iter().map(|note| format!("# TODO: {note}\n")).collect()
    }
}

/// Build the standalone resource for `group`, named by `address`.
pub(crate) fn synthesize(
    group: &TargetGroup,
    parent: &Parent,
    address: &ResourceAddress,
) -> Result<Block, RuleError> {
    let mut notes = Notes::default();
    let mut repetition = parent.repetition.clone();
    let index = parent.repetition.index();

    let content = match group.target {
        TargetResource::Acl => acl::build(&group.members, &mut notes)?,
        TargetResource::CorsConfiguration => cors::build(&group.members),
        TargetResource::LifecycleConfiguration => lifecycle::build(&group.members, &mut notes)?,
        single => {
            let (primary, extra) = group
                .members
                .split_first()
                .ok_or_else(|| RuleError::Shape {
                    field: single.to_string(),
                    reason: "no source fields".to_string(),
                })?;
            for member in extra {
                notes.push(format!(
                    "only one {} is allowed, not migrated: {}",
                    member.field,
                    document::structure_text(&member.structure)
                ));
            }

            match primary.as_block().and_then(DynamicBlock::parse) {
                None => build_single(single, primary, None, &mut notes)?,
                Some(dynamic) => {
                    let content = dynamic
                        .content
                        .ok_or_else(|| primary.shape_error("dynamic block has no content"))?;
                    let for_each = dynamic
                        .for_each
                        .ok_or_else(|| primary.shape_error("dynamic block has no for_each"))?;
                    for other in &dynamic.others {
                        notes.unmapped(&format!("dynamic \"{}\"", dynamic.label), other);
                    }

                    let structures = build_single(single, primary, Some(content), &mut notes)?;
                    match &parent.repetition {
                        Repetition::Count(_) => {
                            notes.push(format!(
                                "dynamic \"{}\" iterated over {}; this resource keeps the parent's count, \
                                 split it per element if needed",
                                dynamic.label,
                                expr_text(for_each)
                            ));
                            structures
                        }
                        Repetition::ForEach(_) if PARENT_BINDING.is_match(&expr_text(for_each)) => {
                            notes.push(format!(
                                "dynamic \"{}\" iterated over {}, which depends on the parent's \
                                 for_each; this resource keeps the parent's for_each, split it per \
                                 element if needed",
                                dynamic.label,
                                expr_text(for_each)
                            ));
                            structures
                        }
                        Repetition::ForEach(parent_for_each) => {
                            notes.push(format!(
                                "for_each replaced by dynamic \"{}\" iterating over {}; the bucket \
                                 reference uses its keys, check they match the keys of {}",
                                dynamic.label,
                                expr_text(for_each),
                                expr_text(parent_for_each)
                            ));
                            repetition = Repetition::ForEach(for_each.clone());
                            document::rewrite_iterator(structures, &dynamic.iterator_name())?
                        }
                        Repetition::Single => {
                            repetition = Repetition::ForEach(for_each.clone());
                            document::rewrite_iterator(structures, &dynamic.iterator_name())?
                        }
                    }
                }
            }
        }
    };

    let back_reference = document::parse(&format!("{}{index}.id", parent.address))?;

    let mut structures = Vec::with_capacity(content.len() + 3);
    if let Some(provider) = &parent.provider {
        structures.push(attr("provider", detach(provider)));
    }
    structures.extend(repetition.meta());
    structures.push(attr("bucket", back_reference));
    structures.extend(content);

    for note in notes.iter() {
        warn!(
            event = "Migrate",
            phase = "Synthesized",
            address = %address,
            parent = %parent.address,
            note
        );
    }
    if !notes.is_empty() {
        match structures.first_mut() {
            Some(Structure::Attribute(first)) => first.decor_mut().set_prefix(notes.render()),
            Some(Structure::Block(first)) => first.decor_mut().set_prefix(notes.render()),
            None => {}
        }
    }

    Ok(resource_block(address, body_of(structures)))
}

/// Content for single-valued targets. `content` replaces the member's own body
/// when the member was a `dynamic` block.
fn build_single(
    target: TargetResource,
    member: &Member,
    content: Option<&Body>,
    notes: &mut Notes,
) -> Result<Vec<Structure>, RuleError> {
    let value = || {
        member
            .as_attribute_value()
            .ok_or_else(|| member.shape_error("expected an attribute"))
    };
    let body = || {
        content
            .or_else(|| member.as_block().map(|block| &block.body))
            .ok_or_else(|| member.shape_error("expected a block"))
    };

    Ok(match target {
        TargetResource::AccelerateConfiguration => simple::build("status", value()?),
        TargetResource::Policy => simple::build("policy", value()?),
        TargetResource::RequestPaymentConfiguration => simple::build("payer", value()?),
        TargetResource::Logging => logging::build(body()?, notes),
        TargetResource::ObjectLockConfiguration => passthrough::object_lock(body()?, notes),
        TargetResource::ServerSideEncryptionConfiguration => {
            passthrough::server_side_encryption(body()?, notes)
        }
        TargetResource::ReplicationConfiguration => replication::build(body()?, notes),
        TargetResource::Versioning => versioning::build(body()?, notes),
        TargetResource::WebsiteConfiguration => website::build(body()?, notes),
        TargetResource::Acl
        | TargetResource::CorsConfiguration
        | TargetResource::LifecycleConfiguration => {
            return Err(member.shape_error("not a single-valued target"));
        }
    })
}

fn resource_block(address: &ResourceAddress, body: Body) -> Block {
    let mut block = Block::new(Decorated::new(Ident::new("resource")));
    block.labels = vec![
        string_label(address.resource_type()),
        string_label(address.name()),
    ];
    block.body = body;
    block
}
