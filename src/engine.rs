use std::collections::{HashMap, HashSet};
use std::mem;

use hcl_edit::parser::parse_body;
use hcl_edit::repr::Decorate;
use hcl_edit::structure::{Block, Body};

use crate::classify::{classify, field_ref};
use crate::config::MigrateOptions;
use crate::document::{annotate, body_of};
use crate::error::MigrateError;
use crate::format::format;
use crate::policy::SelectionPolicy;
use crate::rules::{Member, Parent, Repetition, TargetGroup, synthesize};
use crate::types::{ProvenanceRecord, ResourceAddress};

use tracing::{debug, info, warn};

/// The result of migrating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The rewritten document, re-indented.
    pub output: String,
    /// One record per synthesized resource, in emission order.
    pub provenance: Vec<ProvenanceRecord>,
}

/// The main engine handle. Cloneable, immutable after construction.
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    policy: SelectionPolicy,
}

impl MigrationEngine {
    pub fn new(options: &MigrateOptions) -> Result<Self, MigrateError> {
        Ok(Self::from_policy(SelectionPolicy::new(options)?))
    }

    pub fn from_policy(policy: SelectionPolicy) -> Self {
        MigrationEngine { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Migrate a whole document.
    ///
    /// Returns `Ok(None)` when no resource was synthesized, so callers can
    /// skip writing output for documents that need no change.
    ///
    /// ```rust
    /// use tfrefactor_core::{MigrateOptions, MigrationEngine};
    ///
    /// let engine = MigrationEngine::new(&MigrateOptions::default()).unwrap();
    /// let source = "resource \"aws_s3_bucket\" \"b\" {\n  bucket = \"b\"\n  acl    = \"private\"\n}\n";
    /// let migration = engine.migrate_str(source).unwrap().unwrap();
    /// assert!(migration.output.contains("resource \"aws_s3_bucket_acl\" \"b_acl\""));
    /// assert_eq!(migration.provenance[0].to_string(), "aws_s3_bucket_acl.b_acl,aws_s3_bucket.b");
    /// ```
    pub fn migrate_str(&self, source: &str) -> Result<Option<Migration>, MigrateError> {
        let mut body = parse_body(source)?;
        let provenance = self.migrate_body(&mut body);

        if provenance.is_empty() {
            debug!(event = "Migrate", phase = "Emitted", resources = 0);
            return Ok(None);
        }

        Ok(Some(Migration {
            output: format(&body.to_string()),
            provenance,
        }))
    }

    /// Migrate every candidate resource of `body` in place and append the
    /// synthesized resources at the end, in order.
    pub fn migrate_body(&self, body: &mut Body) -> Vec<ProvenanceRecord> {
        let mut taken: HashSet<ResourceAddress> = body
            .blocks()
            .filter(|block| block.ident.as_str() == "resource" && block.labels.len() == 2)
            .map(|block| ResourceAddress::new(block.labels[0].as_str(), block.labels[1].as_str()))
            .collect();

        let mut emitted = Vec::new();
        let mut provenance = Vec::new();

        for block in body.blocks_mut() {
            if !self.policy.is_candidate(block) {
                continue;
            }
            for (synthesized, record) in self.migrate_resource(block, &mut taken) {
                emitted.push(synthesized);
                provenance.push(record);
            }
        }

        for mut block in emitted {
            block.decor_mut().set_prefix("\n");
            body.push(block);
        }

        info!(
            event = "Migrate",
            phase = "Emitted",
            resources = provenance.len()
        );

        provenance
    }

    fn migrate_resource(
        &self,
        block: &mut Block,
        taken: &mut HashSet<ResourceAddress>,
    ) -> Vec<(Block, ProvenanceRecord)> {
        let parent = read_parent(block);

        debug!(
            event = "Migrate",
            phase = "Selected",
            resource = %parent.address
        );

        // 1. Classify every structure into target groups, first-seen order.
        let mut groups: Vec<TargetGroup> = Vec::new();
        for (index, structure) in block.body.iter().enumerate() {
            let field = field_ref(structure);
            if self.policy.should_skip_field(field.name)
                || (field.is_dynamic && self.policy.should_skip_field("dynamic"))
            {
                continue;
            }
            let Some(entry) = classify(field.name, field.kind) else {
                continue;
            };

            let position = match groups.iter().position(|group| group.target == entry.target) {
                Some(position) => position,
                None => {
                    groups.push(TargetGroup::new(entry.target));
                    groups.len() - 1
                }
            };
            groups[position].members.push(Member {
                field: entry.field,
                index,
                structure: structure.clone(),
            });
        }

        // 2. Synthesize each group. Failed groups stay on the source block.
        let mut removed = HashSet::new();
        let mut failed = HashMap::new();
        let mut synthesized = Vec::new();
        for group in &groups {
            debug!(
                event = "Migrate",
                phase = "Classified",
                resource = %parent.address,
                target = %group.target,
                fields = group.members.len()
            );

            let address = unique_address(
                group.target.resource_type(self.policy.legacy_type()),
                &format!("{}_{}", parent.address.name(), group.target),
                taken,
            );

            match synthesize(group, &parent, &address) {
                Ok(new_block) => {
                    info!(
                        event = "Migrate",
                        phase = "Synthesized",
                        resource = %parent.address,
                        target = %group.target,
                        address = %address
                    );
                    taken.insert(address.clone());
                    removed.extend(group.indices());
                    synthesized.push((
                        new_block,
                        ProvenanceRecord::new(address, parent.address.clone()),
                    ));
                }
                Err(err) => {
                    warn!(
                        event = "Migrate",
                        phase = "Skipped",
                        resource = %parent.address,
                        target = %group.target,
                        error = %err
                    );
                    if let Some(first) = group.indices().next() {
                        failed.insert(
                            first,
                            format!("{address} was not created, migrate by hand: {err}"),
                        );
                    }
                }
            }
        }

        // 3. Only now drop the migrated structures from the source, and mark
        //    the first structure of every group that stayed behind.
        if !removed.is_empty() || !failed.is_empty() {
            let old = mem::take(&mut block.body);
            block.body = body_of(
                old.into_iter()
                    .enumerate()
                    .filter(|(index, _)| !removed.contains(index))
                    .map(|(index, mut structure)| {
                        if let Some(note) = failed.get(&index) {
                            annotate(&mut structure, note);
                        }
                        structure
                    }),
            );
        }

        synthesized
    }
}

/// The address and meta-arguments the synthesized resources inherit.
fn read_parent(block: &Block) -> Parent {
    let address = ResourceAddress::new(block.labels[0].as_str(), block.labels[1].as_str());
    let value = |key: &str| block.body.get_attribute(key).map(|attr| attr.value.clone());

    let repetition = match (value("count"), value("for_each")) {
        (Some(count), _) => Repetition::Count(count),
        (None, Some(for_each)) => Repetition::ForEach(for_each),
        (None, None) => Repetition::Single,
    };

    Parent {
        address,
        repetition,
        provider: value("provider"),
    }
}

/// `<type>.<base>`, or `<base>_2`, `<base>_3`, ... if that address is taken.
fn unique_address(
    resource_type: String,
    base: &str,
    taken: &HashSet<ResourceAddress>,
) -> ResourceAddress {
    let candidate = ResourceAddress::new(resource_type.clone(), base);
    if !taken.contains(&candidate) {
        return candidate;
    }
    (2..)
        .map(|n| ResourceAddress::new(resource_type.clone(), format!("{base}_{n}")))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(candidate)
}
