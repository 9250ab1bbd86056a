//! Whole-document tests: run sources through the engine and re-parse the output.


use hcl_edit::parser::parse_body;
use hcl_edit::structure::{Block, Body};

use crate::{MigrateOptions, Migration, MigrationEngine};

pub(crate) fn migrate_with(options: &MigrateOptions, source: &str) -> Option<Migration> {
    MigrationEngine::new(options)
        .unwrap()
        .migrate_str(source)
        .unwrap()
}

pub(crate) fn migrate(source: &str) -> Migration {
    migrate_with(&MigrateOptions::default(), source).expect("something to migrate")
}

pub(crate) fn reparse(migration: &Migration) -> Body {
    parse_body(&migration.output).expect("output parses")
}

/// The top-level `resource "<resource_type>" "<name>"` block.
pub(crate) fn resource<'a>(body: &'a Body, resource_type: &str, name: &str) -> &'a Block {
    body.blocks()
        .find(|block| {
            block.ident.as_str() == "resource"
                && block.labels.len() == 2
                && block.labels[0].as_str() == resource_type
                && block.labels[1].as_str() == name
        })
        .unwrap_or_else(|| panic!("no resource {resource_type}.{name}"))
}

/// All top-level resource addresses, in document order.
pub(crate) fn addresses(body: &Body) -> Vec<String> {
    body.blocks()
        .filter(|block| block.ident.as_str() == "resource")
        .map(|block| format!("{}.{}", block.labels[0].as_str(), block.labels[1].as_str()))
        .collect()
}

/// The printed value of `key`, without surrounding whitespace.
pub(crate) fn value(body: &Body, key: &str) -> String {
    body.get_attribute(key)
        .unwrap_or_else(|| panic!("no attribute {key}"))
        .value
        .to_string()
        .trim()
        .to_string()
}

/// Nested blocks named `ident`, in order.
pub(crate) fn blocks<'a>(body: &'a Body, ident: &'a str) -> Vec<&'a Block> {
    body.blocks()
        .filter(|block| block.ident.as_str() == ident)
        .collect()
}
