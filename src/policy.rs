use std::collections::HashSet;
use std::path::Path;

use hcl_edit::structure::Block;
use regex::Regex;

use crate::config::{LEGACY_RESOURCE_TYPE, MigrateOptions};
use crate::error::MigrateError;

/// Decides which resources, arguments and paths the migration touches.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    legacy_type: String,
    ignored_fields: HashSet<String>,
    ignored_names: HashSet<String>,
    ignored_paths: Vec<Regex>,
}

impl SelectionPolicy {
    /// Build the policy, validating the resource type and compiling the path patterns.
    pub fn new(options: &MigrateOptions) -> Result<Self, MigrateError> {
        if options.resource_type != LEGACY_RESOURCE_TYPE {
            return Err(MigrateError::UnsupportedResourceType(
                options.resource_type.clone(),
            ));
        }

        let ignored_paths = options
            .ignore_paths
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            legacy_type: options.resource_type.clone(),
            ignored_fields: options.ignore_arguments.iter().cloned().collect(),
            ignored_names: options.ignore_names.iter().cloned().collect(),
            ignored_paths,
        })
    }

    pub fn legacy_type(&self) -> &str {
        &self.legacy_type
    }

    /// True for a resource of the legacy type whose name is not ignored.
    pub fn should_process(&self, resource_type: &str, resource_name: &str) -> bool {
        resource_type == self.legacy_type && !self.ignored_names.contains(resource_name)
    }

    /// True for a top-level `resource "<legacy type>" "<name>"` block that should be migrated.
    pub fn is_candidate(&self, block: &Block) -> bool {
        block.ident.as_str() == "resource"
            && block.labels.len() == 2
            && self.should_process(block.labels[0].as_str(), block.labels[1].as_str())
    }

    pub fn should_skip_field(&self, field_name: &str) -> bool {
        self.ignored_fields.contains(field_name)
    }

    pub fn matches_ignored_path(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.ignored_paths.iter().any(|re| re.is_match(&path))
    }
}
