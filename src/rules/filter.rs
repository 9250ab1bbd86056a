//! Legacy `prefix`/`tags` pairs become a v4 `filter` block.
//!
//! A lone `prefix` stays flat. Once `tags` is present both go into an `and`
//! wrapper, and a missing `prefix` is written as `""`.

use hcl_edit::structure::{Attribute, Body, Structure};

use crate::document::{attr, block, copy_attr, string_lit};

pub(super) fn build(prefix: Option<&Attribute>, tags: Option<&Attribute>) -> Option<Structure> {
    match (prefix, tags) {
        (prefix, Some(tags)) => {
            let prefix = prefix.map_or_else(|| attr("prefix", string_lit("")), copy_attr);
            Some(block("filter", [block("and", [prefix, copy_attr(tags)])]))
        }
        (Some(prefix), None) => Some(block("filter", [copy_attr(prefix)])),
        (None, None) => None,
    }
}

/// Same as [`build`], reading both attributes from `body`.
pub(super) fn from_body(body: &Body) -> Option<Structure> {
    build(body.get_attribute("prefix"), body.get_attribute("tags"))
}
