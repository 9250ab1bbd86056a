//! Attribute-valued targets: the value moves under a new key.

use hcl_edit::expr::Expression;
use hcl_edit::structure::Structure;

use crate::document::{attr, detach};

pub(super) fn build(key: &'static str, value: &Expression) -> Vec<Structure> {
    vec![attr(key, detach(value))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{expr, render_structures};

    #[test]
    fn test_value_is_moved_verbatim() {
        let rendered = render_structures(build("payer", &expr("var.payer")));
        assert_eq!(rendered, "payer = var.payer\n");
    }
}
