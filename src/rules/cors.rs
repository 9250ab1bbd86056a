//! `cors_rule` blocks keep their shape in `aws_s3_bucket_cors_configuration`.

use hcl_edit::structure::Structure;

use super::Member;
use crate::document::detach_structure;

/// Every `cors_rule` and `dynamic "cors_rule"` block, copied in source order.
pub(super) fn build(members: &[Member]) -> Vec<Structure> {
    members
        .iter()
        .map(|member| detach_structure(&member.structure))
        .collect()
}
