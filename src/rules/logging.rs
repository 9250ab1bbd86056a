use hcl_edit::structure::{Body, Structure};

use super::Notes;
use crate::document::copy_attr;

/// `logging { target_bucket, target_prefix }` keeps its argument names.
pub(super) fn build(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source)
                if matches!(source.key.as_str(), "target_bucket" | "target_prefix") =>
            {
                out.push(copy_attr(source));
            }
            other => notes.unmapped("logging", other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::render_structures;
    use hcl_edit::parser::parse_body;

    #[test]
    fn test_targets_are_copied() {
        let body = parse_body("target_bucket = aws_s3_bucket.logs.id\ntarget_prefix = \"log/\"\n").unwrap();
        let mut notes = Notes::default();
        let rendered = render_structures(build(&body, &mut notes));
        assert_eq!(
            rendered,
            "target_bucket = aws_s3_bucket.logs.id\ntarget_prefix = \"log/\"\n"
        );
        assert!(notes.is_empty());
    }
}
