//! Targets whose nested `rule` blocks already have the v4 shape.

use hcl_edit::structure::{Body, Structure};

use super::Notes;
use crate::document::{copy_attr, detach_structure};

/// `object_lock_configuration { object_lock_enabled, rule { ... } }`
pub(super) fn object_lock(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) if source.key.as_str() == "object_lock_enabled" => {
                out.push(copy_attr(source));
            }
            Structure::Block(rule) if rule.ident.as_str() == "rule" => out.push(detach_structure(structure)),
            other => notes.unmapped("object_lock_configuration", other),
        }
    }
    out
}

/// `server_side_encryption_configuration { rule { ... } }`
pub(super) fn server_side_encryption(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Block(rule) if rule.ident.as_str() == "rule" => out.push(detach_structure(structure)),
            other => notes.unmapped("server_side_encryption_configuration", other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::render_structures;
    use hcl_edit::parser::parse_body;
    use insta::assert_snapshot;

    #[test]
    fn test_object_lock() {
        let body = parse_body(
            r#"object_lock_enabled = "Enabled"
rule {
  default_retention {
    mode = "COMPLIANCE"
    days = 5
  }
}
"#,
        )
        .unwrap();
        let mut notes = Notes::default();
        assert_snapshot!(render_structures(object_lock(&body, &mut notes)).trim_end(), @r#"
        object_lock_enabled = "Enabled"
        rule {
          default_retention {
            mode = "COMPLIANCE"
            days = 5
          }
        }
        "#);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_server_side_encryption_keeps_rule() {
        let body = parse_body(
            r#"rule {
  apply_server_side_encryption_by_default {
    sse_algorithm = "aws:kms"
  }
  bucket_key_enabled = true
}
"#,
        )
        .unwrap();
        let mut notes = Notes::default();
        let rendered = render_structures(server_side_encryption(&body, &mut notes));
        assert!(rendered.starts_with("rule {\n  apply_server_side_encryption_by_default {\n"));
        assert!(rendered.contains("    sse_algorithm = \"aws:kms\"\n"));
        assert!(rendered.contains("  bucket_key_enabled = true\n"));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_unexpected_attribute_is_noted() {
        let body = parse_body("enabled = true\n").unwrap();
        let mut notes = Notes::default();
        assert!(server_side_encryption(&body, &mut notes).is_empty());
        assert_eq!(notes.iter().count(), 1);
    }
}
