//! `versioning { enabled, mfa_delete }` becomes `versioning_configuration { status, mfa_delete }`.

use hcl_edit::structure::{Body, Structure};
use tracing::warn;

use super::Notes;
use crate::document::{attr, block, expr_text, literal_bool, string_lit, toggle};

pub(super) fn build(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut config = Vec::new();

    for structure in body.iter() {
        let Structure::Attribute(source) = structure else {
            notes.unmapped("versioning", structure);
            continue;
        };
        match source.key.as_str() {
            "enabled" => match literal_bool(&source.value) {
                Some(true) => config.push(attr("status", string_lit("Enabled"))),
                Some(false) => {
                    // "Suspended" is only valid for a bucket that had versioning on before.
                    warn!(
                        event = "Migrate",
                        phase = "Classified",
                        field = "versioning",
                        "versioning.enabled = false mapped to Suspended"
                    );
                    notes.push(
                        "versioning enabled = false was mapped to status = \"Suspended\"; \
                         use \"Disabled\" if versioning was never enabled on this bucket",
                    );
                    config.push(attr("status", string_lit("Suspended")));
                }
                None => notes.push(format!(
                    "versioning status left unset, enabled = {} is not a literal boolean",
                    expr_text(&source.value)
                )),
            },
            "mfa_delete" => match toggle(&source.value, "Enabled", "Disabled") {
                Some(value) => config.push(attr("mfa_delete", value)),
                None => notes.push(format!(
                    "versioning mfa_delete left unset, mfa_delete = {} is not a literal boolean",
                    expr_text(&source.value)
                )),
            },
            _ => notes.unmapped("versioning", structure),
        }
    }

    vec![block("versioning_configuration", config)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::render_structures;
    use hcl_edit::parser::parse_body;
    use insta::assert_snapshot;
    use yare::parameterized;

    fn run(source: &str) -> (String, Notes) {
        let body = parse_body(source).unwrap();
        let mut notes = Notes::default();
        let rendered = render_structures(build(&body, &mut notes));
        (rendered, notes)
    }

    #[parameterized(
        enabled = { "enabled = true", Some("status = \"Enabled\""), 0 },
        suspended = { "enabled = false", Some("status = \"Suspended\""), 1 },
        variable = { "enabled = var.versioning", None, 1 },
        mfa_on = { "mfa_delete = true", Some("mfa_delete = \"Enabled\""), 0 },
        mfa_off = { "mfa_delete = false", Some("mfa_delete = \"Disabled\""), 0 },
        mfa_string = { "mfa_delete = \"true\"", None, 1 },
    )]
    fn test_toggle_mapping(source: &str, expected: Option<&str>, note_count: usize) {
        let (rendered, notes) = run(&format!("{source}\n"));
        match expected {
            Some(line) => assert!(rendered.contains(line), "{rendered}"),
            None => assert!(!rendered.contains('='), "{rendered}"),
        }
        assert_eq!(notes.iter().count(), note_count);
    }

    #[test]
    fn test_full_block() {
        let (rendered, _) = run("enabled = true\nmfa_delete = false\n");
        assert_snapshot!(rendered.trim_end(), @r#"
        versioning_configuration {
          status = "Enabled"
          mfa_delete = "Disabled"
        }
        "#);
    }
}
