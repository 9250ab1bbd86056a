//! `website { ... }` becomes `aws_s3_bucket_website_configuration`.

use hcl_edit::expr::Expression;
use hcl_edit::structure::{Body, Structure};

use super::Notes;
use crate::decoder::decode;
use crate::document::{self, attr, block, embedded_text, expr_text, rename_attr, string_lit};
use crate::types::RoutingRule;

pub(super) fn build(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    for structure in body.iter() {
        let Structure::Attribute(source) = structure else {
            notes.unmapped("website", structure);
            continue;
        };
        match source.key.as_str() {
            "index_document" => out.push(block("index_document", [rename_attr("suffix", source)])),
            "error_document" => out.push(block("error_document", [rename_attr("key", source)])),
            "redirect_all_requests_to" => out.push(block(
                "redirect_all_requests_to",
                [rename_attr("host_name", source)],
            )),
            "routing_rules" => out.extend(routing_rules(&source.value, notes)),
            _ => notes.unmapped("website", structure),
        }
    }
    out
}

fn routing_rules(value: &Expression, notes: &mut Notes) -> Vec<Structure> {
    let reason = match decode(&embedded_text(value)) {
        Ok(rules) if !rules.is_empty() => {
            return rules.iter().map(|rule| routing_rule(rule, notes)).collect();
        }
        Ok(_) => "no routing rules found".to_string(),
        Err(err) => err.to_string(),
    };
    notes.push(format!(
        "add routing_rule blocks by hand ({reason}): routing_rules = {}",
        expr_text(value)
    ));
    Vec::new()
}

/// One `routing_rule` block; fields absent from the record are not written.
fn routing_rule(rule: &RoutingRule, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    if let Some(condition) = &rule.condition {
        out.push(block("condition", fields(condition.fields(), notes)));
    }
    if let Some(redirect) = &rule.redirect {
        out.push(block("redirect", fields(redirect.fields(), notes)));
    }
    block("routing_rule", out)
}

fn fields(pairs: Vec<(&'static str, &str)>, notes: &mut Notes) -> Vec<Structure> {
    pairs
        .into_iter()
        .filter_map(|(key, value)| field_value(key, value, notes).map(|value| attr(key, value)))
        .collect()
}

/// Values carrying `${...}` or `%{...}` came from references and templates in
/// the embedding document, so they are written back as templates.
fn field_value(key: &str, value: &str, notes: &mut Notes) -> Option<Expression> {
    if !value.contains("${") && !value.contains("%{") {
        return Some(string_lit(value));
    }
    match document::parse(&format!("\"{value}\"")) {
        Ok(template) => Some(template),
        Err(err) => {
            notes.push(format!(
                "routing_rule {key} left unset, {value} could not be written as a template: {err}"
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::render_structures;
    use hcl_edit::parser::parse_body;
    use insta::assert_snapshot;

    fn run(source: &str) -> (String, Notes) {
        let body = parse_body(source).unwrap();
        let mut notes = Notes::default();
        let rendered = render_structures(build(&body, &mut notes));
        (rendered, notes)
    }

    #[test]
    fn test_documents_are_wrapped() {
        let (rendered, notes) = run(
            "index_document = \"index.html\"\nerror_document = \"error.html\"\n",
        );
        assert!(notes.is_empty());
        assert_snapshot!(rendered.trim_end(), @r#"
        index_document {
          suffix = "index.html"
        }
        error_document {
          key = "error.html"
        }
        "#);
    }

    #[test]
    fn test_redirect_all_requests() {
        let (rendered, _) = run("redirect_all_requests_to = \"https://example.com\"\n");
        assert_snapshot!(rendered.trim_end(), @r#"
        redirect_all_requests_to {
          host_name = "https://example.com"
        }
        "#);
    }

    #[test]
    fn test_heredoc_routing_rules() {
        let (rendered, notes) = run(
            r#"index_document = "index.html"
routing_rules = <<EOF
[{
    "Condition": {
        "KeyPrefixEquals": "docs/"
    },
    "Redirect": {
        "ReplaceKeyPrefixWith": "documents/"
    }
}, {
    "Condition": {
        "HttpErrorCodeReturnedEquals": 404
    },
    "Redirect": {
        "HostName": "example.com",
        "HttpRedirectCode": "301",
        "Protocol": "https"
    }
}]
EOF
"#,
        );
        assert!(notes.is_empty());
        assert_snapshot!(rendered.trim_end(), @r#"
        index_document {
          suffix = "index.html"
        }
        routing_rule {
          condition {
            key_prefix_equals = "docs/"
          }
          redirect {
            replace_key_prefix_with = "documents/"
          }
        }
        routing_rule {
          condition {
            http_error_code_returned_equals = "404"
          }
          redirect {
            host_name = "example.com"
            http_redirect_code = "301"
            protocol = "https"
          }
        }
        "#);
    }

    #[test]
    fn test_quoted_json_routing_rules() {
        let (rendered, notes) = run(
            r#"routing_rules = "[{\"Redirect\":{\"ReplaceKeyWith\":\"\"}}]"
"#,
        );
        assert!(notes.is_empty());
        assert_snapshot!(rendered.trim_end(), @r#"
        routing_rule {
          redirect {
            replace_key_with = ""
          }
        }
        "#);
    }

    #[test]
    fn test_undecodable_routing_rules_are_noted() {
        let (rendered, notes) = run("routing_rules = var.routing_rules\n");
        assert_eq!(rendered, "");
        assert_eq!(
            notes.iter().collect::<Vec<_>>(),
            vec![
                "add routing_rule blocks by hand (no surrounding `[` and `]` found): \
                 routing_rules = var.routing_rules"
            ]
        );
    }

    #[test]
    fn test_references_in_jsonencode_stay_references() {
        let (rendered, notes) = run(
            r#"routing_rules = jsonencode([{
  Condition = {
    KeyPrefixEquals = var.prefix
  }
  Redirect = {
    HostName = "${var.host}.example.com"
  }
}])
"#,
        );
        assert!(notes.is_empty());
        assert!(rendered.contains("key_prefix_equals = \"${var.prefix}\""));
        assert!(rendered.contains("host_name = \"${var.host}.example.com\""));
        assert!(!rendered.contains("$${"));
    }

    #[test]
    fn test_interpolation_in_heredoc_json_stays_a_template() {
        let (rendered, notes) = run(
            r#"routing_rules = <<EOF
[{"Redirect": {"HostName": "${var.host}", "Protocol": "https"}}]
EOF
"#,
        );
        assert!(notes.is_empty());
        assert_snapshot!(rendered.trim_end(), @r#"
        routing_rule {
          redirect {
            host_name = "${var.host}"
            protocol = "https"
          }
        }
        "#);
    }

    #[test]
    fn test_unwritable_template_is_noted() {
        let mut notes = Notes::default();
        assert!(field_value("host_name", "${var.host", &mut notes).is_none());
        assert_eq!(notes.iter().count(), 1);
        assert!(notes.iter().next().unwrap().starts_with("routing_rule host_name left unset"));
    }

    #[test]
    fn test_empty_routing_rules_are_noted() {
        let (_, notes) = run("routing_rules = \"[]\"\n");
        assert_eq!(notes.iter().count(), 1);
        assert!(notes.iter().next().unwrap().contains("no routing rules found"));
    }
}
