//! Decoder for the routing rules embedded in the legacy `website.routing_rules` string.
//!
//! The payload is a list of records delimited by the first `[` and the last
//! `]` of the text, so heredoc markers and `jsonencode(...)` wrappers fall
//! away. The list is tried as JSON, then as YAML, then as an HCL expression.

use serde::Deserialize;
use tracing::debug;

use crate::error::DecodeError;
use crate::types::RoutingRule;

#[derive(Deserialize)]
struct HclRules {
    rules: Vec<RoutingRule>,
}

/// Decode an embedded routing-rules document.
///
/// ```rust
/// use tfrefactor_core::decode;
///
/// let rules = decode(r#"[{"Condition": {"KeyPrefixEquals": "docs/"}}]"#).unwrap();
/// assert_eq!(rules.len(), 1);
/// ```
pub fn decode(text: &str) -> Result<Vec<RoutingRule>, DecodeError> {
    let slice = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Err(DecodeError::MissingDelimiters),
    };

    let json = match serde_json::from_str::<Vec<RoutingRule>>(slice) {
        Ok(rules) => return Ok(rules),
        Err(err) => err.to_string(),
    };
    debug!(event = "Decode", phase = "Json", error = %json);

    let yaml = match serde_yaml::from_str::<Vec<RoutingRule>>(slice) {
        Ok(rules) => return Ok(rules),
        Err(err) => err.to_string(),
    };
    debug!(event = "Decode", phase = "Yaml", error = %yaml);

    let hcl = match hcl::from_str::<HclRules>(&format!("rules = {slice}\n")) {
        Ok(wrapper) => return Ok(wrapper.rules),
        Err(err) => err.to_string(),
    };
    debug!(event = "Decode", phase = "Hcl", error = %hcl);

    Err(DecodeError::Undecodable { json, yaml, hcl })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_json() {
        let rules = decode(
            r#"[{"Condition": {"KeyPrefixEquals": "docs/"}, "Redirect": {"ReplaceKeyPrefixWith": "documents/"}}]"#,
        )
        .unwrap();
        assert_json_snapshot!(rules, @r#"
        [
          {
            "condition": {
              "key_prefix_equals": "docs/"
            },
            "redirect": {
              "replace_key_prefix_with": "documents/"
            }
          }
        ]
        "#);
    }

    #[test]
    fn test_heredoc_wrapping_is_stripped() {
        let text = "<<EOF\n[\n  {\n    \"Condition\": {\"HttpErrorCodeReturnedEquals\": \"404\"},\n    \"Redirect\": {\"HostName\": \"example.com\", \"Protocol\": \"https\"}\n  }\n]\nEOF\n";
        let rules = decode(text).unwrap();
        assert_json_snapshot!(rules, @r#"
        [
          {
            "condition": {
              "http_error_code_returned_equals": "404"
            },
            "redirect": {
              "host_name": "example.com",
              "protocol": "https"
            }
          }
        ]
        "#);
    }

    #[test]
    fn test_yaml_fallback() {
        let rules =
            decode("[{Condition: {KeyPrefixEquals: docs/}, Redirect: {HttpRedirectCode: 301}}]")
                .unwrap();
        assert_eq!(rules.len(), 1);
        let redirect = rules[0].redirect.as_ref().unwrap();
        assert_eq!(redirect.http_redirect_code.as_deref(), Some("301"));
    }

    #[test]
    fn test_hcl_fallback_for_jsonencode() {
        let text = r#"jsonencode([{
    Condition = { KeyPrefixEquals = "img/" }
    Redirect  = { ReplaceKeyWith = "index.html" }
  }])"#;
        let rules = decode(text).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].condition.as_ref().unwrap().key_prefix_equals.as_deref(),
            Some("img/")
        );
        assert_eq!(
            rules[0].redirect.as_ref().unwrap().replace_key_with.as_deref(),
            Some("index.html")
        );
    }

    #[test]
    fn test_empty_list_decodes_to_no_records() {
        assert_eq!(decode("[]").unwrap(), vec![]);
    }

    #[test]
    fn test_missing_delimiters() {
        assert_eq!(decode("var.rules"), Err(DecodeError::MissingDelimiters));
        assert_eq!(decode("] backwards ["), Err(DecodeError::MissingDelimiters));
    }

    #[test]
    fn test_garbage_reports_every_stage() {
        let err = decode("[{ not: [valid } ]").unwrap_err();
        assert!(matches!(err, DecodeError::Undecodable { .. }));
    }
}
