//! Website routing rules as they appear inside the legacy `routing_rules` string.
//!
//! Records are read using the S3 API names (`Condition`, `KeyPrefixEquals`, ...)
//! and serialized using the names of the v4 `routing_rule` block.
//! Every field is optional: `None` means the field was not present, which is
//! different from a present-but-empty string.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingRule {
    #[serde(
        default,
        rename(deserialize = "Condition"),
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<Condition>,

    #[serde(
        default,
        rename(deserialize = "Redirect"),
        skip_serializing_if = "Option::is_none"
    )]
    pub redirect: Option<Redirect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    #[serde(
        default,
        rename(deserialize = "HttpErrorCodeReturnedEquals"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub http_error_code_returned_equals: Option<String>,

    #[serde(
        default,
        rename(deserialize = "KeyPrefixEquals"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub key_prefix_equals: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Redirect {
    #[serde(
        default,
        rename(deserialize = "HostName"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub host_name: Option<String>,

    #[serde(
        default,
        rename(deserialize = "HttpRedirectCode"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub http_redirect_code: Option<String>,

    #[serde(
        default,
        rename(deserialize = "Protocol"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol: Option<String>,

    #[serde(
        default,
        rename(deserialize = "ReplaceKeyPrefixWith"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub replace_key_prefix_with: Option<String>,

    #[serde(
        default,
        rename(deserialize = "ReplaceKeyWith"),
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub replace_key_with: Option<String>,
}

impl Condition {
    /// Pairs of `(v4 attribute name, value)` for every field that is present.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        present(&[
            (
                "http_error_code_returned_equals",
                &self.http_error_code_returned_equals,
            ),
            ("key_prefix_equals", &self.key_prefix_equals),
        ])
    }
}

impl Redirect {
    /// Pairs of `(v4 attribute name, value)` for every field that is present.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        present(&[
            ("host_name", &self.host_name),
            ("http_redirect_code", &self.http_redirect_code),
            ("protocol", &self.protocol),
            ("replace_key_prefix_with", &self.replace_key_prefix_with),
            ("replace_key_with", &self.replace_key_with),
        ])
    }
}

fn present<'a>(fields: &[(&'static str, &'a Option<String>)]) -> Vec<(&'static str, &'a str)> {
    fields
        .iter()
        .filter_map(|(name, value)| value.as_deref().map(|value| (*name, value)))
        .collect()
}

/// Status codes show up as numbers as often as strings; keep them all as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}
