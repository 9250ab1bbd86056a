use std::path::Path;

use thiserror::Error;

/// Errors surfaced to callers of the migration engine and the file driver.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("unsupported resource type: {0} (only aws_s3_bucket can be migrated)")]
    UnsupportedResourceType(String),

    #[error("failed to compile ignore pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl MigrateError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        MigrateError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<hcl_edit::parser::Error> for MigrateError {
    fn from(err: hcl_edit::parser::Error) -> Self {
        MigrateError::Parse(err.to_string())
    }
}

impl From<regex::Error> for MigrateError {
    fn from(err: regex::Error) -> Self {
        MigrateError::InvalidPattern(err.to_string())
    }
}

/// A target group that could not be turned into a standalone resource.
///
/// The engine keeps the group's fields on the source block when this happens.
#[derive(Debug, Error)]
pub(crate) enum RuleError {
    #[error("invalid generated expression `{text}`: {message}")]
    Expression { text: String, message: String },

    #[error("unexpected shape for `{field}`: {reason}")]
    Shape { field: String, reason: String },
}

/// Failure to decode an embedded routing-rules document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no surrounding `[` and `]` found")]
    MissingDelimiters,

    #[error("not JSON ({json}), YAML ({yaml}) or HCL ({hcl})")]
    Undecodable {
        json: String,
        yaml: String,
        hcl: String,
    },
}
