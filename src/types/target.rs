//! Standalone resources that replace the inline arguments of the legacy bucket.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// One standalone resource of the v4 schema, identified by its type suffix.
///
/// The full resource type is `<legacy type>_<suffix>`, e.g. `aws_s3_bucket_acl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TargetResource {
    AccelerateConfiguration,
    Acl,
    CorsConfiguration,
    LifecycleConfiguration,
    Logging,
    ObjectLockConfiguration,
    Policy,
    ReplicationConfiguration,
    RequestPaymentConfiguration,
    ServerSideEncryptionConfiguration,
    Versioning,
    WebsiteConfiguration,
}

impl TargetResource {
    /// The full resource type, e.g. `aws_s3_bucket_cors_configuration`.
    pub fn resource_type(self, legacy_type: &str) -> String {
        format!("{legacy_type}_{self}")
    }
}
