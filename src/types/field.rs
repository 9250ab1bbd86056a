//! The legacy bucket arguments the engine knows how to move.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::target::TargetResource;

/// Whether a field appears as an attribute (`acl = ...`) or a block (`logging { ... }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FieldKind {
    Attribute,
    Block,
}

/// How many source occurrences a target resource absorbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Multiplicity {
    /// At most one occurrence is meaningful (e.g. `logging`).
    Single,
    /// Every occurrence becomes a sibling nested block (e.g. `cors_rule`).
    Repeatable,
}

/// Every migratable argument of the legacy `aws_s3_bucket` schema.
///
/// The mapping methods are exhaustive matches: a new variant does not compile
/// until it has been given a target, a multiplicity and a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LegacyField {
    AccelerationStatus,
    Acl,
    Policy,
    RequestPayer,
    CorsRule,
    Grant,
    LifecycleRule,
    Logging,
    ObjectLockConfiguration,
    ReplicationConfiguration,
    ServerSideEncryptionConfiguration,
    Versioning,
    Website,
}

impl LegacyField {
    pub fn target(self) -> TargetResource {
        match self {
            LegacyField::AccelerationStatus => TargetResource::AccelerateConfiguration,
            LegacyField::Acl | LegacyField::Grant => TargetResource::Acl,
            LegacyField::Policy => TargetResource::Policy,
            LegacyField::RequestPayer => TargetResource::RequestPaymentConfiguration,
            LegacyField::CorsRule => TargetResource::CorsConfiguration,
            LegacyField::LifecycleRule => TargetResource::LifecycleConfiguration,
            LegacyField::Logging => TargetResource::Logging,
            LegacyField::ObjectLockConfiguration => TargetResource::ObjectLockConfiguration,
            LegacyField::ReplicationConfiguration => TargetResource::ReplicationConfiguration,
            LegacyField::ServerSideEncryptionConfiguration => {
                TargetResource::ServerSideEncryptionConfiguration
            }
            LegacyField::Versioning => TargetResource::Versioning,
            LegacyField::Website => TargetResource::WebsiteConfiguration,
        }
    }

    pub fn multiplicity(self) -> Multiplicity {
        match self {
            LegacyField::CorsRule | LegacyField::Grant | LegacyField::LifecycleRule => {
                Multiplicity::Repeatable
            }
            LegacyField::AccelerationStatus
            | LegacyField::Acl
            | LegacyField::Policy
            | LegacyField::RequestPayer
            | LegacyField::Logging
            | LegacyField::ObjectLockConfiguration
            | LegacyField::ReplicationConfiguration
            | LegacyField::ServerSideEncryptionConfiguration
            | LegacyField::Versioning
            | LegacyField::Website => Multiplicity::Single,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LegacyField::AccelerationStatus
            | LegacyField::Acl
            | LegacyField::Policy
            | LegacyField::RequestPayer => FieldKind::Attribute,
            LegacyField::CorsRule
            | LegacyField::Grant
            | LegacyField::LifecycleRule
            | LegacyField::Logging
            | LegacyField::ObjectLockConfiguration
            | LegacyField::ReplicationConfiguration
            | LegacyField::ServerSideEncryptionConfiguration
            | LegacyField::Versioning
            | LegacyField::Website => FieldKind::Block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_field_names_are_snake_case() {
        assert_eq!(LegacyField::ServerSideEncryptionConfiguration.as_ref(), "server_side_encryption_configuration");
        assert_eq!(LegacyField::from_str("cors_rule").unwrap(), LegacyField::CorsRule);
        assert!(LegacyField::from_str("bucket").is_err());
    }

    #[test]
    fn test_acl_and_grant_share_a_target() {
        assert_eq!(LegacyField::Acl.target(), LegacyField::Grant.target());
        assert_ne!(LegacyField::Acl.multiplicity(), LegacyField::Grant.multiplicity());
    }

    #[test]
    fn test_only_attributes_are_single_attribute_fields() {
        for field in LegacyField::iter() {
            if field.kind() == FieldKind::Attribute {
                assert_eq!(field.multiplicity(), Multiplicity::Single, "{field}");
            }
        }
    }
}
