//! Data model types for the migration engine.
//!
//! - [`LegacyField`]: an argument of the legacy `aws_s3_bucket` resource.
//! - [`TargetResource`]: a standalone v4 resource (`aws_s3_bucket_<suffix>`).
//! - [`ResourceAddress`] / [`ProvenanceRecord`]: `<type>.<name>` pairs linking
//!   synthesized resources back to their parent.
//! - [`RoutingRule`]: a record decoded from the legacy `routing_rules` string.

mod address;
mod field;
mod routing_rule;
mod target;

pub use address::{ProvenanceRecord, ResourceAddress, provenance_csv};
pub use field::{FieldKind, LegacyField, Multiplicity};
pub use routing_rule::{Condition, Redirect, RoutingRule};
pub use target::TargetResource;
