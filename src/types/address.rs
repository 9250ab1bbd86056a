//! Resource addresses and the provenance trail of synthesized resources.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// A `<type>.<name>` resource address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceAddress {
    resource_type: String,
    name: String,
}

impl ResourceAddress {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ResourceAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Links a synthesized resource back to the legacy resource it was split from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub address: ResourceAddress,
    pub parent: ResourceAddress,
}

impl ProvenanceRecord {
    pub fn new(address: ResourceAddress, parent: ResourceAddress) -> Self {
        Self { address, parent }
    }
}

/// Renders as one CSV line: `aws_s3_bucket_acl.test_acl,aws_s3_bucket.test`.
impl Display for ProvenanceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{},{}", self.address, self.parent)
    }
}

/// Render a provenance stream as CSV, one record per line.
pub fn provenance_csv(records: &[ProvenanceRecord]) -> String {
    records.iter().map(|record| format!("{record}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_address_display() {
        let address = ResourceAddress::new("aws_s3_bucket", "logs");
        assert_eq!(address.to_string(), "aws_s3_bucket.logs");
        assert_eq!(address.resource_type(), "aws_s3_bucket");
        assert_eq!(address.name(), "logs");
    }

    #[test]
    fn test_provenance_csv() {
        let parent = ResourceAddress::new("aws_s3_bucket", "test");
        let records = vec![
            ProvenanceRecord::new(
                ResourceAddress::new("aws_s3_bucket_acl", "test_acl"),
                parent.clone(),
            ),
            ProvenanceRecord::new(
                ResourceAddress::new("aws_s3_bucket_versioning", "test_versioning"),
                parent,
            ),
        ];
        assert_snapshot!(provenance_csv(&records).trim_end(), @r"
        aws_s3_bucket_acl.test_acl,aws_s3_bucket.test
        aws_s3_bucket_versioning.test_versioning,aws_s3_bucket.test
        ");
    }
}
