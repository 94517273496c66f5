//! Core types for SSM State Manager association management.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Maximum number of target entries the service accepts per association.
pub const MAX_TARGETS: usize = 5;

/// Maximum number of values per target key.
pub const MAX_TARGET_VALUES: usize = 50;

/// Compliance severity assigned to an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplianceSeverity {
    /// Critical severity
    Critical,
    /// High severity
    High,
    /// Medium severity
    Medium,
    /// Low severity
    Low,
    /// No severity assigned
    Unspecified,
}

impl ComplianceSeverity {
    /// Get the wire value for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceSeverity::Critical => "CRITICAL",
            ComplianceSeverity::High => "HIGH",
            ComplianceSeverity::Medium => "MEDIUM",
            ComplianceSeverity::Low => "LOW",
            ComplianceSeverity::Unspecified => "UNSPECIFIED",
        }
    }

    /// Parse a severity from its wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Some(ComplianceSeverity::Critical),
            "HIGH" => Some(ComplianceSeverity::High),
            "MEDIUM" => Some(ComplianceSeverity::Medium),
            "LOW" => Some(ComplianceSeverity::Low),
            "UNSPECIFIED" => Some(ComplianceSeverity::Unspecified),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status reported in an association's overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssociationStatus {
    /// The association has not yet run to completion on its targets.
    Pending,
    /// The association applied successfully.
    Success,
    /// The association failed on at least one target.
    Failed,
}

impl AssociationStatus {
    /// Get the wire value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationStatus::Pending => "Pending",
            AssociationStatus::Success => "Success",
            AssociationStatus::Failed => "Failed",
        }
    }

    /// Parse a status from its wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(AssociationStatus::Pending),
            "Success" => Some(AssociationStatus::Success),
            "Failed" => Some(AssociationStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for AssociationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (key, values) selector identifying which managed instances an
/// association applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target key (e.g., "tag:Environment" or "InstanceIds")
    pub key: String,
    /// Values matched against the key
    pub values: Vec<String>,
}

impl Target {
    /// Create a new target selector.
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Create a target selecting specific instance ids.
    pub fn instance_ids(ids: Vec<String>) -> Self {
        Self::new("InstanceIds", ids)
    }

    /// Create a target selecting instances by tag.
    pub fn tag(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(format!("tag:{}", name.into()), values)
    }
}

/// S3 destination for command output written by an association run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLocation {
    /// Destination bucket name
    pub s3_bucket_name: String,
    /// Optional key prefix inside the bucket
    pub s3_key_prefix: Option<String>,
    /// Optional bucket region
    pub s3_region: Option<String>,
}

impl OutputLocation {
    /// Create an output location for a bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            s3_bucket_name: bucket.into(),
            s3_key_prefix: None,
            s3_region: None,
        }
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.s3_key_prefix = Some(prefix.into());
        self
    }

    /// Set the bucket region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.s3_region = Some(region.into());
        self
    }
}

/// Desired configuration for an association.
///
/// Optional fields left as `None` (and empty `targets`/`parameters`
/// collections) are omitted from requests entirely rather than sent as
/// zero values, so the service applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationConfig {
    /// Name of the SSM document the association applies
    pub name: String,
    /// Human-readable association name
    pub association_name: Option<String>,
    /// Document version to apply ("$LATEST", "$DEFAULT", or a version number)
    pub document_version: Option<String>,
    /// Single instance to target. Deprecated by the service; use `targets`.
    pub instance_id: Option<String>,
    /// Run only on the schedule, never immediately at creation.
    /// `None` omits the flag, `Some(false)` sends an explicit false.
    pub apply_only_at_cron_interval: Option<bool>,
    /// Cron or rate expression controlling when the association runs
    pub schedule_expression: Option<String>,
    /// Document parameters, one value per key
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Target selectors (at most [`MAX_TARGETS`] entries)
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Destination for command output
    pub output_location: Option<OutputLocation>,
    /// Compliance severity
    pub compliance_severity: Option<ComplianceSeverity>,
    /// Maximum concurrent targets, as a count ("10") or percentage ("10%")
    pub max_concurrency: Option<String>,
    /// Maximum allowed errors, as a count ("10") or percentage ("10%")
    pub max_errors: Option<String>,
    /// Automation document parameter receiving the target resource id
    pub automation_target_parameter_name: Option<String>,
    /// Seconds to wait after creation for the association to reach Success.
    /// Zero or absent means "do not wait".
    pub wait_for_success_timeout_seconds: Option<u64>,
}

impl AssociationConfig {
    /// Create a configuration for a document, everything else unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the schedule expression.
    pub fn with_schedule(mut self, expression: impl Into<String>) -> Self {
        self.schedule_expression = Some(expression.into());
        self
    }

    /// Add a target selector.
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Set a document parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// An association as reported by the service, flattened to a flat record.
///
/// Mirrors [`AssociationConfig`] plus the remote-computed fields: the
/// assigned association id, the composed ARN, the association version the
/// service assigns on every update, and the latest overview status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Identifier assigned by the service at creation, immutable thereafter
    pub association_id: String,
    /// Composed resource name (arn:{partition}:ssm:{region}:{account}:association/{id})
    pub arn: Option<String>,
    /// Name of the applied SSM document
    pub name: Option<String>,
    /// Human-readable association name
    pub association_name: Option<String>,
    /// Applied document version
    pub document_version: Option<String>,
    /// Targeted instance, when instance targeting is used
    pub instance_id: Option<String>,
    /// Whether the association runs only on its schedule
    pub apply_only_at_cron_interval: Option<bool>,
    /// Schedule expression
    pub schedule_expression: Option<String>,
    /// Document parameters, one value per key
    pub parameters: BTreeMap<String, String>,
    /// Target selectors, in service-reported order
    pub targets: Vec<Target>,
    /// Output destination
    pub output_location: Option<OutputLocation>,
    /// Compliance severity
    pub compliance_severity: Option<ComplianceSeverity>,
    /// Maximum concurrent targets
    pub max_concurrency: Option<String>,
    /// Maximum allowed errors
    pub max_errors: Option<String>,
    /// Automation target parameter name
    pub automation_target_parameter_name: Option<String>,
    /// Latest overview status, when the service reports a recognized one
    pub status: Option<AssociationStatus>,
    /// Version the service assigned to the current association revision
    pub association_version: Option<String>,
}

/// How long and how often to poll for a status transition.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Total time to wait before giving up. Zero means "do not wait".
    pub timeout: Duration,
    /// Base delay between polls
    pub poll_interval: Duration,
    /// Multiplier applied to the delay after each poll
    pub backoff_factor: f64,
    /// Cap on the delay between polls
    pub max_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::from_secs(5),
            backoff_factor: 1.5,
            max_interval: Duration::from_secs(30),
        }
    }
}

impl WaitConfig {
    /// Create a wait config with the default cadence and the given timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Create a config that never waits.
    pub fn no_wait() -> Self {
        Self::default()
    }

    /// Calculate the poll delay for a given attempt number (0-indexed).
    pub fn interval_for_attempt(&self, attempt: u32) -> Duration {
        let interval = self.poll_interval.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = interval.min(self.max_interval.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

/// Partition, region, and account scope used to compose association ARNs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// AWS partition ("aws", "aws-cn", "aws-us-gov", ...)
    pub partition: String,
    /// Region the client operates in
    pub region: String,
    /// Twelve-digit account id
    pub account_id: String,
}

impl Identity {
    /// Create an identity with an explicit partition.
    pub fn new(
        partition: impl Into<String>,
        region: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            region: region.into(),
            account_id: account_id.into(),
        }
    }

    /// Create an identity, deriving the partition from the region prefix.
    pub fn for_region(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            partition: partition_for_region(&region).to_string(),
            region,
            account_id: account_id.into(),
        }
    }

    /// Compose the ARN for an association id within this scope.
    pub fn association_arn(&self, association_id: &str) -> String {
        format!(
            "arn:{}:ssm:{}:{}:association/{}",
            self.partition, self.region, self.account_id, association_id
        )
    }
}

/// Map a region name to its partition.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        "aws"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip() {
        for severity in [
            ComplianceSeverity::Critical,
            ComplianceSeverity::High,
            ComplianceSeverity::Medium,
            ComplianceSeverity::Low,
            ComplianceSeverity::Unspecified,
        ] {
            assert_eq!(ComplianceSeverity::parse(severity.as_str()), Some(severity));
        }
        assert_eq!(ComplianceSeverity::parse("critical"), Some(ComplianceSeverity::Critical));
        assert_eq!(ComplianceSeverity::parse("SEVERE"), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(AssociationStatus::parse("Pending"), Some(AssociationStatus::Pending));
        assert_eq!(AssociationStatus::parse("Success"), Some(AssociationStatus::Success));
        assert_eq!(AssociationStatus::parse("Failed"), Some(AssociationStatus::Failed));
        // Overview statuses are free-form strings; unrecognized ones are not an error
        assert_eq!(AssociationStatus::parse("Associated"), None);
    }

    #[test]
    fn test_target_constructors() {
        let target = Target::tag("Environment", vec!["prod".to_string()]);
        assert_eq!(target.key, "tag:Environment");
        assert_eq!(target.values, vec!["prod"]);

        let target = Target::instance_ids(vec!["i-0123456789abcdef0".to_string()]);
        assert_eq!(target.key, "InstanceIds");
    }

    #[test]
    fn test_config_builders() {
        let config = AssociationConfig::new("AWS-RunPatchBaseline")
            .with_schedule("cron(0 2 ? * SUN *)")
            .with_target(Target::tag("PatchGroup", vec!["linux".to_string()]))
            .with_parameter("Operation", "Install");

        assert_eq!(config.name, "AWS-RunPatchBaseline");
        assert_eq!(config.schedule_expression.as_deref(), Some("cron(0 2 ? * SUN *)"));
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.parameters.get("Operation").map(String::as_str), Some("Install"));
        assert!(config.association_name.is_none());
    }

    #[test]
    fn test_wait_config_interval_schedule() {
        let config = WaitConfig {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(4),
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(10),
        };

        assert_eq!(config.interval_for_attempt(0), Duration::from_secs(4));
        assert_eq!(config.interval_for_attempt(1), Duration::from_secs(8));
        // Capped at max_interval
        assert_eq!(config.interval_for_attempt(2), Duration::from_secs(10));
        assert_eq!(config.interval_for_attempt(5), Duration::from_secs(10));
    }

    #[test]
    fn test_wait_config_no_wait() {
        assert!(WaitConfig::no_wait().timeout.is_zero());
        assert!(!WaitConfig::with_timeout(Duration::from_secs(30)).timeout.is_zero());
    }

    #[test]
    fn test_association_arn() {
        let identity = Identity::for_region("us-east-1", "123456789012");
        assert_eq!(identity.partition, "aws");
        assert_eq!(
            identity.association_arn("12345678-1234-1234-1234-123456789012"),
            "arn:aws:ssm:us-east-1:123456789012:association/12345678-1234-1234-1234-123456789012"
        );
    }

    #[test]
    fn test_partition_for_region() {
        assert_eq!(partition_for_region("eu-west-2"), "aws");
        assert_eq!(partition_for_region("cn-north-1"), "aws-cn");
        assert_eq!(partition_for_region("us-gov-west-1"), "aws-us-gov");
        assert_eq!(partition_for_region("us-iso-east-1"), "aws-iso");
        assert_eq!(partition_for_region("us-isob-east-1"), "aws-iso-b");
    }
}
