//! Translation between flat association records and the SDK's nested shapes.
//!
//! Expansion builds request inputs from configuration, copying only fields
//! that are present; absent optional fields stay unset so the service
//! applies its own defaults. Flattening maps a service-reported association
//! description back onto the flat record.

use crate::error::{Error, Result};
use crate::types::{
    Association, AssociationConfig, AssociationStatus, ComplianceSeverity, OutputLocation, Target,
};
use aws_sdk_ssm::operation::create_association::CreateAssociationInput;
use aws_sdk_ssm::operation::create_association::builders::CreateAssociationInputBuilder;
use aws_sdk_ssm::operation::update_association::UpdateAssociationInput;
use aws_sdk_ssm::operation::update_association::builders::UpdateAssociationInputBuilder;
use aws_sdk_ssm::types as sdk;
use std::collections::{BTreeMap, HashMap};

/// Build a CreateAssociation input from a configuration.
pub fn expand_create(config: &AssociationConfig) -> CreateAssociationInputBuilder {
    CreateAssociationInput::builder()
        .name(config.name.clone())
        .set_association_name(config.association_name.clone())
        .set_document_version(config.document_version.clone())
        .set_instance_id(config.instance_id.clone())
        .set_apply_only_at_cron_interval(config.apply_only_at_cron_interval)
        .set_schedule_expression(config.schedule_expression.clone())
        .set_parameters(expand_parameters(&config.parameters))
        .set_targets(expand_targets(&config.targets))
        .set_output_location(config.output_location.as_ref().map(expand_output_location))
        .set_compliance_severity(config.compliance_severity.map(expand_severity))
        .set_max_concurrency(config.max_concurrency.clone())
        .set_max_errors(config.max_errors.clone())
        .set_automation_target_parameter_name(config.automation_target_parameter_name.clone())
}

/// Build an UpdateAssociation input from a configuration.
///
/// The service assigns a new association version on every update, so all
/// present mutable fields are sent each time. `instance_id` has no update
/// path; changing it means recreating the association.
pub fn expand_update(
    association_id: &str,
    config: &AssociationConfig,
) -> UpdateAssociationInputBuilder {
    UpdateAssociationInput::builder()
        .association_id(association_id)
        .set_association_name(config.association_name.clone())
        .set_document_version(config.document_version.clone())
        .set_apply_only_at_cron_interval(config.apply_only_at_cron_interval)
        .set_schedule_expression(config.schedule_expression.clone())
        .set_parameters(expand_parameters(&config.parameters))
        .set_targets(expand_targets(&config.targets))
        .set_output_location(config.output_location.as_ref().map(expand_output_location))
        .set_compliance_severity(config.compliance_severity.map(expand_severity))
        .set_max_concurrency(config.max_concurrency.clone())
        .set_max_errors(config.max_errors.clone())
        .set_automation_target_parameter_name(config.automation_target_parameter_name.clone())
}

/// Flatten a service-reported description to a flat record.
///
/// The ARN is not part of the service response; callers compose it from
/// their identity scope.
pub fn flatten_association(desc: &sdk::AssociationDescription) -> Result<Association> {
    let association_id = desc
        .association_id()
        .ok_or_else(|| Error::UnexpectedResponse {
            operation: "DescribeAssociation",
            message: "association description has no association id".to_string(),
        })?
        .to_string();

    Ok(Association {
        association_id,
        arn: None,
        name: desc.name().map(str::to_string),
        association_name: desc.association_name().map(str::to_string),
        document_version: desc.document_version().map(str::to_string),
        instance_id: desc.instance_id().map(str::to_string),
        apply_only_at_cron_interval: Some(desc.apply_only_at_cron_interval()),
        schedule_expression: desc.schedule_expression().map(str::to_string),
        parameters: flatten_parameters(desc.parameters()),
        targets: flatten_targets(desc.targets()),
        output_location: desc.output_location().and_then(flatten_output_location),
        compliance_severity: desc
            .compliance_severity()
            .and_then(|severity| ComplianceSeverity::parse(severity.as_str())),
        max_concurrency: desc.max_concurrency().map(str::to_string),
        max_errors: desc.max_errors().map(str::to_string),
        automation_target_parameter_name: desc
            .automation_target_parameter_name()
            .map(str::to_string),
        status: desc
            .overview()
            .and_then(|overview| overview.status())
            .and_then(AssociationStatus::parse),
        association_version: desc.association_version().map(str::to_string),
    })
}

/// Expand document parameters into the service's one-value-per-key-list form.
fn expand_parameters(parameters: &BTreeMap<String, String>) -> Option<HashMap<String, Vec<String>>> {
    if parameters.is_empty() {
        return None;
    }
    Some(
        parameters
            .iter()
            .map(|(key, value)| (key.clone(), vec![value.clone()]))
            .collect(),
    )
}

/// Flatten service parameters, taking the first value per key.
fn flatten_parameters(parameters: Option<&HashMap<String, Vec<String>>>) -> BTreeMap<String, String> {
    parameters
        .map(|parameters| {
            parameters
                .iter()
                .filter_map(|(key, values)| {
                    values.first().map(|value| (key.clone(), value.clone()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn expand_targets(targets: &[Target]) -> Option<Vec<sdk::Target>> {
    if targets.is_empty() {
        return None;
    }
    Some(
        targets
            .iter()
            .map(|target| {
                sdk::Target::builder()
                    .key(target.key.clone())
                    .set_values(Some(target.values.clone()))
                    .build()
            })
            .collect(),
    )
}

fn flatten_targets(targets: &[sdk::Target]) -> Vec<Target> {
    targets
        .iter()
        .map(|target| Target {
            key: target.key().unwrap_or_default().to_string(),
            values: target.values().to_vec(),
        })
        .collect()
}

fn expand_output_location(location: &OutputLocation) -> sdk::InstanceAssociationOutputLocation {
    let s3 = sdk::S3OutputLocation::builder()
        .output_s3_bucket_name(location.s3_bucket_name.clone())
        .set_output_s3_key_prefix(location.s3_key_prefix.clone())
        .set_output_s3_region(location.s3_region.clone())
        .build();
    sdk::InstanceAssociationOutputLocation::builder()
        .s3_location(s3)
        .build()
}

fn flatten_output_location(
    location: &sdk::InstanceAssociationOutputLocation,
) -> Option<OutputLocation> {
    let s3 = location.s3_location()?;
    Some(OutputLocation {
        s3_bucket_name: s3.output_s3_bucket_name()?.to_string(),
        s3_key_prefix: s3.output_s3_key_prefix().map(str::to_string),
        s3_region: s3.output_s3_region().map(str::to_string),
    })
}

fn expand_severity(severity: ComplianceSeverity) -> sdk::AssociationComplianceSeverity {
    match severity {
        ComplianceSeverity::Critical => sdk::AssociationComplianceSeverity::Critical,
        ComplianceSeverity::High => sdk::AssociationComplianceSeverity::High,
        ComplianceSeverity::Medium => sdk::AssociationComplianceSeverity::Medium,
        ComplianceSeverity::Low => sdk::AssociationComplianceSeverity::Low,
        ComplianceSeverity::Unspecified => sdk::AssociationComplianceSeverity::Unspecified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> AssociationConfig {
        AssociationConfig {
            name: "AWS-RunPatchBaseline".to_string(),
            association_name: Some("patch-fleet".to_string()),
            document_version: Some("$DEFAULT".to_string()),
            instance_id: None,
            apply_only_at_cron_interval: Some(true),
            schedule_expression: Some("cron(0 2 ? * SUN *)".to_string()),
            parameters: BTreeMap::from([
                ("Operation".to_string(), "Install".to_string()),
                ("RebootOption".to_string(), "NoReboot".to_string()),
            ]),
            targets: vec![
                Target::tag("PatchGroup", vec!["linux".to_string(), "bsd".to_string()]),
                Target::instance_ids(vec!["i-0123456789abcdef0".to_string()]),
            ],
            output_location: Some(
                OutputLocation::new("patch-logs")
                    .with_key_prefix("fleet/")
                    .with_region("us-east-1"),
            ),
            compliance_severity: Some(ComplianceSeverity::High),
            max_concurrency: Some("10%".to_string()),
            max_errors: Some("1".to_string()),
            automation_target_parameter_name: None,
            wait_for_success_timeout_seconds: Some(300),
        }
    }

    /// Rebuild a description from the pieces of a create input, the way the
    /// service would echo them back.
    fn description_from(input: &CreateAssociationInput, id: &str) -> sdk::AssociationDescription {
        sdk::AssociationDescription::builder()
            .association_id(id)
            .set_name(input.name.clone())
            .set_association_name(input.association_name.clone())
            .set_document_version(input.document_version.clone())
            .set_instance_id(input.instance_id.clone())
            .set_apply_only_at_cron_interval(input.apply_only_at_cron_interval)
            .set_schedule_expression(input.schedule_expression.clone())
            .set_parameters(input.parameters.clone())
            .set_targets(input.targets.clone())
            .set_output_location(input.output_location.clone())
            .set_compliance_severity(input.compliance_severity.clone())
            .set_max_concurrency(input.max_concurrency.clone())
            .set_max_errors(input.max_errors.clone())
            .set_automation_target_parameter_name(input.automation_target_parameter_name.clone())
            .association_version("1")
            .overview(sdk::AssociationOverview::builder().status("Pending").build())
            .build()
    }

    #[test]
    fn test_absent_optionals_stay_unset() {
        let config = AssociationConfig::new("AWS-RunShellScript");
        let input = expand_create(&config).build().expect("input builds");

        assert_eq!(input.name.as_deref(), Some("AWS-RunShellScript"));
        assert!(input.association_name.is_none());
        assert!(input.document_version.is_none());
        assert!(input.instance_id.is_none());
        assert!(input.schedule_expression.is_none());
        assert!(input.parameters.is_none());
        assert!(input.targets.is_none());
        assert!(input.output_location.is_none());
        assert!(input.compliance_severity.is_none());
        assert!(input.max_concurrency.is_none());
        assert!(input.max_errors.is_none());
        assert!(input.automation_target_parameter_name.is_none());
    }

    #[test]
    fn test_expand_parameters_one_value_per_key() {
        let config = AssociationConfig::new("doc")
            .with_parameter("commands", "uptime")
            .with_parameter("workingDirectory", "/tmp");
        let input = expand_create(&config).build().expect("input builds");

        let parameters = input.parameters.expect("parameters set");
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters["commands"], vec!["uptime"]);
        assert_eq!(parameters["workingDirectory"], vec!["/tmp"]);
    }

    #[test]
    fn test_round_trip_preserves_config() {
        let config = full_config();
        let input = expand_create(&config).build().expect("input builds");
        let desc = description_from(&input, "assoc-00000001");

        let record = flatten_association(&desc).expect("flattens");

        assert_eq!(record.association_id, "assoc-00000001");
        assert_eq!(record.name.as_deref(), Some("AWS-RunPatchBaseline"));
        assert_eq!(record.association_name, config.association_name);
        assert_eq!(record.document_version, config.document_version);
        assert_eq!(record.apply_only_at_cron_interval, Some(true));
        assert_eq!(record.schedule_expression, config.schedule_expression);
        assert_eq!(record.parameters, config.parameters);
        // Target order survives the trip
        assert_eq!(record.targets, config.targets);
        assert_eq!(record.output_location, config.output_location);
        assert_eq!(record.compliance_severity, config.compliance_severity);
        assert_eq!(record.max_concurrency, config.max_concurrency);
        assert_eq!(record.max_errors, config.max_errors);
        assert_eq!(record.status, Some(AssociationStatus::Pending));
        assert_eq!(record.association_version.as_deref(), Some("1"));
    }

    #[test]
    fn test_round_trip_at_target_caps() {
        let mut config = AssociationConfig::new("doc");
        config.targets = (0..crate::types::MAX_TARGETS)
            .map(|i| {
                Target::new(
                    format!("tag:Group{i}"),
                    (0..crate::types::MAX_TARGET_VALUES)
                        .map(|j| format!("value-{i}-{j}"))
                        .collect(),
                )
            })
            .collect();

        let input = expand_create(&config).build().expect("input builds");
        let desc = description_from(&input, "assoc-00000002");
        let record = flatten_association(&desc).expect("flattens");

        assert_eq!(record.targets, config.targets);
    }

    #[test]
    fn test_flatten_missing_output_location() {
        let desc = sdk::AssociationDescription::builder()
            .association_id("assoc-00000003")
            .name("doc")
            .build();
        let record = flatten_association(&desc).expect("flattens");

        assert!(record.output_location.is_none());
        assert!(record.targets.is_empty());
        assert!(record.parameters.is_empty());
        assert!(record.status.is_none());
    }

    #[test]
    fn test_flatten_requires_association_id() {
        let desc = sdk::AssociationDescription::builder().name("doc").build();
        assert!(flatten_association(&desc).is_err());
    }

    #[test]
    fn test_update_input_has_no_instance_id() {
        let mut config = full_config();
        config.instance_id = Some("i-0123456789abcdef0".to_string());
        let input = expand_update("assoc-00000004", &config)
            .build()
            .expect("input builds");

        assert_eq!(input.association_id.as_deref(), Some("assoc-00000004"));
        assert_eq!(input.association_name, config.association_name);
        assert_eq!(input.max_concurrency, config.max_concurrency);
    }

    #[test]
    fn test_severity_mapping() {
        let input = expand_create(
            &AssociationConfig {
                compliance_severity: Some(ComplianceSeverity::Critical),
                ..AssociationConfig::new("doc")
            },
        )
        .build()
        .expect("input builds");

        assert_eq!(
            input.compliance_severity,
            Some(sdk::AssociationComplianceSeverity::Critical)
        );
    }
}
