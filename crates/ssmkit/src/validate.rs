//! Pre-flight validation of association configuration.
//!
//! Mirrors the constraints the service enforces so malformed definitions
//! fail locally, before any remote call.

use crate::error::{Error, Result};
use crate::types::{AssociationConfig, MAX_TARGET_VALUES, MAX_TARGETS};
use regex::Regex;
use std::sync::LazyLock;

static ASSOCIATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-.]{3,128}$").expect("hard-coded regex"));

static DOCUMENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\$LATEST|\$DEFAULT|[1-9][0-9]*)$").expect("hard-coded regex"));

static MAX_CONCURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]*|[1-9][0-9]%|[1-9]%|100%)$").expect("hard-coded regex"));

static MAX_ERRORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]*|0|[1-9][0-9]%|[0-9]%|100%)$").expect("hard-coded regex"));

/// Validate an association configuration.
///
/// Returns the first violation found, naming the offending field.
pub fn validate(config: &AssociationConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::validation("name", "a document name is required"));
    }

    if let Some(name) = &config.association_name {
        if !ASSOCIATION_NAME.is_match(name) {
            return Err(Error::validation(
                "association_name",
                "must be 3-128 alphanumeric, underscore, hyphen, or period characters",
            ));
        }
    }

    if let Some(version) = &config.document_version {
        if !DOCUMENT_VERSION.is_match(version) {
            return Err(Error::validation(
                "document_version",
                "must be $LATEST, $DEFAULT, or a version number",
            ));
        }
    }

    if let Some(value) = &config.max_concurrency {
        if !MAX_CONCURRENCY.is_match(value) {
            return Err(Error::validation(
                "max_concurrency",
                "must be a number (e.g. 10) or a percentage including the percent sign (e.g. 10%)",
            ));
        }
    }

    if let Some(value) = &config.max_errors {
        if !MAX_ERRORS.is_match(value) {
            return Err(Error::validation(
                "max_errors",
                "must be a number (e.g. 10) or a percentage including the percent sign (e.g. 10%)",
            ));
        }
    }

    if let Some(expression) = &config.schedule_expression {
        check_len("schedule_expression", expression, 1, 256)?;
    }

    if let Some(name) = &config.automation_target_parameter_name {
        check_len("automation_target_parameter_name", name, 1, 50)?;
    }

    if config.targets.len() > MAX_TARGETS {
        return Err(Error::validation(
            "targets",
            format!("at most {MAX_TARGETS} target entries are allowed"),
        ));
    }

    for target in &config.targets {
        check_len("targets.key", &target.key, 1, 163)?;
        if target.values.len() > MAX_TARGET_VALUES {
            return Err(Error::validation(
                "targets.values",
                format!("at most {MAX_TARGET_VALUES} values are allowed per target key"),
            ));
        }
    }

    if let Some(location) = &config.output_location {
        check_len("output_location.s3_bucket_name", &location.s3_bucket_name, 3, 63)?;
        if let Some(prefix) = &location.s3_key_prefix {
            check_len("output_location.s3_key_prefix", prefix, 0, 500)?;
        }
        if let Some(region) = &location.s3_region {
            check_len("output_location.s3_region", region, 3, 20)?;
        }
    }

    Ok(())
}

fn check_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Error::validation(
            field,
            format!("length must be between {min} and {max} characters, got {len}"),
        ));
    }
    Ok(())
}
