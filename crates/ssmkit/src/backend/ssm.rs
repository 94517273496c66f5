//! Real AWS backend using the AWS SDK for Rust.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::mapping;
use crate::types::{Association, AssociationConfig, Identity};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Backend that issues real SSM API calls.
pub struct SsmBackend {
    client: Client,
}

impl SsmBackend {
    /// Create a backend from shared AWS configuration.
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl Backend for SsmBackend {
    async fn create(&self, config: &AssociationConfig) -> Result<Association> {
        let resp = mapping::expand_create(config)
            .send_with(&self.client)
            .await
            .map_err(|err| classify("CreateAssociation", Some(&config.name), err))?;

        let desc = resp
            .association_description()
            .ok_or_else(|| Error::UnexpectedResponse {
                operation: "CreateAssociation",
                message: "response has no association description".to_string(),
            })?;
        mapping::flatten_association(desc)
    }

    async fn describe(&self, association_id: &str) -> Result<Association> {
        let resp = self
            .client
            .describe_association()
            .association_id(association_id)
            .send()
            .await
            .map_err(|err| classify("DescribeAssociation", Some(association_id), err))?;

        let desc = resp
            .association_description()
            .ok_or_else(|| Error::UnexpectedResponse {
                operation: "DescribeAssociation",
                message: "response has no association description".to_string(),
            })?;
        mapping::flatten_association(desc)
    }

    async fn update(
        &self,
        association_id: &str,
        config: &AssociationConfig,
    ) -> Result<Association> {
        let resp = mapping::expand_update(association_id, config)
            .send_with(&self.client)
            .await
            .map_err(|err| classify("UpdateAssociation", Some(association_id), err))?;

        let desc = resp
            .association_description()
            .ok_or_else(|| Error::UnexpectedResponse {
                operation: "UpdateAssociation",
                message: "response has no association description".to_string(),
            })?;
        mapping::flatten_association(desc)
    }

    async fn delete(&self, association_id: &str) -> Result<()> {
        self.client
            .delete_association()
            .association_id(association_id)
            .send()
            .await
            .map_err(|err| classify("DeleteAssociation", Some(association_id), err))?;
        Ok(())
    }
}

/// Resolve the identity scope (partition, region, account) used for ARN
/// composition, via STS GetCallerIdentity.
pub async fn resolve_identity(config: &SdkConfig) -> Result<Identity> {
    let region = config.region().ok_or(Error::NoRegion)?.to_string();

    let sts = aws_sdk_sts::Client::new(config);
    let caller = sts
        .get_caller_identity()
        .send()
        .await
        .map_err(|err| classify("GetCallerIdentity", None, err))?;

    let account_id = caller
        .account()
        .ok_or_else(|| Error::UnexpectedResponse {
            operation: "GetCallerIdentity",
            message: "response has no account id".to_string(),
        })?
        .to_string();

    Ok(Identity::for_region(region, account_id))
}

/// Map an SDK error onto the crate's taxonomy.
///
/// Service errors are classified by their API error code; everything that
/// never produced a service response is a transport failure.
fn classify<E, R>(operation: &'static str, subject: Option<&str>, err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(context) => {
            let service_err = context.err();
            Error::from_api_code(operation, service_err.code(), service_err.message(), subject)
        }
        other => Error::Network {
            operation,
            message: DisplayErrorContext(&other).to_string(),
        },
    }
}
