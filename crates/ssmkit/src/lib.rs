//! # ssmkit
//!
//! Pure Rust library for managing AWS SSM State Manager associations.
//!
//! This crate provides functionality for:
//! - Creating, reading, updating, and deleting associations
//! - Validating association definitions before any remote call
//! - Waiting, with a bounded and cancellable poll, for an association to
//!   reach a target status
//! - Composing association ARNs from the caller's partition/region/account
//!
//! ## Example
//!
//! ```no_run
//! use ssmkit::{AssociationConfig, Client, Target};
//!
//! # async fn run() -> ssmkit::Result<()> {
//! // Connect using the ambient AWS configuration (env, profile, IMDS)
//! let client = Client::connect().await?;
//!
//! let config = AssociationConfig::new("AWS-RunPatchBaseline")
//!     .with_schedule("cron(0 2 ? * SUN *)")
//!     .with_target(Target::tag("PatchGroup", vec!["linux".to_string()]))
//!     .with_parameter("Operation", "Install");
//!
//! let association = client.create(&config).await?;
//! println!("created {}", association.association_id);
//!
//! // Absence in steady state is a reconciled outcome, not an error
//! if client.read(&association.association_id).await?.is_none() {
//!     println!("already gone");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Waiting
//!
//! Creation can block until the association first applies successfully.
//! Set `wait_for_success_timeout_seconds` on the configuration, or wait
//! explicitly; a zero timeout skips polling entirely.
//!
//! ```no_run
//! use std::time::Duration;
//! # async fn run(client: ssmkit::Client, id: &str) -> ssmkit::Result<()> {
//! client.wait_for_success(id, Duration::from_secs(300)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod lifecycle;
pub mod mapping;
pub mod types;
pub mod validate;
pub mod waiter;

pub use error::{Error, ErrorCategory, Result};
pub use types::{
    Association, AssociationConfig, AssociationStatus, ComplianceSeverity, Identity,
    OutputLocation, Target, WaitConfig,
};

use aws_config::BehaviorVersion;
use backend::Backend;
use std::time::Duration;

/// High-level client for association operations.
///
/// Wraps a backend and the identity scope used for ARN composition. All
/// lifecycle operations go through the backend handle held here; nothing
/// reads ambient global state.
pub struct Client {
    backend: Box<dyn Backend>,
    identity: Identity,
}

impl Client {
    /// Connect using the ambient AWS configuration.
    ///
    /// Resolves region and credentials the standard way (environment,
    /// shared config, instance metadata) and the account id via STS.
    pub async fn connect() -> Result<Self> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let identity = backend::ssm::resolve_identity(&config).await?;
        let backend = backend::ssm::SsmBackend::new(&config);
        Ok(Self {
            backend: Box::new(backend),
            identity,
        })
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>, identity: Identity) -> Self {
        Self { backend, identity }
    }

    /// The identity scope this client composes ARNs with.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Create an association, optionally waiting for it to reach Success.
    pub async fn create(&self, config: &AssociationConfig) -> Result<Association> {
        lifecycle::create(self.backend.as_ref(), &self.identity, config).await
    }

    /// Read an association; `Ok(None)` when it no longer exists.
    pub async fn read(&self, association_id: &str) -> Result<Option<Association>> {
        lifecycle::read(self.backend.as_ref(), &self.identity, association_id).await
    }

    /// Update an association, replacing its mutable fields.
    pub async fn update(
        &self,
        association_id: &str,
        config: &AssociationConfig,
    ) -> Result<Association> {
        lifecycle::update(self.backend.as_ref(), &self.identity, association_id, config).await
    }

    /// Delete an association; deleting one already gone succeeds.
    pub async fn delete(&self, association_id: &str) -> Result<()> {
        lifecycle::delete(self.backend.as_ref(), association_id).await
    }

    /// Wait for an association to reach Success within `timeout`.
    ///
    /// Returns `Ok(None)` without polling when `timeout` is zero.
    pub async fn wait_for_success(
        &self,
        association_id: &str,
        timeout: Duration,
    ) -> Result<Option<Association>> {
        waiter::wait_for_status(
            self.backend.as_ref(),
            association_id,
            AssociationStatus::Success,
            &WaitConfig::with_timeout(timeout),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::mock::MockBackend;

    #[tokio::test]
    async fn test_client_with_mock_backend() {
        let client = Client::with_backend(
            Box::new(MockBackend::new()),
            Identity::for_region("us-east-1", "123456789012"),
        );

        let config = AssociationConfig::new("AWS-RunShellScript");
        let association = client.create(&config).await.expect("creates");
        assert!(association.arn.as_deref().expect("arn").starts_with("arn:aws:ssm:us-east-1"));

        client.delete(&association.association_id).await.expect("deletes");
        assert!(client.read(&association.association_id).await.expect("reads").is_none());
    }

    #[tokio::test]
    async fn test_wait_for_success_zero_timeout() {
        let client = Client::with_backend(
            Box::new(MockBackend::new()),
            Identity::for_region("us-east-1", "123456789012"),
        );

        let waited = client
            .wait_for_success("assoc-00000001", Duration::ZERO)
            .await
            .expect("skips wait");
        assert!(waited.is_none());
    }
}
