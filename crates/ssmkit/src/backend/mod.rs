//! Backend abstraction for association operations.
//!
//! The [`Backend`] trait defines the interface to the remote service,
//! allowing for different implementations (real AWS SDK client, in-memory
//! mock for testing). Operations receive their client explicitly; nothing
//! is fetched from ambient state.

pub mod mock;
pub mod ssm;

use crate::error::Result;
use crate::types::{Association, AssociationConfig};
use async_trait::async_trait;

/// Backend trait for association operations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Create an association, returning the record the service reported.
    async fn create(&self, config: &AssociationConfig) -> Result<Association>;

    /// Describe an association by id.
    ///
    /// Returns [`crate::Error::NotFound`] when it does not exist; callers
    /// decide whether that is an error on their path.
    async fn describe(&self, association_id: &str) -> Result<Association>;

    /// Replace the mutable fields of an association.
    ///
    /// The service assigns a new association version on every update.
    async fn update(&self, association_id: &str, config: &AssociationConfig)
    -> Result<Association>;

    /// Delete an association.
    ///
    /// Returns [`crate::Error::NotFound`] when it is already gone.
    async fn delete(&self, association_id: &str) -> Result<()>;
}
