//! Association lifecycle operations.
//!
//! Each operation is a single reconciliation step: validate the
//! configuration, issue the remote call, optionally wait for convergence,
//! and read the result back into a flat record. Operations are independent
//! and share no state; the backend and identity scope are passed in
//! explicitly.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{Association, AssociationConfig, AssociationStatus, Identity, WaitConfig};
use crate::{validate, waiter};
use log::{debug, warn};
use std::time::Duration;

/// Create an association and return its record.
///
/// When `wait_for_success_timeout_seconds` is set and non-zero, blocks
/// until the association reaches `Success` or the timeout elapses. The
/// final record comes from a read-back so remote-computed fields reflect
/// what the service stored; the association going missing on that
/// read-back is a hard error, unlike a steady-state [`read`].
pub async fn create(
    backend: &dyn Backend,
    identity: &Identity,
    config: &AssociationConfig,
) -> Result<Association> {
    validate::validate(config)?;

    debug!("creating association for document {}", config.name);
    let created = backend.create(config).await?;
    debug!("created association {}", created.association_id);

    let wait_secs = config.wait_for_success_timeout_seconds.unwrap_or(0);
    if wait_secs > 0 {
        let wait = WaitConfig::with_timeout(Duration::from_secs(wait_secs));
        waiter::wait_for_status(
            backend,
            &created.association_id,
            AssociationStatus::Success,
            &wait,
        )
        .await?;
    }

    let mut association = backend.describe(&created.association_id).await?;
    association.arn = Some(identity.association_arn(&association.association_id));
    Ok(association)
}

/// Read an association in steady state.
///
/// Returns `Ok(None)` when the association no longer exists, so callers
/// clear their record instead of failing: absence is a reconciled state,
/// not an error, outside of creation.
pub async fn read(
    backend: &dyn Backend,
    identity: &Identity,
    association_id: &str,
) -> Result<Option<Association>> {
    debug!("reading association {association_id}");
    match backend.describe(association_id).await {
        Ok(mut association) => {
            association.arn = Some(identity.association_arn(&association.association_id));
            Ok(Some(association))
        }
        Err(Error::NotFound { .. }) => {
            warn!("association {association_id} not found, clearing record");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Update an association and return its refreshed record.
///
/// The service versions every update, so all present mutable fields are
/// sent wholesale rather than diffed.
pub async fn update(
    backend: &dyn Backend,
    identity: &Identity,
    association_id: &str,
    config: &AssociationConfig,
) -> Result<Association> {
    validate::validate(config)?;

    debug!("updating association {association_id}");
    backend.update(association_id, config).await?;

    let mut association = backend.describe(association_id).await?;
    association.arn = Some(identity.association_arn(&association.association_id));
    Ok(association)
}

/// Delete an association. Deleting one that is already gone succeeds.
pub async fn delete(backend: &dyn Backend, association_id: &str) -> Result<()> {
    debug!("deleting association {association_id}");
    match backend.delete(association_id).await {
        Ok(()) => Ok(()),
        Err(err) if err.is_ignorable() => {
            debug!("association {association_id} already absent");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
