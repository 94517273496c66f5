//! Bounded polling for association status transitions.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{Association, AssociationStatus, WaitConfig};
use std::time::Instant;
use tokio::time::sleep;

/// Poll an association until it reaches the desired status or the
/// configured timeout elapses.
///
/// A zero timeout means "do not wait": the function returns `Ok(None)`
/// without issuing a single status query. Otherwise it describes the
/// association at the configured cadence, never sleeping past the
/// deadline, and returns the matching record on success.
///
/// Errors are kept distinct so callers can react:
/// - [`Error::WaitTimeout`] when the deadline elapses first;
/// - [`Error::NotFound`] when the association disappears mid-poll;
/// - [`Error::UnexpectedStatus`] when a terminal status other than the
///   desired one is reached (it will never converge from there);
/// - transport errors propagate immediately without retrying.
///
/// The returned future holds no state beyond the borrowed backend, so
/// callers compose cancellation by dropping it — typically through
/// `tokio::time::timeout` or a `select!` arm.
pub async fn wait_for_status(
    backend: &dyn Backend,
    association_id: &str,
    desired: AssociationStatus,
    config: &WaitConfig,
) -> Result<Option<Association>> {
    if config.timeout.is_zero() {
        return Ok(None);
    }

    let deadline = Instant::now() + config.timeout;
    let mut attempt: u32 = 0;

    loop {
        let association = backend.describe(association_id).await?;

        match association.status {
            Some(status) if status == desired => return Ok(Some(association)),
            Some(AssociationStatus::Failed) if desired == AssociationStatus::Success => {
                return Err(Error::UnexpectedStatus {
                    association_id: association_id.to_string(),
                    status: AssociationStatus::Failed,
                    desired,
                });
            }
            _ => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::WaitTimeout {
                association_id: association_id.to_string(),
                desired,
                waited: config.timeout,
            });
        }

        // Cap the sleep at the remaining time so the final poll lands on
        // the deadline instead of overshooting it.
        let interval = config.interval_for_attempt(attempt).min(deadline - now);
        sleep(interval).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::types::AssociationConfig;
    use std::time::Duration;

    fn fast(timeout_ms: u64) -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(1),
            backoff_factor: 1.0,
            max_interval: Duration::from_millis(5),
        }
    }

    async fn seeded(backend: &MockBackend) -> String {
        let record = backend
            .create(&AssociationConfig::new("AWS-RunShellScript"))
            .await
            .expect("create");
        record.association_id
    }

    #[tokio::test]
    async fn test_zero_timeout_skips_polling() {
        let backend = MockBackend::new();
        let id = seeded(&backend).await;

        let result =
            wait_for_status(&backend, &id, AssociationStatus::Success, &WaitConfig::no_wait())
                .await
                .expect("no wait");

        assert!(result.is_none());
        assert_eq!(backend.describe_calls(), 0);
    }

    #[tokio::test]
    async fn test_reaches_desired_status() {
        let backend = MockBackend::with_statuses(vec![
            AssociationStatus::Pending,
            AssociationStatus::Pending,
            AssociationStatus::Success,
        ]);
        let id = seeded(&backend).await;

        let record = wait_for_status(&backend, &id, AssociationStatus::Success, &fast(500))
            .await
            .expect("waits")
            .expect("record");

        assert_eq!(record.status, Some(AssociationStatus::Success));
        assert_eq!(backend.describe_calls(), 3);
    }

    #[tokio::test]
    async fn test_timeout_when_never_converging() {
        let backend = MockBackend::with_statuses(vec![AssociationStatus::Pending]);
        let id = seeded(&backend).await;

        let started = Instant::now();
        let err = wait_for_status(&backend, &id, AssociationStatus::Success, &fast(30))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::WaitTimeout { .. }));
        // Not before the deadline, and with 1-5ms polls not much after it
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert!(started.elapsed() < Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_failed_is_terminal() {
        let backend = MockBackend::with_statuses(vec![
            AssociationStatus::Pending,
            AssociationStatus::Failed,
        ]);
        let id = seeded(&backend).await;

        let err = wait_for_status(&backend, &id, AssociationStatus::Success, &fast(500))
            .await
            .unwrap_err();

        match err {
            Error::UnexpectedStatus { status, .. } => {
                assert_eq!(status, AssociationStatus::Failed);
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disappearance_is_distinct_from_timeout() {
        let backend = MockBackend::with_statuses(vec![AssociationStatus::Pending]);
        let id = seeded(&backend).await;
        backend.vanish();

        let err = wait_for_status(&backend, &id, AssociationStatus::Success, &fast(500))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
    }
}
