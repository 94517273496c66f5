//! In-memory backend for tests.
//!
//! Stores associations in a map and mirrors the service's behavior closely
//! enough for lifecycle and waiter tests: ids are assigned at creation,
//! every update bumps the association version, and delete/describe report
//! not-found for unknown ids. A status script drives what successive
//! describe calls observe, so polling paths can be exercised without a
//! remote service.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::{Association, AssociationConfig, AssociationStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted in-memory backend.
pub struct MockBackend {
    state: Mutex<MockState>,
    describe_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

struct MockState {
    associations: HashMap<String, Association>,
    /// Statuses observed by successive describe calls; the last entry
    /// repeats once the script is exhausted. Empty means "keep whatever
    /// status the record already has".
    statuses: Vec<AssociationStatus>,
    cursor: usize,
    vanished: bool,
    next_id: u64,
}

impl MockBackend {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::with_statuses(Vec::new())
    }

    /// Create a mock whose describe calls walk the given status script.
    pub fn with_statuses(statuses: Vec<AssociationStatus>) -> Self {
        Self {
            state: Mutex::new(MockState {
                associations: HashMap::new(),
                statuses,
                cursor: 0,
                vanished: false,
                next_id: 1,
            }),
            describe_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent describe report not-found, as if the
    /// association disappeared out from under the caller.
    pub fn vanish(&self) {
        self.lock().vanished = true;
    }

    /// Number of describe calls issued so far.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Number of create calls issued so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn record_from(config: &AssociationConfig, id: &str, version: u64) -> Association {
    Association {
        association_id: id.to_string(),
        arn: None,
        name: Some(config.name.clone()),
        association_name: config.association_name.clone(),
        document_version: config.document_version.clone(),
        instance_id: config.instance_id.clone(),
        apply_only_at_cron_interval: config.apply_only_at_cron_interval,
        schedule_expression: config.schedule_expression.clone(),
        parameters: config.parameters.clone(),
        targets: config.targets.clone(),
        output_location: config.output_location.clone(),
        compliance_severity: config.compliance_severity,
        max_concurrency: config.max_concurrency.clone(),
        max_errors: config.max_errors.clone(),
        automation_target_parameter_name: config.automation_target_parameter_name.clone(),
        status: Some(AssociationStatus::Pending),
        association_version: Some(version.to_string()),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn create(&self, config: &AssociationConfig) -> Result<Association> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let id = format!("assoc-{:08x}", state.next_id);
        state.next_id += 1;
        let record = record_from(config, &id, 1);
        state.associations.insert(id, record.clone());
        Ok(record)
    }

    async fn describe(&self, association_id: &str) -> Result<Association> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();

        if state.vanished {
            return Err(Error::NotFound {
                association_id: association_id.to_string(),
            });
        }

        let scripted = if state.statuses.is_empty() {
            None
        } else {
            let index = state.cursor.min(state.statuses.len() - 1);
            state.cursor += 1;
            Some(state.statuses[index])
        };

        let record = state
            .associations
            .get_mut(association_id)
            .ok_or_else(|| Error::NotFound {
                association_id: association_id.to_string(),
            })?;
        if let Some(status) = scripted {
            record.status = Some(status);
        }
        Ok(record.clone())
    }

    async fn update(
        &self,
        association_id: &str,
        config: &AssociationConfig,
    ) -> Result<Association> {
        let mut state = self.lock();
        let record = state
            .associations
            .get_mut(association_id)
            .ok_or_else(|| Error::NotFound {
                association_id: association_id.to_string(),
            })?;

        let version = record
            .association_version
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1)
            + 1;
        let status = record.status;
        *record = record_from(config, association_id, version);
        record.status = status;
        Ok(record.clone())
    }

    async fn delete(&self, association_id: &str) -> Result<()> {
        let mut state = self.lock();
        state
            .associations
            .remove(association_id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound {
                association_id: association_id.to_string(),
            })
    }
}
