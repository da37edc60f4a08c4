//! The provisioning orchestrator — create/list/delete workflows.
//!
//! Create: admission under the guardrail gate, identity allocation,
//! idempotency probe, install, bounded readiness poll, audit. List:
//! classify every tenant namespace from live pod state. Delete:
//! unconditional best-effort teardown, always audited.
//!
//! No state is kept between calls. A store "exists" exactly while a
//! namespace with its id exists in the cluster.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use store_core::{ProvisionConfig, StoreRecord, StoreStatus};
use storegrid_audit::{AuditAction, AuditLog};
use storegrid_cluster::{ClusterClient, all_pods_ready};
use storegrid_release::{ReleaseManager, ReleaseSpec};

use crate::error::{ProvisionError, ProvisionResult};
use crate::guardrail::AdmissionController;
use crate::identity::{IdentityAllocator, RandomIdentity, host_for};
use crate::poller::{PollBudget, PollOutcome, wait_until_ready};

/// Terminal outcome of one create request.
///
/// All three are success-shaped: an existing namespace is a designed
/// idempotent no-op, and a polling timeout still yields a valid,
/// listable store.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Ready(StoreRecord),
    AlreadyExists(StoreRecord),
    ProvisioningTimeout(StoreRecord),
}

impl CreateOutcome {
    pub fn record(&self) -> &StoreRecord {
        match self {
            CreateOutcome::Ready(r)
            | CreateOutcome::AlreadyExists(r)
            | CreateOutcome::ProvisioningTimeout(r) => r,
        }
    }
}

/// Composes guardrail, identity, cluster, release manager, poller, and
/// audit log into the store lifecycle workflows.
pub struct Orchestrator {
    config: ProvisionConfig,
    cluster: Arc<dyn ClusterClient>,
    releases: Arc<dyn ReleaseManager>,
    admission: AdmissionController,
    identity: Arc<dyn IdentityAllocator>,
    audit: AuditLog,
    /// Serializes create/delete for the same store id.
    store_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Orchestrator {
    pub fn new(
        config: ProvisionConfig,
        cluster: Arc<dyn ClusterClient>,
        releases: Arc<dyn ReleaseManager>,
        audit: AuditLog,
    ) -> Self {
        let identity = Arc::new(RandomIdentity::new(
            &config.namespace_prefix,
            &config.domain,
        ));
        let admission = AdmissionController::new(config.max_stores);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            cluster,
            releases,
            admission,
            identity,
            audit,
            store_locks: Mutex::new(HashMap::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Replace the id allocator (deterministic ids in tests).
    pub fn with_identity(mut self, identity: Arc<dyn IdentityAllocator>) -> Self {
        self.identity = identity;
        self
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Cancel in-flight readiness polls; used on daemon shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Provision a new store end to end.
    pub async fn create_store(&self) -> ProvisionResult<CreateOutcome> {
        // Admission: sample the cluster and reserve inside the gate so
        // concurrent creates cannot over-admit on stale counts.
        let ticket = {
            let _gate = self.admission.gate().await;
            let observed = self.tenant_count().await?;
            match self.admission.reserve(observed) {
                Some(ticket) => ticket,
                None => {
                    warn!(
                        observed,
                        limit = self.admission.limit(),
                        "create refused by guardrail"
                    );
                    return Err(ProvisionError::QuotaExceeded {
                        limit: self.admission.limit(),
                    });
                }
            }
        };

        let identity = self.identity.allocate();
        let lock = self.store_lock(&identity.id).await;
        let _guard = lock.lock().await;

        // Idempotency probe: almost always a miss with random ids; its
        // purpose is retried requests that must not double-provision.
        if self.cluster.namespace_exists(&identity.id).await? {
            drop(ticket);
            info!(store_id = %identity.id, "namespace already present, returning existing store");
            let status = self.classify(&identity.id).await?;
            return Ok(CreateOutcome::AlreadyExists(StoreRecord::observed(
                &identity.id,
                &identity.host,
                status,
            )));
        }

        let spec = ReleaseSpec {
            release: identity.id.clone(),
            chart: self.config.chart.clone(),
            namespace: identity.id.clone(),
            values_file: self.config.values_file.clone(),
            set_values: vec![(self.config.host_value_key.clone(), identity.host.clone())],
        };
        info!(store_id = %identity.id, chart = %spec.chart, "installing store release");
        self.releases.install(&spec).await?;
        // Namespace is observable now; later admission samples count it.
        drop(ticket);

        let budget = PollBudget {
            attempts: self.config.poll_attempts,
            interval: self.config.poll_interval(),
        };
        let outcome = wait_until_ready(
            Arc::clone(&self.cluster),
            &identity.id,
            budget,
            self.shutdown_rx.clone(),
        )
        .await;

        match outcome {
            PollOutcome::Ready => {
                self.audit.record(AuditAction::Created, &identity.id);
                info!(store_id = %identity.id, host = %identity.host, "store ready");
                Ok(CreateOutcome::Ready(StoreRecord::observed(
                    &identity.id,
                    &identity.host,
                    StoreStatus::Ready,
                )))
            }
            PollOutcome::TimedOut | PollOutcome::Cancelled => {
                info!(
                    store_id = %identity.id,
                    attempts = budget.attempts,
                    "store not ready within polling budget"
                );
                Ok(CreateOutcome::ProvisioningTimeout(StoreRecord::observed(
                    &identity.id,
                    &identity.host,
                    StoreStatus::ProvisioningTimeout,
                )))
            }
        }
    }

    /// Every tenant namespace, classified from live pod state. No memory
    /// of past timeouts is kept — a store that timed out on create shows
    /// up Ready here once its pods converge.
    pub async fn list_stores(&self) -> ProvisionResult<Vec<StoreRecord>> {
        let namespaces = self.cluster.list_namespaces().await?;
        let mut stores = Vec::new();
        for namespace in namespaces {
            if !namespace.starts_with(&self.config.namespace_prefix) {
                continue;
            }
            let status = self.classify(&namespace).await?;
            let host = host_for(&namespace, &self.config.domain);
            stores.push(StoreRecord::observed(&namespace, &host, status));
        }
        Ok(stores)
    }

    /// Tear down a store: uninstall the release and delete the
    /// namespace, best-effort and unconditional. Always records
    /// `Deleted`, even when nothing existed — delete is idempotent by
    /// omission.
    pub async fn delete_store(&self, store_id: &str) {
        let lock = self.store_lock(store_id).await;
        let _guard = lock.lock().await;

        if let Err(e) = self.releases.uninstall(store_id, store_id).await {
            warn!(%store_id, error = %e, "release uninstall failed, continuing");
        }
        if let Err(e) = self.cluster.delete_namespace(store_id).await {
            warn!(%store_id, error = %e, "namespace deletion failed, continuing");
        }
        self.audit.record(AuditAction::Deleted, store_id);
        info!(%store_id, "store deleted");
    }

    /// Ready if every pod reports all containers ready, Installing
    /// otherwise.
    async fn classify(&self, namespace: &str) -> ProvisionResult<StoreStatus> {
        let pods = self.cluster.list_pods(namespace).await?;
        if all_pods_ready(&pods) {
            Ok(StoreStatus::Ready)
        } else {
            Ok(StoreStatus::Installing)
        }
    }

    async fn tenant_count(&self) -> ProvisionResult<usize> {
        let namespaces = self.cluster.list_namespaces().await?;
        Ok(namespaces
            .iter()
            .filter(|ns| ns.starts_with(&self.config.namespace_prefix))
            .count())
    }

    async fn store_lock(&self, store_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.store_locks.lock().await;
        Arc::clone(
            locks
                .entry(store_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
