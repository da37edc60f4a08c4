//! In-memory cluster for tests.
//!
//! Mirrors the observable behavior the orchestrator depends on:
//! namespaces appear when a release is installed, pods converge to ready
//! after a configurable number of polls, and deletion is idempotent.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ClusterResult;
use crate::{ClusterClient, PodStatus};

#[derive(Debug)]
struct FakeNamespace {
    pods: Vec<PodStatus>,
    /// Polls remaining before pods report ready.
    pending_polls: u32,
}

/// Shared, clonable in-memory cluster state.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    inner: Arc<Mutex<BTreeMap<String, FakeNamespace>>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace with a single pod that is ready immediately.
    pub fn add_namespace(&self, name: &str) {
        self.add_namespace_ready_after(name, 0);
    }

    /// Create a namespace whose pod reports ready only after `polls`
    /// readiness samples have been taken.
    pub fn add_namespace_ready_after(&self, name: &str, polls: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            name.to_string(),
            FakeNamespace {
                pods: vec![PodStatus {
                    name: format!("{name}-pod-0"),
                    ready_containers: 1,
                    total_containers: 1,
                }],
                pending_polls: polls,
            },
        );
    }

    /// Create a namespace with explicit pod statuses that never change.
    pub fn add_namespace_with_pods(&self, name: &str, pods: Vec<PodStatus>) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            name.to_string(),
            FakeNamespace {
                pods,
                pending_polls: 0,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().unwrap().contains_key(name)
    }

    pub fn namespace_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list_namespaces(&self) -> ClusterResult<Vec<String>> {
        Ok(self.inner.lock().unwrap().keys().cloned().collect())
    }

    async fn namespace_exists(&self, name: &str) -> ClusterResult<bool> {
        Ok(self.contains(name))
    }

    async fn list_pods(&self, namespace: &str) -> ClusterResult<Vec<PodStatus>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(ns) = inner.get_mut(namespace) else {
            return Ok(Vec::new());
        };
        if ns.pending_polls > 0 {
            ns.pending_polls -= 1;
            // Not yet converged: report containers present but unready.
            return Ok(ns
                .pods
                .iter()
                .map(|p| PodStatus {
                    name: p.name.clone(),
                    ready_containers: 0,
                    total_containers: p.total_containers,
                })
                .collect());
        }
        Ok(ns.pods.clone())
    }

    async fn delete_namespace(&self, name: &str) -> ClusterResult<()> {
        // Deleting an absent namespace is a no-op, like the real cluster
        // from the orchestrator's best-effort point of view.
        self.inner.lock().unwrap().remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::all_pods_ready;

    #[tokio::test]
    async fn namespace_appears_and_disappears() {
        let cluster = FakeCluster::new();
        assert!(!cluster.namespace_exists("store-a").await.unwrap());

        cluster.add_namespace("store-a");
        assert!(cluster.namespace_exists("store-a").await.unwrap());
        assert_eq!(cluster.list_namespaces().await.unwrap(), vec!["store-a"]);

        cluster.delete_namespace("store-a").await.unwrap();
        assert!(!cluster.namespace_exists("store-a").await.unwrap());
    }

    #[tokio::test]
    async fn pods_converge_after_configured_polls() {
        let cluster = FakeCluster::new();
        cluster.add_namespace_ready_after("store-a", 2);

        let first = cluster.list_pods("store-a").await.unwrap();
        assert!(!all_pods_ready(&first));
        let second = cluster.list_pods("store-a").await.unwrap();
        assert!(!all_pods_ready(&second));
        let third = cluster.list_pods("store-a").await.unwrap();
        assert!(all_pods_ready(&third));
    }

    #[tokio::test]
    async fn unknown_namespace_has_no_pods() {
        let cluster = FakeCluster::new();
        assert!(cluster.list_pods("store-missing").await.unwrap().is_empty());
    }
}
