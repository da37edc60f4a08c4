//! In-memory release manager for tests.
//!
//! Installs materialize a namespace in a linked [`FakeCluster`], matching
//! `helm install --create-namespace` as the orchestrator observes it.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use storegrid_cluster::FakeCluster;

use crate::error::InstallError;
use crate::{ReleaseManager, ReleaseSpec};

#[derive(Debug, Default)]
struct FakeState {
    installs: Vec<ReleaseSpec>,
    uninstalls: Vec<String>,
    fail_with: Option<String>,
    ready_after_polls: u32,
}

/// Records install/uninstall calls and drives the linked cluster.
#[derive(Debug, Clone)]
pub struct FakeReleases {
    cluster: FakeCluster,
    state: Arc<Mutex<FakeState>>,
}

impl FakeReleases {
    pub fn new(cluster: FakeCluster) -> Self {
        Self {
            cluster,
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Make every subsequent install fail with this diagnostic.
    pub fn fail_installs_with(&self, diagnostic: &str) {
        self.state.lock().unwrap().fail_with = Some(diagnostic.to_string());
    }

    /// Installed namespaces report ready only after `polls` readiness
    /// samples.
    pub fn set_ready_after_polls(&self, polls: u32) {
        self.state.lock().unwrap().ready_after_polls = polls;
    }

    pub fn install_count(&self) -> usize {
        self.state.lock().unwrap().installs.len()
    }

    pub fn installs(&self) -> Vec<ReleaseSpec> {
        self.state.lock().unwrap().installs.clone()
    }

    pub fn uninstalled(&self) -> Vec<String> {
        self.state.lock().unwrap().uninstalls.clone()
    }
}

#[async_trait]
impl ReleaseManager for FakeReleases {
    async fn install(&self, spec: &ReleaseSpec) -> Result<(), InstallError> {
        let ready_after = {
            let mut state = self.state.lock().unwrap();
            if let Some(diagnostic) = &state.fail_with {
                return Err(InstallError::Failed {
                    diagnostic: diagnostic.clone(),
                });
            }
            state.installs.push(spec.clone());
            state.ready_after_polls
        };
        self.cluster
            .add_namespace_ready_after(&spec.namespace, ready_after);
        Ok(())
    }

    async fn uninstall(&self, release: &str, _namespace: &str) -> Result<(), InstallError> {
        self.state
            .lock()
            .unwrap()
            .uninstalls
            .push(release.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storegrid_cluster::ClusterClient;

    fn spec(id: &str) -> ReleaseSpec {
        ReleaseSpec {
            release: id.to_string(),
            chart: "./helm/store".to_string(),
            namespace: id.to_string(),
            values_file: None,
            set_values: vec![],
        }
    }

    #[tokio::test]
    async fn install_creates_namespace() {
        let cluster = FakeCluster::new();
        let releases = FakeReleases::new(cluster.clone());

        releases.install(&spec("store-a")).await.unwrap();
        assert!(cluster.namespace_exists("store-a").await.unwrap());
        assert_eq!(releases.install_count(), 1);
    }

    #[tokio::test]
    async fn failing_install_leaves_cluster_untouched() {
        let cluster = FakeCluster::new();
        let releases = FakeReleases::new(cluster.clone());
        releases.fail_installs_with("chart not found");

        let err = releases.install(&spec("store-a")).await.unwrap_err();
        assert_eq!(err.to_string(), "chart not found");
        assert!(!cluster.namespace_exists("store-a").await.unwrap());
        assert_eq!(releases.install_count(), 0);
    }

    #[tokio::test]
    async fn uninstall_is_recorded() {
        let releases = FakeReleases::new(FakeCluster::new());
        releases.uninstall("store-a", "store-a").await.unwrap();
        assert_eq!(releases.uninstalled(), vec!["store-a"]);
    }
}
