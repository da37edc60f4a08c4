//! Domain types for store provisioning.
//!
//! A store is a tenant's isolated application instance: exactly one
//! cluster namespace and one release. The orchestrator never persists
//! these records — status is re-derived from observed cluster state on
//! every list or poll.

use serde::{Deserialize, Serialize};

/// Unique identifier for a store. Equal to the store's namespace.
pub type StoreId = String;

/// A tenant store as observed at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreRecord {
    pub id: StoreId,
    /// Isolation boundary in the cluster. Invariant: `namespace == id`.
    pub namespace: String,
    /// Routable hostname, derived deterministically from `id`.
    pub host: String,
    pub status: StoreStatus,
}

/// Lifecycle status of a store, re-derived from pod state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Requested,
    Installing,
    Ready,
    ProvisioningTimeout,
    Deleted,
}

impl StoreRecord {
    /// Build a record for a freshly observed namespace.
    pub fn observed(id: &str, host: &str, status: StoreStatus) -> Self {
        Self {
            id: id.to_string(),
            namespace: id.to_string(),
            host: host.to_string(),
            status,
        }
    }

    /// Public URL for the store's ingress hostname.
    pub fn url(&self) -> String {
        format!("http://{}", self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_keeps_namespace_equal_to_id() {
        let record = StoreRecord::observed("store-ab12cd", "store-ab12cd.localhost", StoreStatus::Ready);
        assert_eq!(record.namespace, record.id);
    }

    #[test]
    fn url_prepends_scheme() {
        let record =
            StoreRecord::observed("store-ab12cd", "store-ab12cd.localhost", StoreStatus::Installing);
        assert_eq!(record.url(), "http://store-ab12cd.localhost");
    }
}
