//! Orchestrator error types.
//!
//! A polling timeout is deliberately absent here — it is a valid
//! terminal-for-now outcome, not an error (see `CreateOutcome`).

use thiserror::Error;

use storegrid_cluster::ClusterError;
use storegrid_release::InstallError;

/// Result type alias for orchestrator operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors surfaced to the caller of a provisioning operation.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Guardrail refusal. Reported, never retried internally; the client
    /// may retry after capacity frees up.
    #[error("Max store limit reached")]
    QuotaExceeded { limit: usize },

    /// Fatal install failure; the installer diagnostic passes through
    /// verbatim. No rollback of a partially created namespace.
    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}
