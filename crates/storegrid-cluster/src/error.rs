//! Cluster capability error types.

use thiserror::Error;

/// Result type alias for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors that can occur talking to the cluster control plane.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("failed to launch kubectl: {0}")]
    Spawn(String),

    #[error("kubectl failed: {0}")]
    Command(String),

    #[error("unexpected kubectl output: {0}")]
    Parse(String),
}
