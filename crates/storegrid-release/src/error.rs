//! Release manager error types.

use thiserror::Error;

/// Errors from installing or uninstalling a release.
///
/// `Failed` carries the underlying installer diagnostic verbatim — the
/// HTTP layer returns it to the caller unchanged.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to launch helm: {0}")]
    Spawn(String),

    #[error("{diagnostic}")]
    Failed { diagnostic: String },
}
