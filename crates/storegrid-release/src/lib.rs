//! storegrid-release — the declarative release manager capability.
//!
//! A release is a named installation of a packaged application template
//! into a namespace, parameterized by override values. The orchestrator
//! holds the manager as a capability trait; the production implementation
//! ([`HelmReleaseManager`]) shells out to `helm`, tests use
//! [`FakeReleases`].

pub mod error;
pub mod fake;
pub mod helm;

pub use error::InstallError;
pub use fake::FakeReleases;
pub use helm::HelmReleaseManager;

use async_trait::async_trait;

/// Everything needed to install one store's release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSpec {
    /// Release name. For stores this equals the store id.
    pub release: String,
    /// Chart reference (path or repo reference).
    pub chart: String,
    /// Target namespace, created on demand.
    pub namespace: String,
    /// Optional values file applied first.
    pub values_file: Option<String>,
    /// `key=value` overrides applied on top of the values file.
    pub set_values: Vec<(String, String)>,
}

/// Capability interface over the release manager.
#[async_trait]
pub trait ReleaseManager: Send + Sync {
    /// Install a release. Failure is fatal for the request; the
    /// diagnostic is surfaced to the caller verbatim and no rollback of
    /// partially created resources is attempted.
    async fn install(&self, spec: &ReleaseSpec) -> Result<(), InstallError>;

    /// Uninstall a release. Callers treat this as best-effort.
    async fn uninstall(&self, release: &str, namespace: &str) -> Result<(), InstallError>;
}
