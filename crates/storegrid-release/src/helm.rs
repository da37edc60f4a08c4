//! helm-backed release manager.
//!
//! Installs run as
//! `helm install <release> <chart> --namespace <ns> --create-namespace
//! [-f <values>] [--set k=v ...]`, so the namespace is created as part of
//! the install. On failure the helm stderr becomes the error diagnostic,
//! unedited.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::InstallError;
use crate::{ReleaseManager, ReleaseSpec};

/// `ReleaseManager` implementation that invokes the `helm` binary.
#[derive(Debug, Clone, Default)]
pub struct HelmReleaseManager {
    program: Option<String>,
}

impl HelmReleaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary name or path instead of `helm`.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: Some(program.to_string()),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<std::process::Output, InstallError> {
        debug!(?args, "running helm");
        Command::new(self.program.as_deref().unwrap_or("helm"))
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| InstallError::Spawn(e.to_string()))
    }
}

#[async_trait]
impl ReleaseManager for HelmReleaseManager {
    async fn install(&self, spec: &ReleaseSpec) -> Result<(), InstallError> {
        let mut args = vec![
            "install".to_string(),
            spec.release.clone(),
            spec.chart.clone(),
            "--namespace".to_string(),
            spec.namespace.clone(),
            "--create-namespace".to_string(),
        ];
        if let Some(values) = &spec.values_file {
            args.push("-f".to_string());
            args.push(values.clone());
        }
        for (key, value) in &spec.set_values {
            args.push("--set".to_string());
            args.push(format!("{key}={value}"));
        }

        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(InstallError::Failed {
                diagnostic: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        info!(release = %spec.release, chart = %spec.chart, "release installed");
        Ok(())
    }

    async fn uninstall(&self, release: &str, namespace: &str) -> Result<(), InstallError> {
        let args = vec![
            "uninstall".to_string(),
            release.to_string(),
            "-n".to_string(),
            namespace.to_string(),
        ];
        let output = self.run(args).await?;
        if !output.status.success() {
            return Err(InstallError::Failed {
                diagnostic: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        info!(%release, "release uninstalled");
        Ok(())
    }
}
