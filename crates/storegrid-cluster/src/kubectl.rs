//! kubectl-backed cluster client.
//!
//! Every call shells out to `kubectl` with a jsonpath output template and
//! parses the result. Calls run through `tokio::process`, so a slow
//! apiserver suspends only the calling task.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ClusterError, ClusterResult};
use crate::{ClusterClient, PodStatus};

/// Per-pod readiness template: one `name=<ready flags>` line per pod.
const POD_READY_JSONPATH: &str =
    r#"jsonpath={range .items[*]}{.metadata.name}{"="}{.status.containerStatuses[*].ready}{"\n"}{end}"#;

/// `ClusterClient` implementation that invokes the `kubectl` binary.
#[derive(Debug, Clone, Default)]
pub struct KubectlClient {
    /// Binary to invoke; overridable for wrapper scripts.
    program: Option<String>,
}

impl KubectlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary name or path instead of `kubectl`.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: Some(program.to_string()),
        }
    }

    fn command(&self) -> Command {
        Command::new(self.program.as_deref().unwrap_or("kubectl"))
    }

    async fn run(&self, args: &[&str]) -> ClusterResult<std::process::Output> {
        debug!(?args, "running kubectl");
        self.command()
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ClusterError::Spawn(e.to_string()))
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    async fn list_namespaces(&self) -> ClusterResult<Vec<String>> {
        let output = self
            .run(&["get", "ns", "-o", "jsonpath={.items[*].metadata.name}"])
            .await?;
        if !output.status.success() {
            return Err(ClusterError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.split_whitespace().map(str::to_string).collect())
    }

    async fn namespace_exists(&self, name: &str) -> ClusterResult<bool> {
        // Exit status alone answers the probe; a missing namespace is not
        // an error.
        let output = self.run(&["get", "ns", name]).await?;
        Ok(output.status.success())
    }

    async fn list_pods(&self, namespace: &str) -> ClusterResult<Vec<PodStatus>> {
        let output = self
            .run(&["get", "pods", "-n", namespace, "-o", POD_READY_JSONPATH])
            .await?;
        if !output.status.success() {
            return Err(ClusterError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_pod_lines(&stdout)
    }

    async fn delete_namespace(&self, name: &str) -> ClusterResult<()> {
        let output = self.run(&["delete", "namespace", name]).await?;
        if !output.status.success() {
            return Err(ClusterError::Command(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse `name=true false ...` lines emitted by [`POD_READY_JSONPATH`].
fn parse_pod_lines(stdout: &str) -> ClusterResult<Vec<PodStatus>> {
    let mut pods = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, flags) = line
            .split_once('=')
            .ok_or_else(|| ClusterError::Parse(format!("missing '=' in {line:?}")))?;
        let flags: Vec<&str> = flags.split_whitespace().collect();
        let ready = flags.iter().filter(|f| **f == "true").count() as u32;
        pods.push(PodStatus {
            name: name.to_string(),
            ready_containers: ready,
            total_containers: flags.len() as u32,
        });
    }
    Ok(pods)
}
