//! Provisioning configuration.
//!
//! Defaults match the reference deployment (five stores, `store-` prefix,
//! `.localhost` hostnames, 24 × 5s readiness budget). Values can come from
//! a `storegrid.toml` file, from the environment, or from daemon flags —
//! later sources win.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Admission guardrail: maximum concurrently active stores.
    pub max_stores: usize,
    /// Namespace prefix marking tenant namespaces.
    pub namespace_prefix: String,
    /// Local domain appended to store ids to form hostnames.
    pub domain: String,
    /// Chart reference handed to the release manager.
    pub chart: String,
    /// Optional values file passed to every install.
    pub values_file: Option<String>,
    /// Override key that receives the store hostname on install.
    pub host_value_key: String,
    /// Readiness polling attempt budget.
    pub poll_attempts: u32,
    /// Seconds between readiness polls.
    pub poll_interval_secs: u64,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            max_stores: 5,
            namespace_prefix: "store-".to_string(),
            domain: "localhost".to_string(),
            chart: "./helm/store".to_string(),
            values_file: None,
            host_value_key: "wordpress.ingress.hostname".to_string(),
            poll_attempts: 24,
            poll_interval_secs: 5,
        }
    }
}

impl ProvisionConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProvisionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply recognized environment variables on top of `self`.
    pub fn apply_env(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("MAX_STORES") {
            self.max_stores = v;
        }
        if let Ok(v) = std::env::var("STORE_PREFIX") {
            self.namespace_prefix = v;
        }
        if let Ok(v) = std::env::var("STORE_DOMAIN") {
            self.domain = v;
        }
        if let Ok(v) = std::env::var("STORE_CHART") {
            self.chart = v;
        }
        if let Ok(v) = std::env::var("STORE_VALUES_FILE") {
            self.values_file = Some(v);
        }
        if let Ok(v) = std::env::var("STORE_HOST_VALUE_KEY") {
            self.host_value_key = v;
        }
        if let Some(v) = env_parse::<u32>("POLL_ATTEMPTS") {
            self.poll_attempts = v;
        }
        if let Some(v) = env_parse::<u64>("POLL_INTERVAL_SECS") {
            self.poll_interval_secs = v;
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = ProvisionConfig::default();
        assert_eq!(config.max_stores, 5);
        assert_eq!(config.namespace_prefix, "store-");
        assert_eq!(config.domain, "localhost");
        assert_eq!(config.poll_attempts, 24);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let toml_str = r#"
max_stores = 2
domain = "stores.example.com"
"#;
        let config: ProvisionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_stores, 2);
        assert_eq!(config.domain, "stores.example.com");
        assert_eq!(config.namespace_prefix, "store-");
        assert_eq!(config.poll_attempts, 24);
    }
}
