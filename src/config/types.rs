//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::deploy::DeployOptions;
use crate::error::{DitError, DitResult};

use super::loader;

/// One host: its connection descriptor and ordered task descriptors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSpec {
    pub connection: String,

    #[serde(default)]
    pub tasks: Vec<String>,
}

impl HostSpec {
    pub fn new(connection: impl Into<String>, tasks: Vec<String>) -> Self {
        Self {
            connection: connection.into(),
            tasks,
        }
    }

    /// Connection descriptor with the secret part cut off, safe to print
    pub fn display_target(&self) -> &str {
        let end = self
            .connection
            .find(['*', '!'])
            .unwrap_or(self.connection.len());
        &self.connection[..end]
    }
}

/// Run-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Hosts deployed at once; 1 means strictly sequential
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    #[serde(default)]
    pub check_only: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            check_only: false,
        }
    }
}

fn default_jobs() -> usize {
    1
}

/// Complete dit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default, rename = "host")]
    pub hosts: Vec<HostSpec>,
}

impl Config {
    /// Load a TOML config file; unknown keys are logged, not rejected
    pub fn load(path: &Path) -> DitResult<Self> {
        let (config, warnings) = loader::load_with_warnings(path)?;
        for warning in &warnings {
            tracing::warn!(
                key = %warning.key,
                file = %warning.file.display(),
                line = ?warning.line,
                suggestion = ?warning.suggestion,
                "unknown config key"
            );
        }
        config.validate()?;
        Ok(config)
    }

    /// Hosts from `DIT_NODE<n>` / `DIT_NODE<n>_TASK<m>` process variables.
    ///
    /// An empty variable counts as unset.
    pub fn from_env() -> DitResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Hosts from any variable lookup, same naming as [`Config::from_env`]
    pub fn from_vars<F>(lookup: F) -> DitResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hosts = loader::hosts_from_vars(lookup)?;
        Ok(Self {
            deploy: DeployConfig::default(),
            hosts,
        })
    }

    /// At least one host, and every host has at least one task
    pub fn validate(&self) -> DitResult<()> {
        if self.hosts.is_empty() {
            return Err(DitError::NoHosts {
                var: loader::node_var(1),
            });
        }
        for (i, host) in self.hosts.iter().enumerate() {
            if host.tasks.is_empty() {
                return Err(DitError::HostWithoutTasks {
                    node: i + 1,
                    target: host.display_target().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn deploy_options(&self) -> DeployOptions {
        DeployOptions::new()
            .with_jobs(self.deploy.jobs)
            .with_check_only(self.deploy.check_only)
    }
}
