//! Error types for dit
//!
//! Uses `thiserror` for library errors. Each layer has its own error enum
//! (task parsing, credentials, precheck, execution, deployment); `DitError`
//! covers configuration loading. A failed run surfaces as `DeployError`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dit operations
pub type DitResult<T> = Result<T, DitError>;

/// Main error type for configuration loading
#[derive(Error, Debug)]
pub enum DitError {
    /// No host configured at all
    #[error("no ssh config for node 1: set {var} or use --config")]
    NoHosts { var: String },

    /// A host was configured without any task
    #[error("no ssh task for node {node}: host '{target}' has no tasks")]
    HostWithoutTasks { node: usize, target: String },

    /// Config file could not be read
    #[error("cannot read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("invalid config file {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    /// `.env` file was present but could not be loaded
    #[error("cannot load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
