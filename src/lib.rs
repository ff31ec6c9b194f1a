//! dit - declarative remote deployment runner
//!
//! dit takes a list of remote hosts, each addressed by an `ssh://` connection
//! descriptor carrying its credentials, and an ordered list of tasks per host
//! (upload, download, remote command). Every task of every host is prechecked
//! locally before any connection opens; then each host runs its tasks in order
//! over a single SSH connection.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::deploy::{DeployError, DeployOptions, DeployResult, DeployUseCase};
pub use config::{Config, DeployConfig, HostSpec};
pub use domain::entities::{ExecuteError, HostJob, JobState, PrecheckError, Task, TaskAction};
pub use domain::entities::{TaskKind, TaskOutcome, TaskParseError};
pub use domain::value_objects::{Credentials, CredentialsError, RemoteDir, SecretKind};
pub use error::{DitError, DitResult};
