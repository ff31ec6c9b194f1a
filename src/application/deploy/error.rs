//! Deploy errors
//!
//! Every lower-level error is wrapped with the host id and, where there is
//! one, the task descriptor and its zero-based position, so one message is
//! enough to tell which remote side effect may be partially applied.

use thiserror::Error;

use crate::domain::entities::{ExecuteError, PrecheckError, TaskParseError};
use crate::domain::ports::TransportError;
use crate::domain::value_objects::CredentialsError;

#[derive(Error, Debug)]
pub enum DeployError {
    /// Connection descriptor could not be resolved
    #[error("invalid connection for host-{host}: {source}")]
    Credentials {
        host: usize,
        #[source]
        source: CredentialsError,
    },

    /// Task descriptor could not be parsed
    #[error("invalid task '{task}' for host-{host}: {source}")]
    Parse {
        host: usize,
        task: String,
        #[source]
        source: TaskParseError,
    },

    /// Local precondition failed; nothing was deployed anywhere
    #[error("precheck failed for host-{host} task '{task}': {source}")]
    Precheck {
        host: usize,
        task: String,
        #[source]
        source: PrecheckError,
    },

    /// Deploy requested for a job that did not pass precheck
    #[error("host-{host} ({target}) has not passed precheck")]
    NotPrechecked { host: usize, target: String },

    /// Dial, handshake, auth or channel setup failed
    #[error("error connecting host-{host} ({target}): {source}")]
    Connect {
        host: usize,
        target: String,
        #[source]
        source: TransportError,
    },

    /// A task failed on the remote; later tasks of this host were skipped
    #[error("error host-{host} executing task-{index} '{task}': {source}")]
    Execute {
        host: usize,
        index: usize,
        task: String,
        #[source]
        source: ExecuteError,
    },
}

impl DeployError {
    /// Id of the host the error belongs to
    pub fn host(&self) -> usize {
        match self {
            DeployError::Credentials { host, .. }
            | DeployError::Parse { host, .. }
            | DeployError::Precheck { host, .. }
            | DeployError::NotPrechecked { host, .. }
            | DeployError::Connect { host, .. }
            | DeployError::Execute { host, .. } => *host,
        }
    }

    /// True for errors raised before any connection was opened
    pub fn is_pre_deploy(&self) -> bool {
        matches!(
            self,
            DeployError::Credentials { .. }
                | DeployError::Parse { .. }
                | DeployError::Precheck { .. }
        )
    }
}
