//! Domain Entities
//!
//! - `Task` - one parsed task descriptor (upload, download or command)
//! - `HostJob` - one remote host with its credentials and ordered tasks

mod host_job;
mod task;

pub use host_job::{HostJob, JobState};
pub use task::{
    ExecuteError, PrecheckError, Task, TaskAction, TaskKind, TaskOutcome, TaskParseError,
    EMPTY_OUTPUT,
};
