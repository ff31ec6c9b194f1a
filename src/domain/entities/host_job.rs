//! HostJob entity - one remote host and its ordered tasks
//!
//! Lifecycle:
//!
//! ```text
//! Constructed --precheck ok--> Prechecked --deploy ok--> Deployed
//!      |                            |
//!      +-------- failure -----------+------> Failed
//! ```

use crate::domain::value_objects::{Credentials, RemoteDir};

use super::task::Task;

/// Where a host job is in the two-phase protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Constructed,
    Prechecked,
    Deployed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Deployed | JobState::Failed)
    }
}

/// Credentials plus the tasks to run on that host, in declaration order
#[derive(Debug, Clone)]
pub struct HostJob {
    id: usize,
    credentials: Credentials,
    tasks: Vec<Task>,
    state: JobState,
}

impl HostJob {
    pub fn new(id: usize, credentials: Credentials, tasks: Vec<Task>) -> Self {
        Self {
            id,
            credentials,
            tasks,
            state: JobState::Constructed,
        }
    }

    /// Diagnostic id, assigned in input order
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn remote_dir(&self) -> RemoteDir {
        RemoteDir::new(self.credentials.working_dir())
    }

    /// `Constructed -> Prechecked`; returns false from any other state
    pub fn mark_prechecked(&mut self) -> bool {
        self.transition(JobState::Constructed, JobState::Prechecked)
    }

    /// `Prechecked -> Deployed`; returns false from any other state
    pub fn mark_deployed(&mut self) -> bool {
        self.transition(JobState::Prechecked, JobState::Deployed)
    }

    /// Any non-terminal state -> `Failed`
    pub fn mark_failed(&mut self) {
        if !self.state.is_terminal() {
            self.state = JobState::Failed;
        }
    }

    fn transition(&mut self, from: JobState, to: JobState) -> bool {
        if self.state == from {
            self.state = to;
            true
        } else {
            false
        }
    }
}
