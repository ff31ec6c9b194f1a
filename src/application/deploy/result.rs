//! Deploy Result
//!
//! Result types for deploy runs.

/// Result of a successful deploy run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployResult {
    /// Number of hosts in the run
    pub hosts: usize,
    /// Number of tasks across all hosts
    pub tasks: usize,
    /// Tasks that passed precheck
    pub prechecked: usize,
    /// Tasks executed against a remote
    pub executed: usize,
    /// Ids of hosts that completed every task
    pub deployed_hosts: Vec<usize>,
    /// The run stopped after precheck
    pub check_only: bool,
}

impl DeployResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every host deployed every task (or the run was a precheck-only run)
    pub fn is_complete(&self) -> bool {
        if self.check_only {
            self.prechecked == self.tasks
        } else {
            self.deployed_hosts.len() == self.hosts && self.executed == self.tasks
        }
    }
}
