//! Deploy Options
//!
//! Configuration types for deploy runs.

/// Options for the deploy use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Maximum number of hosts deployed at the same time (at least 1)
    pub jobs: usize,
    /// Stop after the precheck phase without connecting anywhere
    pub check_only: bool,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self {
            jobs: 1,
            check_only: false,
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.jobs > 1
    }
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sequential() {
        let options = DeployOptions::default();
        assert_eq!(options.jobs, 1);
        assert!(!options.is_parallel());
        assert!(!options.check_only);
    }

    #[test]
    fn jobs_never_drop_below_one() {
        assert_eq!(DeployOptions::new().with_jobs(0).jobs, 1);
        assert!(DeployOptions::new().with_jobs(4).is_parallel());
    }
}
