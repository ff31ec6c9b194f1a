//! Deploy Event Port
//!
//! Provides an observable interface for deploy runs.
//! Enables progress reporting, JSON event streams, and debugging.

/// Event emitted during a deploy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Run started (all hosts parsed)
    Started { hosts: usize, tasks: usize },

    /// Every task of one host passed its precheck
    HostPrechecked { host: usize, tasks: usize },

    /// Precheck barrier passed for all hosts
    PrecheckPassed { hosts: usize },

    /// Connecting to a host
    HostStarted { host: usize, target: String },

    /// Task execution started
    TaskStarted {
        host: usize,
        index: usize,
        task: String,
    },

    /// A command task finished and produced output
    CommandOutput {
        host: usize,
        index: usize,
        command: String,
        output: String,
    },

    /// Task finished successfully
    TaskCompleted { host: usize, index: usize },

    /// Every task of a host finished and the connection was released
    HostCompleted { host: usize, tasks: usize },

    /// Run completed
    Completed {
        hosts: usize,
        tasks: usize,
        check_only: bool,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: human-readable progress on stdout
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
///
/// Sinks must be shareable because hosts may deploy on worker threads.
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
