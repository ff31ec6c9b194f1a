//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started { hosts, tasks } => serde_json::json!({
                "event": "start",
                "command": "deploy",
                "hosts": hosts,
                "tasks": tasks,
            }),

            DeployEvent::HostPrechecked { host, tasks } => serde_json::json!({
                "event": "host_prechecked",
                "command": "deploy",
                "host": host,
                "tasks": tasks,
            }),

            DeployEvent::PrecheckPassed { hosts } => serde_json::json!({
                "event": "precheck_passed",
                "command": "deploy",
                "hosts": hosts,
            }),

            DeployEvent::HostStarted { host, target } => serde_json::json!({
                "event": "host_start",
                "command": "deploy",
                "host": host,
                "target": target,
            }),

            DeployEvent::TaskStarted { host, index, task } => serde_json::json!({
                "event": "task_start",
                "command": "deploy",
                "host": host,
                "index": index,
                "task": task,
            }),

            DeployEvent::CommandOutput {
                host,
                index,
                command,
                output,
            } => serde_json::json!({
                "event": "command_output",
                "command": "deploy",
                "host": host,
                "index": index,
                "cmd": command,
                "output": output,
            }),

            DeployEvent::TaskCompleted { host, index } => serde_json::json!({
                "event": "task_complete",
                "command": "deploy",
                "host": host,
                "index": index,
            }),

            DeployEvent::HostCompleted { host, tasks } => serde_json::json!({
                "event": "host_complete",
                "command": "deploy",
                "host": host,
                "tasks": tasks,
            }),

            DeployEvent::Completed {
                hosts,
                tasks,
                check_only,
            } => serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": if check_only { "checked" } else { "success" },
                "hosts": hosts,
                "tasks": tasks,
            }),
        };

        self.write_event(json);
    }
}
