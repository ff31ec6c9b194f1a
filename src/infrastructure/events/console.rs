//! Console Event Sink
//!
//! Plain progress lines for interactive use. Command output is echoed in
//! full after each command finishes.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that prints progress to stdout
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let line = match event {
            DeployEvent::PrecheckPassed { hosts } => {
                format!("Precheck passed for {hosts} host(s)")
            }
            DeployEvent::HostStarted { host, target } => format!("Deploy host-{host} {target}"),
            DeployEvent::TaskStarted { task, .. } => format!("Execute task {task}"),
            DeployEvent::CommandOutput {
                command, output, ..
            } => format!("\nCommand output of '{command}':\n{output}"),
            DeployEvent::Completed {
                check_only: true,
                tasks,
                ..
            } => format!("Check only: {tasks} task(s) ready, nothing deployed"),
            DeployEvent::Started { .. }
            | DeployEvent::HostPrechecked { .. }
            | DeployEvent::TaskCompleted { .. }
            | DeployEvent::HostCompleted { .. }
            | DeployEvent::Completed { .. } => return,
        };
        self.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prints_task_and_command_output() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::with_writer(buffer.clone());

        sink.on_event(DeployEvent::TaskStarted {
            host: 0,
            index: 0,
            task: "CMD@uptime".to_string(),
        });
        sink.on_event(DeployEvent::CommandOutput {
            host: 0,
            index: 0,
            command: "uptime".to_string(),
            output: "up 2 days".to_string(),
        });

        assert_eq!(
            buffer.text(),
            "Execute task CMD@uptime\n\nCommand output of 'uptime':\nup 2 days\n"
        );
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::with_writer(buffer.clone());

        sink.on_event(DeployEvent::TaskCompleted { host: 0, index: 0 });
        sink.on_event(DeployEvent::Completed {
            hosts: 1,
            tasks: 1,
            check_only: false,
        });

        assert!(buffer.text().is_empty());
    }

    #[test]
    fn check_only_completion_is_reported() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::with_writer(buffer.clone());

        sink.on_event(DeployEvent::Completed {
            hosts: 2,
            tasks: 5,
            check_only: true,
        });

        assert!(buffer.text().contains("5 task(s) ready"));
    }
}
