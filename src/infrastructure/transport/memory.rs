//! In-memory transport
//!
//! A `Connector` whose remote side is a map of files per host plus a list of
//! scripted command responses. Every connect, command and close is recorded,
//! which makes it the test double for orchestrator and task tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::ports::{
    CommandChannel, CommandOutput, Connection, Connector, FileChannel, TransportError,
};
use crate::domain::value_objects::Credentials;

#[derive(Debug, Clone)]
struct CommandRule {
    pattern: String,
    output: String,
    exit_status: i32,
}

#[derive(Debug, Default)]
struct MemoryRemote {
    files: HashMap<String, HashMap<String, Vec<u8>>>,
    rules: Vec<CommandRule>,
    refused: Vec<String>,
    broken: Vec<(String, String)>,
    connects: Vec<String>,
    commands: Vec<String>,
    closed: usize,
}

/// Connector backed by shared in-memory state
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryRemote>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryRemote> {
        lock(&self.state)
    }

    /// Seed a remote file on `host`
    pub fn with_file(self, host: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.state()
            .files
            .entry(host.to_string())
            .or_default()
            .insert(path.to_string(), content.into());
        self
    }

    /// Seed a remote file on `host` that breaks mid-transfer: reads yield
    /// `content` then fail, writes fail
    pub fn with_broken_file(self, host: &str, path: &str, content: impl Into<Vec<u8>>) -> Self {
        let this = self.with_file(host, path, content);
        this.state()
            .broken
            .push((host.to_string(), path.to_string()));
        this
    }

    /// Commands containing `pattern` answer with `output` and `exit_status`
    pub fn respond(self, pattern: &str, output: &str, exit_status: i32) -> Self {
        self.state().rules.push(CommandRule {
            pattern: pattern.to_string(),
            output: output.to_string(),
            exit_status,
        });
        self
    }

    /// Connections to `host` fail with a dial error
    pub fn refuse(self, host: &str) -> Self {
        self.state().refused.push(host.to_string());
        self
    }

    /// Hosts connected to, in order
    pub fn connects(&self) -> Vec<String> {
        self.state().connects.clone()
    }

    /// Command lines run, in order
    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    /// Number of connections closed
    pub fn closed(&self) -> usize {
        self.state().closed
    }

    pub fn file(&self, host: &str, path: &str) -> Option<Vec<u8>> {
        self.state().files.get(host)?.get(path).cloned()
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Connection, TransportError> {
        let host = credentials.host().to_string();
        {
            let mut state = self.state();
            state.connects.push(host.clone());
            if state.refused.contains(&host) {
                return Err(TransportError::Dial {
                    address: credentials.address(),
                    source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
                });
            }
        }

        Ok(Connection::new(
            Box::new(MemoryFiles {
                host: host.clone(),
                state: self.state.clone(),
            }),
            Box::new(MemoryShell {
                state: self.state.clone(),
            }),
        ))
    }
}

fn lock(state: &Mutex<MemoryRemote>) -> MutexGuard<'_, MemoryRemote> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryRemote {
    fn is_broken(&self, host: &str, path: &str) -> bool {
        self.broken.iter().any(|(h, p)| h == host && p == path)
    }
}

fn connection_reset() -> io::Error {
    io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")
}

/// Yields nothing but an error
struct BrokenStream;

impl Read for BrokenStream {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(connection_reset())
    }
}

impl Write for BrokenStream {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(connection_reset())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(connection_reset())
    }
}

struct MemoryFiles {
    host: String,
    state: Arc<Mutex<MemoryRemote>>,
}

impl FileChannel for MemoryFiles {
    fn create(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>> {
        if path.is_empty() || path.ends_with('/') {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no such file"));
        }
        if lock(&self.state).is_broken(&self.host, path) {
            return Ok(Box::new(BrokenStream));
        }
        Ok(Box::new(MemoryWriter {
            host: self.host.clone(),
            path: path.to_string(),
            buffer: Vec::new(),
            state: self.state.clone(),
        }))
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let state = lock(&self.state);
        let content = state
            .files
            .get(&self.host)
            .and_then(|files| files.get(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        if state.is_broken(&self.host, path) {
            return Ok(Box::new(Cursor::new(content).chain(BrokenStream)));
        }
        Ok(Box::new(Cursor::new(content)))
    }

    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

struct MemoryWriter {
    host: String,
    path: String,
    buffer: Vec<u8>,
    state: Arc<Mutex<MemoryRemote>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.state)
            .files
            .entry(self.host.clone())
            .or_default()
            .insert(self.path.clone(), self.buffer.clone());
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

struct MemoryShell {
    state: Arc<Mutex<MemoryRemote>>,
}

impl CommandChannel for MemoryShell {
    fn run(&mut self, command: &str) -> Result<CommandOutput, TransportError> {
        let mut state = lock(&self.state);
        state.commands.push(command.to_string());
        let rule = state
            .rules
            .iter()
            .find(|rule| command.contains(&rule.pattern))
            .cloned();
        Ok(match rule {
            Some(rule) => CommandOutput {
                output: rule.output,
                exit_status: rule.exit_status,
            },
            None => CommandOutput {
                output: String::new(),
                exit_status: 0,
            },
        })
    }

    fn close(&mut self) -> Result<(), TransportError> {
        lock(&self.state).closed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::LiteralCredentialResolver;
    use crate::domain::ports::CredentialResolver;

    fn credentials(host: &str) -> Credentials {
        LiteralCredentialResolver
            .resolve(&format!("ssh://deploy@{host}!pw"))
            .unwrap()
    }

    #[test]
    fn written_files_are_visible_after_drop() {
        let connector = MemoryConnector::new();
        let mut connection = connector.connect(&credentials("web1")).unwrap();
        {
            let mut writer = connection.files().create("/tmp/a.txt").unwrap();
            writer.write_all(b"hello").unwrap();
        }
        connection.close().unwrap();

        assert_eq!(connector.file("web1", "/tmp/a.txt"), Some(b"hello".to_vec()));
        assert_eq!(connector.closed(), 1);
    }

    #[test]
    fn refused_host_fails_to_connect_but_is_recorded() {
        let connector = MemoryConnector::new().refuse("down");
        assert!(connector.connect(&credentials("down")).is_err());
        assert_eq!(connector.connects(), vec!["down".to_string()]);
    }

    #[test]
    fn broken_file_fails_after_its_content() {
        let connector = MemoryConnector::new().with_broken_file("web1", "/var/log/app.log", "abc");
        let mut connection = connector.connect(&credentials("web1")).unwrap();

        let mut reader = connection.files().open("/var/log/app.log").unwrap();
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        drop(reader);

        let mut writer = connection.files().create("/var/log/app.log").unwrap();
        assert!(writer.write_all(b"x").is_err());
    }

    #[test]
    fn scripted_command_response() {
        let connector = MemoryConnector::new().respond("systemctl", "failed", 3);
        let mut connection = connector.connect(&credentials("web1")).unwrap();
        let result = connection.commands().run("systemctl restart app").unwrap();
        assert_eq!(result.exit_status, 3);
        assert_eq!(result.output, "failed");
    }
}
