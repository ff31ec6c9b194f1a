//! Transport port - abstraction over an authenticated remote session
//!
//! A `Connector` turns `Credentials` into a live `Connection`, which pairs a
//! file channel (SFTP-like: create/open remote files) with a command channel
//! (run a shell command, capture its output). Tasks execute against the
//! `Connection`; they never dial anything themselves.

use std::io::{Read, Write};

use thiserror::Error;

use crate::domain::value_objects::Credentials;

/// Boxed error produced by a concrete transport library
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transport-level errors (dial, auth, channel, remote process)
#[derive(Error, Debug)]
pub enum TransportError {
    /// TCP connection to the remote could not be established
    #[error("error dialing {address}: {source}")]
    Dial {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// No configured secret was accepted by the remote
    #[error("authentication failed for user '{user}': {reason}")]
    Auth { user: String, reason: String },

    /// Protocol step failed (handshake, channel open, exec, ...)
    #[error("error {operation}: {source}")]
    Protocol {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// Remote process finished with a non-zero exit status
    #[error("process exited with status {0}")]
    ExitStatus(i32),
}

impl TransportError {
    /// Wrap a library error with the protocol step that produced it
    pub fn protocol(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Protocol {
            operation,
            source: source.into(),
        }
    }
}

/// Combined stdout/stderr of a remote command plus its exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    pub exit_status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Remote file access (create/truncate for writing, open for reading)
pub trait FileChannel: Send {
    /// Create or truncate a remote file for writing
    fn create(&mut self, path: &str) -> std::io::Result<Box<dyn Write + '_>>;

    /// Open an existing remote file for reading
    fn open(&mut self, path: &str) -> std::io::Result<Box<dyn Read + '_>>;

    /// Release the channel
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Remote command execution
pub trait CommandChannel: Send {
    /// Run one command line; stdout and stderr are captured together.
    ///
    /// A non-zero exit status is reported in `CommandOutput`, not as `Err`.
    fn run(&mut self, command: &str) -> Result<CommandOutput, TransportError>;

    /// Release the channel
    fn close(&mut self) -> Result<(), TransportError>;
}

/// A live remote connection: one file channel and one command channel
pub struct Connection {
    files: Box<dyn FileChannel>,
    commands: Box<dyn CommandChannel>,
}

impl Connection {
    pub fn new(files: Box<dyn FileChannel>, commands: Box<dyn CommandChannel>) -> Self {
        Self { files, commands }
    }

    pub fn files(&mut self) -> &mut dyn FileChannel {
        self.files.as_mut()
    }

    pub fn commands(&mut self) -> &mut dyn CommandChannel {
        self.commands.as_mut()
    }

    /// Close both channels, reporting the first failure.
    ///
    /// Both channels are always closed, even if the first one fails.
    pub fn close(mut self) -> Result<(), TransportError> {
        let files = self.files.close();
        let commands = self.commands.close();
        files.and(commands)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

/// Opens connections to remote hosts
///
/// Implementations:
/// - `SshConnector` - libssh2 session with SFTP and exec channels
/// - test doubles recording connects in memory
pub trait Connector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Connection, TransportError>;
}
