//! SSH transport built on `ssh2` (libssh2)
//!
//! One TCP connection and one authenticated session per host. Files move over
//! an SFTP subsystem opened at connect time; each command gets a fresh exec
//! channel with stderr merged into stdout. Host keys are not verified.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use ssh2::{ExtendedData, Session, Sftp};
use tracing::debug;

use crate::domain::ports::{
    CommandChannel, CommandOutput, Connection, Connector, FileChannel, TransportError,
};
use crate::domain::value_objects::Credentials;

/// Default limit for establishing the TCP connection; later steps are unbounded
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Opens authenticated SSH sessions
#[derive(Debug, Clone)]
pub struct SshConnector {
    connect_timeout: Duration,
}

impl SshConnector {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SshConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Connection, TransportError> {
        let address = credentials.address();
        let tcp = dial(&address, self.connect_timeout).map_err(|source| TransportError::Dial {
            address: address.clone(),
            source,
        })?;
        debug!(%address, "tcp connected");

        let mut session =
            Session::new().map_err(|e| TransportError::protocol("creating ssh session", e))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| TransportError::protocol("during ssh handshake", e))?;

        authenticate(&session, credentials)?;
        debug!(remote = %credentials.target(), kind = ?credentials.secret_kind(), "authenticated");

        let sftp = session
            .sftp()
            .map_err(|e| TransportError::protocol("creating sftp client", e))?;

        Ok(Connection::new(
            Box::new(SftpChannel { sftp: Some(sftp) }),
            Box::new(ExecChannel { session }),
        ))
    }
}

/// Try every resolved address in turn
fn dial(address: &str, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_error = None;
    for addr in address.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved")
    }))
}

/// Private key first, then password; at least one must be accepted
fn authenticate(session: &Session, credentials: &Credentials) -> Result<(), TransportError> {
    let user = credentials.user();
    let mut rejected = Vec::new();

    if !credentials.private_key().is_empty() {
        if let Err(err) = session.userauth_pubkey_memory(user, None, credentials.private_key(), None)
        {
            rejected.push(format!("publickey: {err}"));
        }
    }

    if !session.authenticated() && !credentials.password().is_empty() {
        if let Err(err) = session.userauth_password(user, credentials.password()) {
            rejected.push(format!("password: {err}"));
        }
    }

    if session.authenticated() {
        Ok(())
    } else {
        Err(TransportError::Auth {
            user: user.to_string(),
            reason: rejected.join("; "),
        })
    }
}

struct SftpChannel {
    sftp: Option<Sftp>,
}

impl SftpChannel {
    fn sftp(&self) -> io::Result<&Sftp> {
        self.sftp
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "sftp client closed"))
    }
}

impl FileChannel for SftpChannel {
    fn create(&mut self, path: &str) -> io::Result<Box<dyn Write + '_>> {
        let file = self.sftp()?.create(Path::new(path))?;
        Ok(Box::new(file))
    }

    fn open(&mut self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = self.sftp()?.open(Path::new(path))?;
        Ok(Box::new(file))
    }

    fn close(&mut self) -> Result<(), TransportError> {
        match self.sftp.take() {
            Some(mut sftp) => sftp
                .shutdown()
                .map_err(|e| TransportError::protocol("closing sftp client", e)),
            None => Ok(()),
        }
    }
}

struct ExecChannel {
    session: Session,
}

impl CommandChannel for ExecChannel {
    fn run(&mut self, command: &str) -> Result<CommandOutput, TransportError> {
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| TransportError::protocol("creating ssh session", e))?;
        channel
            .handle_extended_data(ExtendedData::Merge)
            .map_err(|e| TransportError::protocol("merging stderr", e))?;
        channel
            .exec(command)
            .map_err(|e| TransportError::protocol("starting command", e))?;

        let mut raw = Vec::new();
        channel
            .read_to_end(&mut raw)
            .map_err(|e| TransportError::protocol("reading command output", e))?;
        channel
            .wait_close()
            .map_err(|e| TransportError::protocol("waiting for command", e))?;
        let exit_status = channel
            .exit_status()
            .map_err(|e| TransportError::protocol("reading exit status", e))?;

        Ok(CommandOutput {
            output: String::from_utf8_lossy(&raw).into_owned(),
            exit_status,
        })
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.session
            .disconnect(None, "deployment finished", None)
            .map_err(|e| TransportError::protocol("closing ssh connection", e))
    }
}
