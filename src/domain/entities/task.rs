//! Task entity - one step of a host's deployment
//!
//! Task descriptors are `@`-delimited strings:
//!
//! | Form                         | Fields |
//! |------------------------------|--------|
//! | `UPLOAD@<local>@<remote>`    | 3      |
//! | `DOWNLOAD@<remote>@<local>`  | 3      |
//! | `CMD@<command>`              | 2      |
//!
//! For `CMD` only the first `@` is significant: the command line is the
//! literal remainder, so `CMD@git clone git@host:repo` keeps its `@`.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ports::{Connection, TransportError};
use crate::domain::value_objects::RemoteDir;

/// Marker used in command errors when the command printed nothing
pub const EMPTY_OUTPUT: &str = "empty output";

const DELIMITER: char = '@';

/// Errors parsing a task descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskParseError {
    #[error("empty task")]
    Empty,

    #[error("cant parse task: unknown task: '{0}'")]
    Unknown(String),

    #[error("invalid {} task: task has invalid format: {} but is '{raw}'", .kind.name(), .kind.pattern())]
    InvalidFormat { kind: TaskKind, raw: String },
}

/// Local precondition violations, detected before any connection opens
#[derive(Error, Debug)]
pub enum PrecheckError {
    #[error("{} source file is empty", .0.name())]
    EmptySource(TaskKind),

    #[error("cant stat local source '{}': {source}", .path.display())]
    SourceStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    #[error("cant stat parent dir of local target: '{}': {source}", .path.display())]
    ParentDirStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("local target dir is not a directory: '{}'", .0.display())]
    ParentNotDirectory(PathBuf),
}

/// Failures while executing a task against a live connection
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("error opening source file '{path}': {source}")]
    OpenSource {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("error creating destination file '{path}': {source}")]
    CreateDestination {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("error copying '{from}' to '{to}': {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    #[error("error executing command: command line is empty")]
    EmptyCommand,

    #[error("error executing command '{command}': {}, error: {source}", describe_output(.output))]
    CommandFailed {
        command: String,
        output: String,
        #[source]
        source: TransportError,
    },
}

fn describe_output(output: &str) -> String {
    let output = output.trim_end();
    if output.is_empty() {
        EMPTY_OUTPUT.to_string()
    } else {
        format!("output: '{output}'")
    }
}

/// The three task variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Upload,
    Download,
    Command,
}

impl TaskKind {
    /// Descriptor verb (first `@` field)
    pub fn verb(self) -> &'static str {
        match self {
            TaskKind::Upload => "UPLOAD",
            TaskKind::Download => "DOWNLOAD",
            TaskKind::Command => "CMD",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Upload => "upload",
            TaskKind::Download => "download",
            TaskKind::Command => "command",
        }
    }

    /// Expected descriptor shape, used in format errors
    pub fn pattern(self) -> &'static str {
        match self {
            TaskKind::Upload => "UPLOAD@<FromPath>@<ToPath>",
            TaskKind::Download => "DOWNLOAD@<FromPath>@<ToPath>",
            TaskKind::Command => "CMD@<Command>",
        }
    }

    fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "UPLOAD" => Some(TaskKind::Upload),
            "DOWNLOAD" => Some(TaskKind::Download),
            "CMD" => Some(TaskKind::Command),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// What a task does, with its parsed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Copy a local regular file to a remote path
    Upload { source: PathBuf, destination: String },
    /// Copy a remote file to a local path
    Download { source: String, destination: PathBuf },
    /// Run one command line on the remote shell
    Command { command_line: String },
}

/// Result of a successful task execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Transferred { bytes: u64 },
    Command { output: String },
}

/// A parsed task, keeping the descriptor it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    raw: String,
    action: TaskAction,
}

impl Task {
    /// Parse a raw descriptor string
    pub fn parse(raw: &str) -> Result<Self, TaskParseError> {
        if raw.is_empty() {
            return Err(TaskParseError::Empty);
        }

        let verb = raw.split(DELIMITER).next().unwrap_or_default();
        let kind =
            TaskKind::from_verb(verb).ok_or_else(|| TaskParseError::Unknown(raw.to_string()))?;
        let invalid = || TaskParseError::InvalidFormat {
            kind,
            raw: raw.to_string(),
        };

        let action = match kind {
            TaskKind::Upload | TaskKind::Download => {
                let fields: Vec<&str> = raw.split(DELIMITER).collect();
                let [_, from, to] = fields.as_slice() else {
                    return Err(invalid());
                };
                if kind == TaskKind::Upload {
                    TaskAction::Upload {
                        source: PathBuf::from(from),
                        destination: to.to_string(),
                    }
                } else {
                    TaskAction::Download {
                        source: from.to_string(),
                        destination: PathBuf::from(to),
                    }
                }
            }
            TaskKind::Command => {
                let (_, command_line) = raw.split_once(DELIMITER).ok_or_else(invalid)?;
                TaskAction::Command {
                    command_line: command_line.to_string(),
                }
            }
        };

        Ok(Self {
            raw: raw.to_string(),
            action,
        })
    }

    /// The original descriptor string
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn action(&self) -> &TaskAction {
        &self.action
    }

    pub fn kind(&self) -> TaskKind {
        match self.action {
            TaskAction::Upload { .. } => TaskKind::Upload,
            TaskAction::Download { .. } => TaskKind::Download,
            TaskAction::Command { .. } => TaskKind::Command,
        }
    }

    /// Re-derive the descriptor from the parsed fields
    pub fn describe(&self) -> String {
        match &self.action {
            TaskAction::Upload {
                source,
                destination,
            } => format!("UPLOAD@{}@{}", source.display(), destination),
            TaskAction::Download {
                source,
                destination,
            } => format!("DOWNLOAD@{}@{}", source, destination.display()),
            TaskAction::Command { command_line } => format!("CMD@{command_line}"),
        }
    }

    /// Check local preconditions. Commands have none.
    pub fn precheck(&self) -> Result<(), PrecheckError> {
        match &self.action {
            TaskAction::Upload { source, .. } => {
                if source.as_os_str().is_empty() {
                    return Err(PrecheckError::EmptySource(TaskKind::Upload));
                }
                let metadata = fs::metadata(source).map_err(|e| PrecheckError::SourceStat {
                    path: source.clone(),
                    source: e,
                })?;
                if !metadata.is_file() {
                    return Err(PrecheckError::NotRegularFile(source.clone()));
                }
                Ok(())
            }
            TaskAction::Download {
                source,
                destination,
            } => {
                if source.is_empty() {
                    return Err(PrecheckError::EmptySource(TaskKind::Download));
                }
                let parent = local_parent(destination);
                let metadata = fs::metadata(&parent).map_err(|e| PrecheckError::ParentDirStat {
                    path: parent.clone(),
                    source: e,
                })?;
                if !metadata.is_dir() {
                    return Err(PrecheckError::ParentNotDirectory(parent));
                }
                Ok(())
            }
            TaskAction::Command { .. } => Ok(()),
        }
    }

    /// Execute the task once against a live connection
    pub fn execute(
        &self,
        connection: &mut Connection,
        remote_dir: &RemoteDir,
    ) -> Result<TaskOutcome, ExecuteError> {
        match &self.action {
            TaskAction::Upload {
                source,
                destination,
            } => {
                let local = source.display().to_string();
                let remote = remote_dir.resolve(destination);

                let mut reader = File::open(source).map_err(|e| ExecuteError::OpenSource {
                    path: local.clone(),
                    source: e,
                })?;
                let mut writer = connection.files().create(&remote).map_err(|e| {
                    ExecuteError::CreateDestination {
                        path: remote.clone(),
                        source: e,
                    }
                })?;
                let bytes = copy_all(&mut reader, &mut writer).map_err(|e| ExecuteError::Copy {
                    from: local,
                    to: remote,
                    source: e,
                })?;
                Ok(TaskOutcome::Transferred { bytes })
            }
            TaskAction::Download {
                source,
                destination,
            } => {
                let local = destination.display().to_string();
                let remote = remote_dir.resolve(source);

                let mut writer =
                    File::create(destination).map_err(|e| ExecuteError::CreateDestination {
                        path: local.clone(),
                        source: e,
                    })?;
                let mut reader =
                    connection
                        .files()
                        .open(&remote)
                        .map_err(|e| ExecuteError::OpenSource {
                            path: remote.clone(),
                            source: e,
                        })?;
                let bytes = copy_all(&mut reader, &mut writer).map_err(|e| ExecuteError::Copy {
                    from: remote,
                    to: local,
                    source: e,
                })?;
                Ok(TaskOutcome::Transferred { bytes })
            }
            TaskAction::Command { command_line } => {
                if command_line.trim().is_empty() {
                    return Err(ExecuteError::EmptyCommand);
                }
                let line = remote_dir.command_line(command_line);
                match connection.commands().run(&line) {
                    Ok(result) if result.success() => Ok(TaskOutcome::Command {
                        output: result.output,
                    }),
                    Ok(result) => Err(ExecuteError::CommandFailed {
                        command: command_line.clone(),
                        output: result.output,
                        source: TransportError::ExitStatus(result.exit_status),
                    }),
                    Err(source) => Err(ExecuteError::CommandFailed {
                        command: command_line.clone(),
                        output: String::new(),
                        source,
                    }),
                }
            }
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Directory that must exist for a local download target
fn local_parent(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        None if destination.has_root() => destination.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn copy_all<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: io::Read + ?Sized,
    W: Write + ?Sized,
{
    let bytes = io::copy(reader, writer)?;
    writer.flush()?;
    Ok(bytes)
}
