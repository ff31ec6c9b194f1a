//! Remote working directory taken from the connection descriptor path.
//!
//! Relative remote paths are resolved against it and commands are run from
//! inside it. `~/` paths stay relative to the remote home, which is where
//! SFTP resolves relative paths anyway.

/// Remote working directory (may be unset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteDir(Option<String>);

impl RemoteDir {
    pub fn new(dir: &str) -> Self {
        let dir = dir.trim();
        if dir.is_empty() {
            Self(None)
        } else {
            Self(Some(dir.to_string()))
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Resolve a remote path from a task descriptor
    pub fn resolve(&self, path: &str) -> String {
        if let Some(home_relative) = path.strip_prefix("~/") {
            return home_relative.to_string();
        }
        if path.starts_with('/') {
            return path.to_string();
        }
        match &self.0 {
            Some(dir) => {
                let relative = path.strip_prefix("./").unwrap_or(path);
                format!("{}/{}", dir.trim_end_matches('/'), relative)
            }
            None => path.to_string(),
        }
    }

    /// Command line as sent to the remote shell
    pub fn command_line(&self, command: &str) -> String {
        match &self.0 {
            Some(dir) => format!("cd {} && {}", shell_quote(dir), command),
            None => command.to_string(),
        }
    }
}

/// Single-quote a string for a POSIX shell
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
