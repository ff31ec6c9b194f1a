//! Credentials value object - parsed `ssh://` connection descriptor
//!
//! Grammar:
//!
//! ```text
//! ssh://<user>@<host>[:<port>][/<remoteWorkingDir>][*<privateKey>][!<password>]
//! ```
//!
//! `*` must come before `!` when both are present. A private key field that
//! looks like a path (`~/`, `./`, `../`, `/`, `file://`) is handed to a key
//! loader; anything else is literal key material.
//!
//! Secret material is held as plain text for the lifetime of one run and is
//! never shown by `Debug`.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Port used when the descriptor does not name one
pub const DEFAULT_SSH_PORT: u16 = 22;

const KEY_MARKER: char = '*';
const PASSWORD_MARKER: char = '!';
const KEY_PATH_PREFIXES: &[&str] = &["~/", "./", "../", "/", "file://"];

/// Connection descriptor errors
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error(
        "invalid connection credentials for '{target}': need '*' for private key or '!' for password"
    )]
    NoSecretMarker { target: String },

    #[error("invalid connection credentials: '*' private key must be defined before '!' password")]
    SecretOrder,

    #[error("ssh url parse error: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid url scheme, need 'ssh', is '{0}'")]
    InvalidScheme(String),

    #[error("invalid port, need 1-65535, is '{0}'")]
    InvalidPort(u16),

    #[error("invalid user name encoding in '{0}'")]
    InvalidUser(String),

    #[error("user is required")]
    MissingUser,

    #[error("host is required")]
    MissingHost,

    #[error("password or private key is required")]
    MissingSecret,

    #[error("cannot resolve private key path '{path}': {message}")]
    KeyPath { path: String, message: String },

    #[error("error reading private key '{path}': {source}")]
    ReadKey {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("loaded private key from '{0}' is empty")]
    EmptyKeyFile(String),
}

/// Which secret is used first when authenticating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    PrivateKey,
    Password,
}

/// Validated connection parameters for one host
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    host: String,
    port: u16,
    working_dir: String,
    private_key: String,
    password: String,
}

impl Credentials {
    /// Build credentials from parts and validate them
    pub fn new(
        user: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        working_dir: impl Into<String>,
        private_key: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let credentials = Self {
            user: user.into(),
            host: host.into(),
            port,
            working_dir: working_dir.into(),
            private_key: private_key.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Parse a raw descriptor.
    ///
    /// `load_key` is called only for path-like private key fields and must
    /// return the key material stored at that path.
    pub fn parse_with<F>(raw: &str, load_key: F) -> Result<Self, CredentialsError>
    where
        F: FnOnce(&str) -> Result<String, CredentialsError>,
    {
        let (url_part, key_field, password) = split_secrets(raw)?;

        let private_key = if !key_field.is_empty() && is_key_path(&key_field) {
            let material = load_key(&key_field)?;
            if material.is_empty() {
                return Err(CredentialsError::EmptyKeyFile(key_field));
            }
            material
        } else {
            key_field
        };

        let url = Url::parse(&url_part)?;
        if url.scheme() != "ssh" {
            return Err(CredentialsError::InvalidScheme(url.scheme().to_string()));
        }

        let port = url.port().unwrap_or(DEFAULT_SSH_PORT);
        let user = urlencoding::decode(url.username())
            .map_err(|_| CredentialsError::InvalidUser(url.username().to_string()))?
            .into_owned();
        let host = url.host_str().unwrap_or_default().to_string();
        let working_dir = urlencoding::decode(url.path())
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| url.path().to_string());

        Self::new(user, host, port, working_dir, private_key, password)
    }

    /// Check the invariants of a credential set
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.port == 0 {
            return Err(CredentialsError::InvalidPort(self.port));
        }
        if self.password.is_empty() && self.private_key.is_empty() {
            return Err(CredentialsError::MissingSecret);
        }
        if self.user.is_empty() {
            return Err(CredentialsError::MissingUser);
        }
        if self.host.is_empty() {
            return Err(CredentialsError::MissingHost);
        }
        Ok(())
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Remote working directory (empty when the descriptor has no path)
    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The secret tried first; a private key wins over a password
    pub fn secret_kind(&self) -> SecretKind {
        if self.private_key.is_empty() {
            SecretKind::Password
        } else {
            SecretKind::PrivateKey
        }
    }

    /// `host:port`, suitable for dialing (IPv6 hosts keep their brackets)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `user@host:port`, safe to print
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.address())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("working_dir", &self.working_dir)
            .field("private_key", &redacted(&self.private_key))
            .field("password", &redacted(&self.password))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "<redacted>"
    }
}

/// True when a private key field names a file rather than key material
pub fn is_key_path(field: &str) -> bool {
    KEY_PATH_PREFIXES
        .iter()
        .any(|prefix| field.starts_with(prefix))
}

/// Split `<url>[*key][!password]` into its three trimmed parts
fn split_secrets(raw: &str) -> Result<(String, String, String), CredentialsError> {
    let key_at = raw.find(KEY_MARKER);
    let password_at = raw.find(PASSWORD_MARKER);

    match (key_at, password_at) {
        (Some(k), Some(p)) if k > p => Err(CredentialsError::SecretOrder),
        (Some(k), _) => {
            let url = raw[..k].trim();
            let rest = &raw[k + KEY_MARKER.len_utf8()..];
            let (key, password) = match rest.split_once(PASSWORD_MARKER) {
                Some((key, password)) => (key, password),
                None => (rest, ""),
            };
            Ok((
                url.to_string(),
                key.trim().to_string(),
                password.trim().to_string(),
            ))
        }
        (None, Some(p)) => Ok((
            raw[..p].trim().to_string(),
            String::new(),
            raw[p + PASSWORD_MARKER.len_utf8()..].trim().to_string(),
        )),
        (None, None) => Err(CredentialsError::NoSecretMarker {
            target: raw.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Credentials, CredentialsError> {
        Credentials::parse_with(raw, |path| Ok(format!("KEY FROM {path}")))
    }

    #[test]
    fn parses_password_descriptor_with_port_and_dir() {
        let creds = parse("ssh://bob@host:2222/work!secret").unwrap();
        assert_eq!(creds.user(), "bob");
        assert_eq!(creds.host(), "host");
        assert_eq!(creds.port(), 2222);
        assert_eq!(creds.working_dir(), "/work");
        assert_eq!(creds.password(), "secret");
        assert_eq!(creds.private_key(), "");
        assert_eq!(creds.secret_kind(), SecretKind::Password);
    }

    #[test]
    fn port_defaults_to_22() {
        let creds = parse("ssh://bob@host!pw").unwrap();
        assert_eq!(creds.port(), DEFAULT_SSH_PORT);
        assert_eq!(creds.working_dir(), "");
        assert_eq!(creds.address(), "host:22");
    }

    #[test]
    fn key_before_password_resolves_both() {
        let creds = parse("ssh://bob@host*keydata!pw").unwrap();
        assert_eq!(creds.private_key(), "keydata");
        assert_eq!(creds.password(), "pw");
        assert_eq!(creds.secret_kind(), SecretKind::PrivateKey);
    }

    #[test]
    fn password_before_key_is_rejected() {
        let err = parse("ssh://bob@host!pw*keydata").unwrap_err();
        assert!(matches!(err, CredentialsError::SecretOrder));
    }

    #[test]
    fn descriptor_without_secret_marker_is_rejected() {
        let err = parse("ssh://bob@host:22").unwrap_err();
        assert!(matches!(err, CredentialsError::NoSecretMarker { .. }));
        assert!(err.to_string().contains("ssh://bob@host:22"));
    }

    #[test]
    fn empty_secrets_are_rejected() {
        let err = parse("ssh://bob@host!").unwrap_err();
        assert!(matches!(err, CredentialsError::MissingSecret));
    }

    #[test]
    fn secrets_are_trimmed() {
        let creds = parse("ssh://bob@host * keydata ! pw ").unwrap();
        assert_eq!(creds.private_key(), "keydata");
        assert_eq!(creds.password(), "pw");
    }

    #[test]
    fn path_like_key_goes_through_loader() {
        let creds = parse("ssh://bob@host*~/.ssh/id_ed25519").unwrap();
        assert_eq!(creds.private_key(), "KEY FROM ~/.ssh/id_ed25519");
    }

    #[test]
    fn empty_loaded_key_is_rejected() {
        let err = Credentials::parse_with("ssh://bob@host*./empty.key", |_| Ok(String::new()))
            .unwrap_err();
        assert!(matches!(err, CredentialsError::EmptyKeyFile(ref p) if p == "./empty.key"));
    }

    #[test]
    fn literal_key_skips_loader() {
        let creds = Credentials::parse_with("ssh://bob@host*-----BEGIN KEY-----", |_| {
            panic!("loader must not be called for literal keys")
        })
        .unwrap();
        assert_eq!(creds.private_key(), "-----BEGIN KEY-----");
    }

    #[test]
    fn scheme_must_be_ssh() {
        let err = parse("sftp://bob@host!pw").unwrap_err();
        assert!(matches!(err, CredentialsError::InvalidScheme(ref s) if s == "sftp"));
    }

    #[test]
    fn port_zero_is_rejected() {
        let err = parse("ssh://bob@host:0!pw").unwrap_err();
        assert!(matches!(err, CredentialsError::InvalidPort(0)));
    }

    #[test]
    fn port_out_of_range_is_rejected() {
        assert!(parse("ssh://bob@host:70000!pw").is_err());
    }

    #[test]
    fn user_is_required() {
        let err = parse("ssh://host!pw").unwrap_err();
        assert!(matches!(err, CredentialsError::MissingUser));
    }

    #[test]
    fn user_is_percent_decoded() {
        let creds = parse("ssh://deploy%2Bci@host!pw").unwrap();
        assert_eq!(creds.user(), "deploy+ci");
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = parse("ssh://bob@host*keydata!hunter2").unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("keydata"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn target_is_printable() {
        let creds = parse("ssh://bob@web1:2200!pw").unwrap();
        assert_eq!(creds.target(), "bob@web1:2200");
    }

    #[test]
    fn key_path_prefixes() {
        for path in ["~/.ssh/id", "./id", "../id", "/etc/id", "file:///etc/id"] {
            assert!(is_key_path(path), "{path} should be a key path");
        }
        for literal in ["-----BEGIN", "keydata", "~id"] {
            assert!(!is_key_path(literal), "{literal} should be literal");
        }
    }
}
