//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod credentials;
mod remote_dir;

pub use credentials::{
    is_key_path, Credentials, CredentialsError, SecretKind, DEFAULT_SSH_PORT,
};
pub use remote_dir::{shell_quote, RemoteDir};
