//! CredentialResolver port - connection descriptor to `Credentials`
//!
//! Parsing the descriptor grammar is pure and lives in the value object;
//! resolving a private key path needs the local filesystem, so the full
//! resolution step is behind this trait.

use crate::domain::value_objects::{Credentials, CredentialsError};

pub trait CredentialResolver: Send + Sync {
    /// Resolve a raw `ssh://...` descriptor into validated credentials
    fn resolve(&self, raw: &str) -> Result<Credentials, CredentialsError>;
}

/// Resolver that treats every private key field as literal key material.
///
/// Useful when keys are injected inline (tests, CI secrets).
pub struct LiteralCredentialResolver;

impl CredentialResolver for LiteralCredentialResolver {
    fn resolve(&self, raw: &str) -> Result<Credentials, CredentialsError> {
        Credentials::parse_with(raw, |field| Ok(field.to_string()))
    }
}
