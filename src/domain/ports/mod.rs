//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod credential_resolver;
pub mod deploy_events;
pub mod transport;

pub use credential_resolver::{CredentialResolver, LiteralCredentialResolver};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use transport::{
    BoxError, CommandChannel, CommandOutput, Connection, Connector, FileChannel, TransportError,
};
