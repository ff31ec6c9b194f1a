//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `transport/` - SSH connector, plus the in-memory connector for tests
//! - `events/` - Console and NDJSON event sinks
//! - `fs/` - Home expansion and local path resolution
//! - `credentials` - Credential resolver that reads key files

pub mod credentials;
pub mod events;
pub mod fs;
pub mod transport;

// Re-export for convenience
pub use credentials::FsCredentialResolver;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use transport::{MemoryConnector, SshConnector};
