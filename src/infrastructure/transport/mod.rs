//! Transport implementations of the `Connector` port
//!
//! - `SshConnector`: real SSH sessions via libssh2
//! - `MemoryConnector`: scripted in-memory remote, the test double used by
//!   unit and integration tests

mod memory;
mod ssh;

pub use memory::MemoryConnector;
pub use ssh::{SshConnector, DEFAULT_CONNECT_TIMEOUT};
