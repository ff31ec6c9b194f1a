//! Domain Layer
//!
//! The core of dit: the task model, host jobs and the ports the
//! orchestrator talks to.
//!
//! ## Structure
//!
//! - `entities/` - Task (upload/download/command) and HostJob
//! - `value_objects/` - Immutable value types (Credentials, RemoteDir)
//! - `ports/` - Interface definitions for infrastructure (transport, credential
//!   resolution, deploy events)
//!
//! ## Design Principles
//!
//! 1. **Remote I/O only through ports** - tasks never open network
//!    connections themselves; they run against a `Connection` handed in
//! 2. **Local checks are cheap** - prechecks only stat local paths
//! 3. **Immutable after parse** - tasks and credentials never change once built

pub mod entities;
pub mod ports;
pub mod value_objects;
