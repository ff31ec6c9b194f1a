//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - parse hosts, precheck every task, then deploy each host

pub mod deploy;

pub use deploy::{DeployError, DeployOptions, DeployResult, DeployUseCase};
