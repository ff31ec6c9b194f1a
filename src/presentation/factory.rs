//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::DeployUseCase;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{ConsoleEventSink, FsCredentialResolver, JsonEventSink, SshConnector};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<SshConnector, FsCredentialResolver>;

/// Create a deploy use case talking SSH, reporting to stdout
///
/// `json` selects NDJSON events instead of human-readable lines.
pub fn create_deploy_use_case(json: bool) -> ConcreteDeployUseCase {
    DeployUseCase::new(SshConnector::new(), FsCredentialResolver::new())
        .with_event_sink(create_event_sink(json))
}

pub fn create_event_sink(json: bool) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stdout())
    }
}
