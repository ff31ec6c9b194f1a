//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//!
//! ## Usage
//!
//! ```ignore
//! use dit::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case(false);
//! let result = use_case.execute(&config.hosts, &config.deploy_options());
//! ```

pub mod cli;
pub mod factory;

pub use cli::Cli;
pub use factory::create_deploy_use_case;
