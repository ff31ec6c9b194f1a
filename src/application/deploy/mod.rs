//! Deploy Module
//!
//! Orchestrates the two-phase deployment protocol.
//!
//! ## Structure
//!
//! - `options` - Run configuration (`DeployOptions`)
//! - `result` - Result types (`DeployResult`)
//! - `error` - Contextualized run errors (`DeployError`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use dit::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(connector, resolver);
//! let result = use_case.execute(&hosts, &DeployOptions::new())?;
//! ```

mod error;
mod options;
mod result;
mod use_case;

pub use error::DeployError;
pub use options::DeployOptions;
pub use result::DeployResult;
pub use use_case::DeployUseCase;
