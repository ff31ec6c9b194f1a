//! Configuration module for dit
//!
//! Hosts and their tasks come from one of two places:
//! 1. A TOML file given with `--config`
//! 2. Environment variables `DIT_NODE<n>` / `DIT_NODE<n>_TASK<m>`,
//!    optionally loaded from a `.env` file
//!
//! Run-wide settings resolve as CLI flags > `DIT_JOBS` > file > defaults.

mod loader;
mod types;

pub use loader::{
    hosts_from_vars, load_dotenv, load_with_warnings, node_var, task_var, with_env_overrides,
    with_overrides_from, ConfigWarning, JOBS_VAR, NODE_VAR_PREFIX,
};
pub use types::{Config, DeployConfig, HostSpec};
