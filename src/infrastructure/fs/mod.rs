//! Local filesystem helpers

mod home;
mod path;

pub use home::{dit_home_dir, expand_home, DIT_TEST_HOME_VAR};
pub use path::resolve_local_path;
