//! Home directory resolution with test isolation support.
//!
//! `dirs::home_dir()` uses system APIs on some platforms and ignores `HOME`.
//! [`dit_home_dir`] checks `DIT_TEST_HOME` first so tests can point `~/` at a
//! temporary directory, then falls back to `dirs::home_dir()`.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of home directory.
pub const DIT_TEST_HOME_VAR: &str = "DIT_TEST_HOME";

/// Home directory used to expand `~/` in local paths
pub fn dit_home_dir() -> Option<PathBuf> {
    std::env::var(DIT_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Expand a leading `~/` (or a bare `~`) to the home directory.
///
/// Paths without the prefix, or with no resolvable home, come back unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    match dit_home_dir() {
        Some(home) => expand_home_with(path, &home),
        None => path.to_path_buf(),
    }
}

fn expand_home_with(path: &Path, home: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if text == "~" {
        return home.to_path_buf();
    }
    match text.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => path.to_path_buf(),
    }
}
