//! Local path resolution for user-supplied references such as key files

use std::path::{Component, Path, PathBuf};

use super::home::expand_home;

const FILE_URL_PREFIX: &str = "file://";

/// Turn a path reference into an absolute, lexically normalized path.
///
/// Accepts `file://` references, expands `~/`, and joins relative paths onto
/// `base`. `..` is resolved without touching the filesystem.
pub fn resolve_local_path(reference: &str, base: &Path) -> PathBuf {
    let stripped = reference.strip_prefix(FILE_URL_PREFIX).unwrap_or(reference);
    let expanded = expand_home(Path::new(stripped));
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
