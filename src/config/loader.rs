//! Configuration loading
//!
//! Two sources feed the same [`Config`]: a TOML file, or numbered
//! environment variables (optionally seeded from a `.env` file).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DitError, DitResult};

use super::types::{Config, HostSpec};

/// Prefix shared by every host variable
pub const NODE_VAR_PREFIX: &str = "DIT_NODE";

/// Overrides `[deploy] jobs`
pub const JOBS_VAR: &str = "DIT_JOBS";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DitResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| DitError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DitError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `DIT_NODE<n>`
pub fn node_var(node: usize) -> String {
    format!("{NODE_VAR_PREFIX}{node}")
}

/// `DIT_NODE<n>_TASK<m>`
pub fn task_var(node: usize, task: usize) -> String {
    format!("{NODE_VAR_PREFIX}{node}_TASK{task}")
}

/// Read hosts numbered from 1 until the first missing `DIT_NODE<n>`.
///
/// Each host's tasks are numbered from 1 until the first missing variable.
/// An empty variable counts as missing. A missing `DIT_NODE1` or a host
/// without `_TASK1` is an error.
pub fn hosts_from_vars<F>(lookup: F) -> DitResult<Vec<HostSpec>>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());
    let mut hosts = Vec::new();

    for node in 1.. {
        let Some(connection) = lookup(&node_var(node)) else {
            break;
        };

        let tasks: Vec<String> = (1..)
            .map_while(|task| lookup(&task_var(node, task)))
            .collect();

        let host = HostSpec::new(connection, tasks);
        if host.tasks.is_empty() {
            return Err(DitError::HostWithoutTasks {
                node,
                target: host.display_target().to_string(),
            });
        }
        tracing::debug!(node, tasks = host.tasks.len(), "host read from environment");
        hosts.push(host);
    }

    if hosts.is_empty() {
        return Err(DitError::NoHosts { var: node_var(1) });
    }
    Ok(hosts)
}

/// Apply environment variable overrides (DIT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

pub fn with_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(JOBS_VAR) {
        match value.trim().parse::<usize>() {
            Ok(jobs) if jobs > 0 => config.deploy.jobs = jobs,
            _ => tracing::warn!(var = JOBS_VAR, %value, "ignoring invalid job count"),
        }
    }
    config
}

/// Load a `.env` file into the process environment.
///
/// With no explicit path, `.env` in the working directory is used if present;
/// a default file that fails to load is skipped with a warning. An explicit
/// path that is missing or malformed is an error.
pub fn load_dotenv(path: Option<&Path>) -> DitResult<Option<PathBuf>> {
    let result = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(loaded) => {
            tracing::debug!(path = %loaded.display(), "environment file loaded");
            Ok(Some(loaded))
        }
        Err(err) if path.is_some() => Err(err.into()),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => {
            tracing::warn!(error = %err, "skipping environment file");
            Ok(None)
        }
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &["deploy", "jobs", "check_only", "host", "connection", "tasks"];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_keys() {
        assert_eq!(suggest_key("job"), Some("jobs".to_string()));
        assert_eq!(suggest_key("taks"), Some("tasks".to_string()));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("host", "host"), 0);
        assert_eq!(levenshtein("host", "hosts"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
    }
}
