// src/exec/env.rs

//! Environment construction for launched commands.

use std::collections::HashMap;

use tracing::debug;

use crate::errors::{CocoError, Result};

/// Build a process environment from a host snapshot plus `KEY=VALUE`
/// additions.
///
/// Every addition must contain exactly one `=`. Values are expanded
/// shell-style (`$NAME`, `${NAME}`) against `host` only, never against other
/// additions from the same call. Unknown names expand to the empty string.
///
/// The first malformed entry aborts the whole call; no partial environment is
/// returned.
pub fn build_environment<I, K, V>(host: I, additions: &[String]) -> Result<Vec<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let host: Vec<(String, String)> = host
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let lookup: HashMap<&str, &str> = host
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut env: Vec<String> = host.iter().map(|(k, v)| format!("{k}={v}")).collect();

    for entry in additions {
        let (key, value) = split_entry(entry)?;
        let expanded = shellexpand::env_with_context_no_errors(value, |name: &str| {
            Some(lookup.get(name).map(|v| v.to_string()).unwrap_or_default())
        });
        debug!(key, value = %expanded, "adding environment override");
        env.push(format!("{key}={expanded}"));
    }

    Ok(env)
}

/// [`build_environment`] against the current process environment.
pub fn make_environment(additions: &[String]) -> Result<Vec<String>> {
    let host = std::env::vars_os().map(|(k, v)| {
        (
            k.to_string_lossy().into_owned(),
            v.to_string_lossy().into_owned(),
        )
    });
    build_environment(host, additions)
}

fn split_entry(entry: &str) -> Result<(&str, &str)> {
    let mut parts = entry.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Ok((key, value)),
        _ => Err(CocoError::EnvironmentFormat(entry.to_string())),
    }
}
