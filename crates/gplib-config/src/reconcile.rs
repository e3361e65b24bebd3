//! Bootstrap, load and repair of the on-disk string map.
//!
//! Both stores share this pass. It works purely on strings; typed decoding
//! happens afterwards in [`ConfigStore`](crate::ConfigStore).

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::fs::FileSystem;
use crate::options::LoadOptions;

/// Outcome of reconciling a file against its defaults.
#[derive(Debug)]
pub(crate) enum Reconciled {
    /// No file existed; the defaults were written as-is.
    Bootstrapped,
    /// The file was read and, if needed, repaired.
    Loaded {
        entries: BTreeMap<String, String>,
        /// Keys that were missing and filled from the defaults.
        repaired: Vec<String>,
    },
}

/// Reconcile the file at `path` against the encoded `defaults`.
///
/// At most one read and one write. Any parse failure aborts before anything
/// is written.
pub(crate) fn reconcile<F: FileSystem>(
    fs: &F,
    path: &Path,
    defaults: &BTreeMap<String, String>,
    options: &LoadOptions,
) -> ConfigResult<Reconciled> {
    if !fs.exists(path) {
        write_map(fs, path, defaults)?;
        if options.log {
            info!(path = %path.display(), "config file created with default values");
        }
        return Ok(Reconciled::Bootstrapped);
    }

    let data = fs.read_to_string(path).map_err(|e| match e.kind() {
        // Readable, but not text: a content problem, not an I/O one.
        io::ErrorKind::InvalidData => ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            key: None,
            message: e.to_string(),
        },
        _ => ConfigError::io(path, e),
    })?;
    let mut entries = parse_map(path, &data, options)?;

    let mut repaired = Vec::new();
    for (key, default) in defaults {
        if entries.contains_key(key) {
            continue;
        }
        entries.insert(key.clone(), default.clone());
        if options.log {
            info!(
                key = %key,
                default = %default,
                "config file is missing required value, added default"
            );
        }
        repaired.push(key.clone());
    }

    if !repaired.is_empty() {
        write_map(fs, path, &entries)?;
        if options.log {
            info!(path = %path.display(), count = repaired.len(), "wrote missing config values to config file");
        }
    }

    Ok(Reconciled::Loaded { entries, repaired })
}

/// Parse a flat JSON object whose values are all strings. A leading UTF-8
/// byte order mark is ignored.
pub(crate) fn parse_map(
    path: &Path,
    data: &str,
    options: &LoadOptions,
) -> ConfigResult<BTreeMap<String, String>> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    serde_json::from_str::<BTreeMap<String, String>>(data).map_err(|e| {
        if options.log {
            debug!(path = %path.display(), error = %e, "config file failed to parse");
        }
        ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            key: None,
            message: e.to_string(),
        }
    })
}

/// Pretty-print `map` as JSON and replace the file with it.
pub(crate) fn write_map<F: FileSystem>(
    fs: &F,
    path: &Path,
    map: &BTreeMap<String, String>,
) -> ConfigResult<()> {
    let json =
        serde_json::to_string_pretty(map).map_err(|e| ConfigError::Serialization(e.to_string()))?;
    fs.write(path, &json).map_err(|e| ConfigError::io(path, e))
}
