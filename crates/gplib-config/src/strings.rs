use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigResult;
use crate::fs::{FileSystem, OsFileSystem};
use crate::options::LoadOptions;
use crate::reconcile::{reconcile, write_map, Reconciled};

/// A configuration file kept as plain strings.
///
/// Bootstraps and repairs exactly like [`ConfigStore`](crate::ConfigStore)
/// but never decodes values: callers get back the tokens as written.
#[derive(Debug)]
pub struct StringConfigStore<F: FileSystem = OsFileSystem> {
    fs: F,
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl StringConfigStore<OsFileSystem> {
    pub fn open(path: impl AsRef<Path>, defaults: BTreeMap<String, String>) -> ConfigResult<Self> {
        Self::open_with(OsFileSystem, path, defaults, LoadOptions::default())
    }
}

impl<F: FileSystem> StringConfigStore<F> {
    pub fn open_with(
        fs: F,
        path: impl AsRef<Path>,
        defaults: BTreeMap<String, String>,
        options: LoadOptions,
    ) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match reconcile(&fs, &path, &defaults, &options)? {
            Reconciled::Bootstrapped => defaults,
            Reconciled::Loaded { entries, .. } => entries,
        };
        Ok(Self { fs, path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Write the current map back to the file.
    pub fn save(&self) -> ConfigResult<()> {
        write_map(&self.fs, &self.path, &self.values)
    }
}
