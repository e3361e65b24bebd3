use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::fs::FileSystem;

/// In-memory, HashMap-based filesystem.
///
/// Intended for tests and embedding. Counts successful writes so callers can
/// assert that a load did not touch the file, and can be switched read-only
/// to exercise write failures.
pub struct InMemoryFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
    writes: AtomicUsize,
    read_only: AtomicBool,
}

impl InMemoryFileSystem {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            read_only: AtomicBool::new(false),
        }
    }

    /// Seed a file without counting it as a write.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), contents.into());
        self
    }

    /// Current contents of the file at `path`, if any.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no files are stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for InMemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().expect("lock poisoned").contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only filesystem: {}", path.display()),
            ));
        }
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFileSystem")
            .field("file_count", &self.len())
            .field("write_count", &self.write_count())
            .finish()
    }
}
