use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Filesystem access required by the config loaders.
///
/// Calls are synchronous. Implementations are assumed to write whole files;
/// partial writes are not detected.
pub trait FileSystem: Send + Sync {
    /// Check whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full contents of the file at `path`.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file at `path` with `contents`, creating it if needed.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// The real filesystem, via `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for Arc<F> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}
