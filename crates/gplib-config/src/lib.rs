//! Self-repairing JSON configuration for GeneralPurposeLib.
//!
//! A configuration file is a flat JSON object whose values are all strings,
//! so it stays editable by hand. The caller supplies a map of defaults; the
//! defaults act as the schema that decodes each string back into a
//! [`TypedValue`](gplib_types::TypedValue).
//!
//! # Stores
//!
//! - [`ConfigStore`] -- typed values, decoded against the defaults' kinds
//! - [`StringConfigStore`] -- the same reconciliation, values left as strings
//!
//! # Filesystem Backends
//!
//! Stores read and write through the [`FileSystem`] trait:
//!
//! - [`OsFileSystem`] -- `std::fs`
//! - [`InMemoryFileSystem`] -- `HashMap`-based backend for tests and embedding
//!
//! # Design Rules
//!
//! 1. Construction is the only time the file is read or repaired.
//! 2. A missing file is created from the defaults; nothing is read back.
//! 3. Missing keys are filled from the defaults and the full map is written
//!    back once.
//! 4. Any parse or decode failure aborts construction. There is no partial
//!    store.
//! 5. Nothing is written implicitly after construction; `save` is explicit.
//! 6. One owner per store. There is no locking and no file watching.

pub mod error;
pub mod fs;
pub mod memory;
pub mod options;
mod reconcile;
pub mod store;
pub mod strings;

pub use error::{ConfigError, ConfigResult};
pub use fs::{FileSystem, OsFileSystem};
pub use memory::InMemoryFileSystem;
pub use options::{LoadOptions, DEFAULT_CONFIG_FILE};
pub use store::ConfigStore;
pub use strings::StringConfigStore;
