//! Defines the storage driver interface and the bundled back-ends.
//!
//! A [`StorageDriver`] serves one authenticated session; it receives
//! already-resolved virtual paths (absolute, `/`-rooted) and re-roots them
//! into its own namespace. Drivers are produced per login by a
//! [`DriverFactory`], which receives the user's home segment.

mod error;
pub mod filesystem;
pub mod object;

pub use error::{Error, ErrorKind};
pub use filesystem::{Filesystem, FilesystemFactory};
pub use object::{ObjectStorage, ObjectStorageFactory};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::{self, Debug, Formatter, Write};
use std::result;

/// Result type used by traits in this module.
pub type Result<T> = result::Result<T, Error>;

/// A positioned byte stream handed out by [`StorageDriver::get_file`] and
/// consumed by [`StorageDriver::put_file`].
pub type FileStream = Box<dyn tokio::io::AsyncRead + Send + Sync + Unpin>;

/// Callback invoked per entry by [`StorageDriver::list_dir`]. Returning an
/// error stops the enumeration and propagates.
pub type ListFn<'a> = dyn FnMut(&FileInfo) -> Result<()> + Send + 'a;

/// Unix-style permission bits with an `rwxrwxrwx` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(pub u32);

const PERM_READ: u32 = 0b100_100_100;
const PERM_WRITE: u32 = 0b010_010_010;
const PERM_EXEC: u32 = 0b001_001_001;
const PERM_USER: u32 = 0b111_000_000;
const PERM_GROUP: u32 = 0b000_111_000;
const PERM_OTHERS: u32 = 0b000_000_111;

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char(if self.0 & PERM_USER & PERM_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & PERM_USER & PERM_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & PERM_USER & PERM_EXEC > 0 { 'x' } else { '-' })?;
        f.write_char(if self.0 & PERM_GROUP & PERM_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & PERM_GROUP & PERM_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & PERM_GROUP & PERM_EXEC > 0 { 'x' } else { '-' })?;
        f.write_char(if self.0 & PERM_OTHERS & PERM_READ > 0 { 'r' } else { '-' })?;
        f.write_char(if self.0 & PERM_OTHERS & PERM_WRITE > 0 { 'w' } else { '-' })?;
        f.write_char(if self.0 & PERM_OTHERS & PERM_EXEC > 0 { 'x' } else { '-' })?;
        Ok(())
    }
}

/// Size reported for synthetic directory entries.
const SYNTHETIC_DIR_SIZE: u64 = 4096;

/// The metadata of one entry as seen through a storage driver.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Bare entry name (no path separators), or `/` for the root.
    pub name: String,
    /// Size in bytes; directories report a nominal block size.
    pub size: u64,
    /// Permission bits.
    pub mode: Permissions,
    /// Last modification time, UTC.
    pub modified: DateTime<Utc>,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl FileInfo {
    /// The synthetic entry every driver returns for the virtual root `/`.
    pub fn root() -> Self {
        FileInfo::synthetic_dir("/")
    }

    /// A synthetic directory entry for paths that exist only implicitly
    /// (object-store prefixes, the root).
    pub fn synthetic_dir<S: Into<String>>(name: S) -> Self {
        FileInfo {
            name: name.into(),
            size: SYNTHETIC_DIR_SIZE,
            mode: Permissions(0o777),
            modified: Utc::now(),
            is_dir: true,
        }
    }

    /// The `drwxr-xr-x` style string used in LIST rows.
    pub fn mode_string(&self) -> String {
        format!("{}{}", if self.is_dir { 'd' } else { '-' }, self.mode)
    }
}

/// The hierarchical file interface every back-end provides to a session.
///
/// All paths are virtual: absolute, canonical and `/`-rooted. The driver
/// maps them to physical locations under the home it was constructed for.
#[async_trait]
pub trait StorageDriver: Send + Sync + Debug {
    /// Returns the entry's metadata. The root `/` always yields a
    /// directory entry.
    async fn stat(&self, path: &str) -> Result<FileInfo>;

    /// Sets access and modification times. Back-ends that cannot return
    /// [`ErrorKind::Unsupported`].
    async fn chtimes(&self, path: &str, atime: DateTime<Utc>, mtime: DateTime<Utc>) -> Result<()>;

    /// Creates the directory, parents included. Succeeds if it already
    /// exists.
    async fn make_dir(&self, path: &str) -> Result<()>;

    /// Removes the directory and everything below it. Fails with
    /// [`ErrorKind::NotADirectory`] if the path is a file.
    async fn delete_dir(&self, path: &str) -> Result<()>;

    /// Removes the file. Fails with [`ErrorKind::IsADirectory`] if the
    /// path is a directory.
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// Renames a file or directory.
    async fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Enumerates the immediate children of a directory, invoking `cb` per
    /// entry. A callback error stops the walk and propagates.
    async fn list_dir(&self, path: &str, cb: &mut ListFn<'_>) -> Result<()>;

    /// Opens the file for reading at `offset`. Returns the number of bytes
    /// remaining and the positioned stream.
    async fn get_file(&self, path: &str, offset: u64) -> Result<(u64, FileStream)>;

    /// Writes the stream to the file. Offset zero creates or truncates;
    /// a positive offset appends. Fails if the path is an existing
    /// directory. Returns the number of bytes written.
    async fn put_file(&self, path: &str, offset: u64, reader: FileStream) -> Result<u64>;
}

/// Produces a [`StorageDriver`] bound to a user's home at login time.
///
/// `home` is the path segment the driver roots itself under: the user name
/// when per-user homes are enabled, empty for a shared tree.
#[async_trait]
pub trait DriverFactory: Send + Sync + Debug {
    /// Builds the driver, creating the home if the back-end needs that.
    async fn new_driver(&self, home: &str) -> Result<Box<dyn StorageDriver>>;
}
