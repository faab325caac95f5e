//! Servable root abstraction
//!
//! The request handler only ever talks to a [`ServableRoot`]: file metadata,
//! a byte stream over a sub-range of a file, and directory entries. The local
//! filesystem implementation lives in [`local`]; tests swap in fakes.

pub mod local;
pub mod path;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use hyper::body::Bytes;
use std::io;

pub use local::LocalRoot;
pub use path::RootPath;

/// Stream of file chunks handed to the response body
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// What a path under the root points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File { size: u64 },
    Directory,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read-only access to the files under the serving root
#[async_trait]
pub trait ServableRoot: Send + Sync {
    /// Look up a path. `Ok(None)` when it does not exist (or resolves
    /// outside the root).
    async fn stat(&self, path: &RootPath) -> io::Result<Option<EntryKind>>;

    /// Open `len` bytes of a file starting at `start`.
    ///
    /// The file handle lives inside the returned stream and is closed when
    /// the stream is exhausted or dropped.
    async fn open_range(&self, path: &RootPath, start: u64, len: u64) -> io::Result<ByteStream>;

    /// Entries of a directory, in no particular order
    async fn list_dir(&self, path: &RootPath) -> io::Result<Vec<DirEntry>>;
}
