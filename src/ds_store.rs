//! Positional file store backing the data server.
//!
//! Every object lives in a plain file `<pool root>/<object key>`. A handle is
//! opened for a single operation, used for positional writes and size queries,
//! and closed before the operation returns. Dropping a [StoreFile] closes the
//! underlying descriptor too, so early returns never leak it.
//!
//! Writing past the current end of file extends it. The content of the gap
//! between the old end of file and the write offset is unspecified: on most
//! local file systems it reads back as zeroes (a hole), but callers must not
//! rely on it.
//!
//! All calls block on file system I/O. Async callers run them on the blocking
//! thread pool.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

/// Opens backing files under a fixed pool directory.
#[derive(Clone, Debug)]
pub struct PositionalFileStore {
    root: PathBuf,
}

impl PositionalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PositionalFileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the backing file for `key`.
    ///
    /// Keys must be a single, normal path component so that objects can never
    /// escape the pool directory.
    pub fn object_path(&self, key: &str) -> io::Result<PathBuf> {
        let mut components = Path::new(key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == key => Ok(self.root.join(name)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid object key {key:?}"),
            )),
        }
    }

    /// Opens the backing file of `key` for reading and writing, creating it
    /// when missing. With `truncate` set the file is cut to zero length.
    pub fn open(&self, key: &str, truncate: bool) -> io::Result<StoreFile> {
        let path = self.object_path(key)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        if truncate {
            trace!("truncate file {:?}", path);
            file.set_len(0)?;
        }
        debug!("opened {:?} (truncate: {})", path, truncate);
        Ok(StoreFile { file, path })
    }
}

/// An open backing file.
#[derive(Debug)]
pub struct StoreFile {
    file: File,
    path: PathBuf,
}

impl StoreFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the first `length` bytes of `payload` at absolute position
    /// `offset` and returns the number of bytes written.
    pub fn write(&mut self, payload: &[u8], offset: u64, length: usize) -> io::Result<usize> {
        let Some(data) = payload.get(..length) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("length {} exceeds payload of {} bytes", length, payload.len()),
            ));
        };
        write_all_at(&self.file, data, offset)?;
        Ok(data.len())
    }

    /// Current length of the backing file.
    pub fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Flushes file data and metadata to stable storage and releases the
    /// descriptor.
    pub fn close(self) -> io::Result<()> {
        self.file.sync_all()?;
        trace!("closed {:?}", self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn write_all_at(file: &File, data: &[u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;

    file.write_all_at(data, offset)
}

#[cfg(windows)]
fn write_all_at(file: &File, mut data: &[u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !data.is_empty() {
        match file.seek_write(data, offset)? {
            0 => return Err(io::Error::from(io::ErrorKind::WriteZero)),
            n => {
                data = &data[n..];
                offset += n as u64;
            }
        }
    }
    Ok(())
}
