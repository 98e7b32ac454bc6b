//! File element

use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Access mode a file element was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    /// Reads only; writes are rejected
    ReadOnly,
    /// Reads and writes
    ReadWrite,
}

/// Raw file opened on behalf of scripts.
///
/// Scripts never see OS handles or absolute paths; they get this element
/// plus the sandbox-relative path it was opened under.
#[derive(Debug)]
pub struct FileStream {
    inner: std::fs::File,
    relative_path: PathBuf,
    mode: FileMode,
}

impl FileStream {
    /// Create (or truncate) a file for reading and writing.
    pub fn create(absolute: &Path, relative: PathBuf) -> io::Result<Self> {
        let inner = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(absolute)?;
        Ok(Self {
            inner,
            relative_path: relative,
            mode: FileMode::ReadWrite,
        })
    }

    /// Open an existing file.
    pub fn open(absolute: &Path, relative: PathBuf, read_only: bool) -> io::Result<Self> {
        let inner = OpenOptions::new()
            .read(true)
            .write(!read_only)
            .open(absolute)?;
        Ok(Self {
            inner,
            relative_path: relative,
            mode: if read_only {
                FileMode::ReadOnly
            } else {
                FileMode::ReadWrite
            },
        })
    }

    /// Sandbox-relative path the element was opened under.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.relative_path
    }

    /// Access mode.
    #[must_use]
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Read up to `length` bytes from the current position.
    pub fn read(&mut self, length: usize) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0_u8; length];
        let count = self.inner.read(&mut buffer)?;
        buffer.truncate(count);
        Ok(buffer)
    }

    /// Write `data` at the current position. Rejected on read-only files.
    pub fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.mode == FileMode::ReadOnly {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file element was opened read-only",
            ));
        }
        self.inner.write(data)
    }

    /// Move the read/write cursor to `position` bytes from the start.
    pub fn seek(&mut self, position: u64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Start(position))
    }

    /// Current file size in bytes.
    pub fn size(&self) -> io::Result<u64> {
        Ok(self.inner.metadata()?.len())
    }
}
