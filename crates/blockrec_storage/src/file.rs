//! File-based byte source for log files on disk.

use crate::error::StorageResult;
use crate::source::ByteSource;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A read-only, file-backed byte source.
///
/// The file is opened read-only; this source never writes, truncates, or
/// creates files.
///
/// # Short Reads
///
/// `File::read` may return fewer bytes than requested even when more data
/// is available. `read_at` keeps reading until the requested length is
/// satisfied or the OS reports EOF, so a short result always means the end
/// of the file.
///
/// # Thread Safety
///
/// The handle is guarded by a mutex that is held only for one seek+read
/// pair. For parallel reads, open one `FileSource` per thread.
///
/// # Example
///
/// ```no_run
/// use blockrec_storage::{ByteSource, FileSource};
/// use std::path::Path;
///
/// let source = FileSource::open(Path::new("records.log")).unwrap();
/// let header = source.read_at(0, 16).unwrap();
/// ```
#[derive(Debug)]
pub struct FileSource {
    path: Option<PathBuf>,
    file: Mutex<File>,
}

impl FileSource {
    /// Opens an existing file for random-access reads.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file: Mutex::new(file),
        })
    }

    /// Wraps an already opened file handle.
    ///
    /// The handle must be readable; its current cursor position is
    /// irrelevant because every read seeks first.
    #[must_use]
    pub fn from_file(file: File) -> Self {
        Self {
            path: None,
            file: Mutex::new(file),
        }
    }

    /// Returns the path the source was opened from, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ByteSource for FileSource {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;

        // read_to_end retries interrupted and short reads until EOF or the limit.
        let mut buffer = Vec::new();
        file.by_ref().take(len as u64).read_to_end(&mut buffer)?;

        Ok(buffer)
    }

    fn size(&self) -> StorageResult<u64> {
        let file = self.file.lock();
        Ok(file.metadata()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(data).unwrap();
        file.sync_all().unwrap();
        path
    }

    #[test]
    fn file_open_missing_fails_with_io_error() {
        let dir = tempdir().unwrap();
        let result = FileSource::open(&dir.path().join("missing.log"));
        let err = result.unwrap_err();
        assert_eq!(err.io_kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn file_read_full() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"hello world");

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.size().unwrap(), 11);
        assert_eq!(source.read_at(0, 11).unwrap(), b"hello world");
    }

    #[test]
    fn file_read_partial() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"hello world");

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.read_at(6, 5).unwrap(), b"world");
    }

    #[test]
    fn file_read_crossing_end_is_short() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"hello");

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.read_at(3, 10).unwrap(), b"lo");
    }

    #[test]
    fn file_read_past_end_is_empty() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"hello");

        let source = FileSource::open(&path).unwrap();
        assert!(source.read_at(10, 5).unwrap().is_empty());
    }

    #[test]
    fn file_empty_read() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"hello");

        let source = FileSource::open(&path).unwrap();
        assert!(source.read_at(2, 0).unwrap().is_empty());
    }

    #[test]
    fn file_observes_appended_bytes() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"abc");
        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.size().unwrap(), 3);

        let mut appender = OpenOptions::new().append(true).open(&path).unwrap();
        appender.write_all(b"def").unwrap();
        appender.sync_all().unwrap();

        assert_eq!(source.size().unwrap(), 6);
        assert_eq!(source.read_at(0, 6).unwrap(), b"abcdef");
    }

    #[test]
    fn file_from_handle() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"handle data");

        let source = FileSource::from_file(File::open(&path).unwrap());
        assert!(source.path().is_none());
        assert_eq!(source.read_at(7, 4).unwrap(), b"data");
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "test.log", b"");

        let source = FileSource::open(&path).unwrap();
        assert_eq!(source.path(), Some(path.as_path()));
        assert_eq!(source.size().unwrap(), 0);
    }
}
