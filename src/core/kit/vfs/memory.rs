//! In-memory file system implementation

use super::{SourceFileSystem, SourceReader};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Cursor, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// An in-memory file system implementation.
///
/// Files are stored in a `BTreeMap`. Every reader handed out by `open` is
/// counted until it is dropped, so tests can assert that no file stays open.
///
/// # Example
/// ```
/// use llamac::core::kit::vfs::{MemoryFileSystem, SourceFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::with_files([("a.lla", "x\n")]);
/// let reader = fs.open(Path::new("a.lla")).unwrap();
/// assert_eq!(fs.open_readers(), 1);
/// drop(reader);
/// assert_eq!(fs.open_readers(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    open_readers: Arc<AtomicUsize>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: AsRef<[u8]>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path.as_ref(), content.as_ref());
        }
        fs
    }

    /// Add or replace a file
    pub fn insert(&self, path: &str, content: &[u8]) {
        // Nothing panics while holding the write lock
        if let Ok(mut files) = self.files.write() {
            files.insert(normalize_path(Path::new(path)), content.to_vec());
        }
    }

    /// Number of readers currently open
    pub fn open_readers(&self) -> usize {
        self.open_readers.load(Ordering::SeqCst)
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes consistently for cross-platform compatibility.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl SourceFileSystem for MemoryFileSystem {
    fn open(&self, path: &Path) -> io::Result<SourceReader> {
        let normalized = normalize_path(path);
        let files = self
            .files
            .read()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;

        let content = files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("path not found: {}", normalized),
            )
        })?;

        self.open_readers.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryReader {
            inner: Cursor::new(content),
            open_readers: Arc::clone(&self.open_readers),
        }))
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.files.read() {
            Ok(files) => files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        // No directory support: whatever exists is a file
        self.exists(path)
    }
}

/// Reader over a snapshot of one in-memory file
struct MemoryReader {
    inner: Cursor<Vec<u8>>,
    open_readers: Arc<AtomicUsize>,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for MemoryReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Drop for MemoryReader {
    fn drop(&mut self) {
        self.open_readers.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(!fs.exists(Path::new("anything.txt")));
        assert_eq!(fs.open_readers(), 0);
    }

    #[test]
    fn test_open_reads_content() {
        let fs = MemoryFileSystem::with_files([("main.lla", "one\ntwo\n")]);
        let mut reader = fs.open(Path::new("main.lla")).unwrap();

        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let fs = MemoryFileSystem::new();
        let err = fs.open(Path::new("missing.lla")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.open_readers(), 0);
    }

    #[test]
    fn test_reader_count_tracks_drops() {
        let fs = MemoryFileSystem::with_files([("a", ""), ("b", "")]);

        let a = fs.open(Path::new("a")).unwrap();
        let b = fs.open(Path::new("b")).unwrap();
        assert_eq!(fs.open_readers(), 2);

        drop(a);
        assert_eq!(fs.open_readers(), 1);
        drop(b);
        assert_eq!(fs.open_readers(), 0);
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let fs = MemoryFileSystem::with_files([("lib/util.lla", "x")]);
        assert!(fs.exists(Path::new("lib\\util.lla")));
        assert!(fs.is_file(Path::new("lib/util.lla")));
    }

    #[test]
    fn test_clone_shares_data() {
        let fs1 = MemoryFileSystem::new();
        let fs2 = fs1.clone();

        fs1.insert("shared.lla", b"shared");
        assert!(fs2.exists(Path::new("shared.lla")));

        let reader = fs2.open(Path::new("shared.lla")).unwrap();
        assert_eq!(fs1.open_readers(), 1);
        drop(reader);
    }
}
