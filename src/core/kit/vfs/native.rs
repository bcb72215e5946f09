//! Native file system implementation

use super::{SourceFileSystem, SourceReader};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// A native OS file system implementation.
///
/// Wraps `std::fs::File` in a `BufReader`. Paths are used as given, so
/// relative paths resolve against the process working directory.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem {}

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self {}
    }
}

impl SourceFileSystem for NativeFileSystem {
    fn open(&self, path: &Path) -> io::Result<SourceReader> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
