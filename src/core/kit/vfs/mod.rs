//! Source file system
//!
//! The seam through which the scanner opens files. Two backends:
//! - `NativeFileSystem`: OS files, paths relative to the working directory
//! - `MemoryFileSystem`: in-memory files, used by tests
//!
//! # Usage
//! ```rust,ignore
//! use llamac::core::kit::vfs::{MemoryFileSystem, SourceFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::with_files([("main.lla", "let x = 1\n")]);
//! let reader = fs.open(Path::new("main.lla")).unwrap();
//! ```

mod memory;
mod native;

pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;

use std::io::{self, BufRead};
use std::path::Path;

/// Buffered reader handed out by a file system
pub type SourceReader = Box<dyn BufRead + Send>;

/// Source file system trait
///
/// Implementations must be shareable across the scanner's worker threads.
pub trait SourceFileSystem: Send + Sync {
    /// Open a file for sequential reading
    ///
    /// # Returns
    /// A buffered reader that owns the open file; dropping it closes the file.
    fn open(&self, path: &Path) -> io::Result<SourceReader>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a file
    fn is_file(&self, path: &Path) -> bool;
}

/// Create a new native file system.
pub fn native_fs() -> NativeFileSystem {
    NativeFileSystem::new()
}
