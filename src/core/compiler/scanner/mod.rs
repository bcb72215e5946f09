//! 多文件扫描器
//!
//! 把根文件及其（递归）`#include` 的文件展开为一条有序事件流：
//! 进入/返回文件时产出 `FileChange`，每一行普通源码产出 `Line`。
//! 事件顺序与按文本替换 include 行的结果一致。
//!
//! 扫描由一个后台线程驱动，它独占一个文件栈（栈底是根文件，栈顶是当前文件）。
//! 扫描期间的错误作为最后一个事件交出，随后流结束。
//!
//! # Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use llamac::core::compiler::scanner::{FileScanner, ScanOptions};
//! use llamac::core::kit::vfs::MemoryFileSystem;
//!
//! let fs = MemoryFileSystem::with_files([
//!     ("main.lla", "#include \"lib.lla\"\nmain\n"),
//!     ("lib.lla", "lib\n"),
//! ]);
//! let scanner = FileScanner::open("main.lla", Arc::new(fs), ScanOptions::default())?;
//! for event in scanner {
//!     println!("{}", event?);
//! }
//! ```

mod directive;
mod error;
mod event;
mod file_handle;

pub use directive::{parse_directive, Directive, DirectiveError};
pub use error::{IncludeSite, ScanError, ScanResult};
pub use event::{EventKind, ScanEvent};
pub use file_handle::FileHandle;

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::kit::generator::{Generator, Yielder};
use crate::core::kit::vfs::SourceFileSystem;

/// 默认 include 嵌套上限
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 200;

/// 扫描选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// 根文件之上最多允许嵌套的 include 层数
    pub max_include_depth: usize,
    /// 是否拒绝包含栈上已有的文件
    pub detect_cycles: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            detect_cycles: true,
        }
    }
}

/// 扫描过程的统计
///
/// 事件流之外唯一跨线程共享的状态：只有驱动线程写入，消费者只读；
/// 生产者在流结束时被 join，之后读到的才是最终值。
#[derive(Debug, Default)]
struct ScanStats {
    max_depth: AtomicUsize,
    files_opened: AtomicUsize,
}

/// 多文件扫描器
///
/// 是 `ScanResult<ScanEvent>` 的迭代器。销毁扫描器会取消后台任务，
/// 并在返回前关闭所有仍打开的文件。
pub struct FileScanner {
    root: Arc<str>,
    stats: Arc<ScanStats>,
    events: Generator<ScanResult<ScanEvent>>,
}

impl FileScanner {
    /// 打开根文件并启动扫描
    ///
    /// 根文件打开失败时直接返回错误，不会产生任何事件。
    pub fn open(
        root: &str,
        fs: Arc<dyn SourceFileSystem>,
        options: ScanOptions,
    ) -> ScanResult<Self> {
        let handle = FileHandle::open(root, fs.as_ref(), None)?;
        let root = handle.path_arc();
        let stats = Arc::new(ScanStats::default());
        stats.max_depth.store(1, Ordering::Relaxed);
        stats.files_opened.store(1, Ordering::Relaxed);

        let driver = Driver {
            fs,
            options,
            stats: Arc::clone(&stats),
            stack: vec![handle],
        };
        let events = Generator::spawn("scanner", move |y| driver.run(&y))?;

        debug!(
            target: "llamac::scanner",
            root = %root,
            max_include_depth = options.max_include_depth,
            detect_cycles = options.detect_cycles,
            "scan started"
        );

        Ok(Self {
            root,
            stats,
            events,
        })
    }

    /// 根文件路径
    pub fn root(&self) -> &str {
        &self.root
    }

    /// 到目前为止出现过的最大文件栈深度（根文件为 1）
    pub fn max_depth(&self) -> usize {
        self.stats.max_depth.load(Ordering::Relaxed)
    }

    /// 到目前为止打开过的文件数（含根文件，重复 include 重复计数）
    pub fn files_opened(&self) -> usize {
        self.stats.files_opened.load(Ordering::Relaxed)
    }

    /// 取出底层生成器，用于接入组合子
    pub fn into_generator(self) -> Generator<ScanResult<ScanEvent>> {
        self.events
    }
}

impl Iterator for FileScanner {
    type Item = ScanResult<ScanEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next()
    }
}

impl FusedIterator for FileScanner {}

impl std::fmt::Debug for FileScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileScanner")
            .field("root", &self.root)
            .field("events", &self.events)
            .finish()
    }
}

/// 扫描驱动，只在后台线程中使用
struct Driver {
    fs: Arc<dyn SourceFileSystem>,
    options: ScanOptions,
    stats: Arc<ScanStats>,
    stack: Vec<FileHandle>,
}

impl Driver {
    fn run(mut self, y: &Yielder<ScanResult<ScanEvent>>) {
        let Some(root) = self.stack.last().map(FileHandle::path_arc) else {
            return;
        };
        if y.send(Ok(ScanEvent::file_change(root))).is_err() {
            return;
        }

        loop {
            if y.is_cancelled() {
                debug!(target: "llamac::scanner", depth = self.stack.len(), "scan cancelled");
                return;
            }

            match self.step() {
                None => break,
                Some(Ok(event)) => {
                    if y.send(Ok(event)).is_err() {
                        debug!(target: "llamac::scanner", depth = self.stack.len(), "scan cancelled");
                        return;
                    }
                }
                Some(Err(err)) => {
                    warn!(target: "llamac::scanner", error = %err, "scan aborted");
                    let _ = y.send(Err(err));
                    return;
                }
            }
        }

        debug!(target: "llamac::scanner", "scan finished");
    }

    /// 推进一步，产出下一个事件；`None` 表示栈已清空
    fn step(&mut self) -> Option<ScanResult<ScanEvent>> {
        let next = self.stack.last_mut()?.next_line();
        match next {
            None => {
                if let Some(finished) = self.stack.pop() {
                    trace!(
                        target: "llamac::scanner",
                        file = %finished.path(),
                        lines = finished.current_line(),
                        "file finished"
                    );
                }
                self.stack
                    .last()
                    .map(|parent| Ok(ScanEvent::file_change(parent.path_arc())))
            }
            Some(Err(err)) => Some(Err(err)),
            Some(Ok((text, lineno))) => match parse_directive(&text) {
                Ok(None) => Some(Ok(ScanEvent::line(text, lineno))),
                Ok(Some(Directive::Include(target))) => Some(self.include(target, lineno)),
                Err(kind) => Some(Err(ScanError::Syntax {
                    path: self.current_path(),
                    line: lineno,
                    text,
                    kind,
                })),
            },
        }
    }

    fn include(&mut self, target: String, lineno: usize) -> ScanResult<ScanEvent> {
        let in_file = self.current_path();

        if self.options.detect_cycles && self.stack.iter().any(|h| h.path() == target) {
            return Err(ScanError::IncludeCycle {
                path: target,
                in_file,
                line: lineno,
            });
        }

        if self.stack.len() > self.options.max_include_depth {
            return Err(ScanError::IncludeDepthExceeded {
                path: target,
                in_file,
                line: lineno,
                limit: self.options.max_include_depth,
            });
        }

        let site = IncludeSite {
            file: in_file,
            line: lineno,
        };
        let handle = FileHandle::open(&target, self.fs.as_ref(), Some(site))?;
        let path = handle.path_arc();
        self.stack.push(handle);

        self.stats.files_opened.fetch_add(1, Ordering::Relaxed);
        self.stats
            .max_depth
            .fetch_max(self.stack.len(), Ordering::Relaxed);
        trace!(target: "llamac::scanner", file = %path, depth = self.stack.len(), "include pushed");

        Ok(ScanEvent::file_change(path))
    }

    fn current_path(&self) -> String {
        self.stack
            .last()
            .map(|h| h.path().to_string())
            .unwrap_or_default()
    }
}
