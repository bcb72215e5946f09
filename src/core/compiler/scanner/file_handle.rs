//! 单个源文件的逐行读取

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use super::error::{IncludeSite, ScanError, ScanResult};
use crate::core::kit::generator::Generator;
use crate::core::kit::vfs::{SourceFileSystem, SourceReader};

/// 一个打开的源文件
///
/// 后台线程独占底层 reader，逐行读出后交给前台。
/// 读到文件末尾（或句柄被销毁）时 reader 随线程一起释放。
pub struct FileHandle {
    path: Arc<str>,
    current_line: usize,
    lines: Generator<io::Result<String>>,
}

impl FileHandle {
    /// 同步打开文件；打开失败时不会启动后台线程
    pub fn open(
        path: &str,
        fs: &dyn SourceFileSystem,
        site: Option<IncludeSite>,
    ) -> ScanResult<Self> {
        let reader = fs.open(Path::new(path)).map_err(|source| ScanError::Open {
            path: path.to_string(),
            site,
            source,
        })?;

        let path: Arc<str> = Arc::from(path);
        // 线程名固定，路径只作为日志字段（路径可能含 NUL）
        let lines = Generator::spawn("reader", {
            let path = Arc::clone(&path);
            move |y| {
                read_lines(reader, |line| y.send(line).is_ok() && !y.is_cancelled());
                trace!(target: "llamac::scanner", file = %path, "reader released");
            }
        })?;

        debug!(target: "llamac::scanner", file = %path, "file opened");

        Ok(Self {
            path,
            current_line: 0,
            lines,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn path_arc(&self) -> Arc<str> {
        Arc::clone(&self.path)
    }

    /// 已读出的行数（即最近一行的行号）
    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// 读取下一行及其行号；`None` 表示文件已读完
    ///
    /// 读取故障作为最后一个元素返回，之后恒为 `None`。
    pub fn next_line(&mut self) -> Option<ScanResult<(String, usize)>> {
        match self.lines.next()? {
            Ok(text) => {
                self.current_line += 1;
                Some(Ok((text, self.current_line)))
            }
            Err(source) => Some(Err(ScanError::Read {
                path: self.path.to_string(),
                line: self.current_line,
                source,
            })),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.lines.is_exhausted()
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("current_line", &self.current_line)
            .finish()
    }
}

/// 逐行读取并去掉行尾的 `\n` / `\r\n`
///
/// `emit` 返回 `false` 时停止读取。IO 错误作为最后一行交出。
fn read_lines<F>(mut reader: SourceReader, mut emit: F)
where
    F: FnMut(io::Result<String>) -> bool,
{
    let mut buf = String::new();
    loop {
        buf.clear();
        match reader.read_line(&mut buf) {
            Ok(0) => return,
            Ok(_) => {
                strip_line_terminator(&mut buf);
                if !emit(Ok(std::mem::take(&mut buf))) {
                    return;
                }
            }
            Err(err) => {
                emit(Err(err));
                return;
            }
        }
    }
}

fn strip_line_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
