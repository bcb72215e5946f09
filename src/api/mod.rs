//! API 层 - 对外接口
//!
//! 扫描、流水线和一次性预处理，输入 → 输出，不关心如何呈现。
//! 这里是唯一读取全局配置的地方。

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::core::compiler::scanner::{FileScanner, ScanEvent, ScanOptions, ScanResult};
use crate::core::config::{self, Phase};
use crate::core::kit::generator::{tap, Generator};
use crate::core::kit::vfs::{native_fs, SourceFileSystem};
use crate::phase_span;

// 重导出错误和类型
pub use error::{ErrorReport, FrontendError};
pub use types::{PreprocessOutput, PrintTaps};

mod error;
mod types;

/// 扫描事件流
pub type EventStream = Generator<ScanResult<ScanEvent>>;

/// 在本地文件系统上扫描，选项取自全局配置
///
/// # Errors
/// 根文件不存在时返回 `FrontendError::RootNotFound`；
/// 根文件无法打开时返回 `FrontendError::Scan`
pub fn scan(path: &str) -> Result<FileScanner, FrontendError> {
    scan_with(path, Arc::new(native_fs()), config::config().scan_options())
}

/// 在指定文件系统上以指定选项扫描
#[instrument(target = "llamac::scanner", skip(fs))]
pub fn scan_with(
    path: &str,
    fs: Arc<dyn SourceFileSystem>,
    options: ScanOptions,
) -> Result<FileScanner, FrontendError> {
    if !fs.is_file(Path::new(path)) {
        return Err(FrontendError::RootNotFound {
            path: path.to_string(),
        });
    }
    Ok(FileScanner::open(path, fs, options)?)
}

/// 构建扫描流水线，按需接入旁路输出
///
/// 返回的流由调用者驱动（例如 `try_drain`）。
pub fn pipeline(path: &str, taps: PrintTaps) -> Result<EventStream, FrontendError> {
    pipeline_with(
        path,
        Arc::new(native_fs()),
        config::config().scan_options(),
        taps,
    )
}

/// [`pipeline`] 的可注入版本
pub fn pipeline_with(
    path: &str,
    fs: Arc<dyn SourceFileSystem>,
    options: ScanOptions,
    taps: PrintTaps,
) -> Result<EventStream, FrontendError> {
    let mut stream = scan_with(path, fs, options)?.into_generator();

    if let Some(writer) = taps.source {
        stream = tap(stream, writer, source_projection)?;
    }
    if let Some(writer) = taps.events {
        stream = tap(stream, writer, event_projection)?;
    }

    debug!(target: "llamac::scanner", path, "pipeline built");
    Ok(stream)
}

/// 源码旁路：只输出源码行
fn source_projection(item: &ScanResult<ScanEvent>) -> Option<String> {
    item.as_ref().ok()?.source_line().map(str::to_string)
}

/// 事件旁路：每个事件一行 JSON
fn event_projection(item: &ScanResult<ScanEvent>) -> Option<String> {
    serde_json::to_string(item.as_ref().ok()?).ok()
}

/// 在本地文件系统上完整预处理
pub fn preprocess(path: &str) -> Result<PreprocessOutput, FrontendError> {
    preprocess_with(path, Arc::new(native_fs()), config::config().scan_options())
}

/// [`preprocess`] 的可注入版本
///
/// 遇到第一个错误即停止，剩余的扫描任务随扫描器一起取消。
pub fn preprocess_with(
    path: &str,
    fs: Arc<dyn SourceFileSystem>,
    options: ScanOptions,
) -> Result<PreprocessOutput, FrontendError> {
    let span = phase_span!(Phase::Scanner, "preprocess", root = path);
    let _guard = span.enter();

    let mut scanner = scan_with(path, fs, options)?;
    let mut output = PreprocessOutput::default();
    let mut seen = HashSet::new();

    for item in scanner.by_ref() {
        let event = item?;
        output.events += 1;
        match event {
            ScanEvent::Line { text, .. } => {
                output.lines += 1;
                output.source.push_str(&text);
                output.source.push('\n');
            }
            ScanEvent::FileChange { path } => {
                if seen.insert(Arc::clone(&path)) {
                    output.files.push(path.to_string());
                }
            }
        }
    }
    output.max_depth = scanner.max_depth();

    info!(
        target: "llamac::scanner",
        events = output.events,
        lines = output.lines,
        files = output.files.len(),
        max_depth = output.max_depth,
        "preprocess completed"
    );
    Ok(output)
}
