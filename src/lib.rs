//! llamac - Llama compiler front end, input stage
//!
//! Lazy concurrent generators and a multi-file scanner that resolves
//! `#include "path"` directives into one ordered event stream.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── api/       - Public API layer (scan, pipeline, preprocess)
//! ├── core/      - Generators, scanner, config, logging
//! └── platform/  - Platform-specific adapters (CLI formatting, output targets)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use llamac::{init, scan, Config};
//!
//! init(Config::default());
//! for event in scan("main.lla")? {
//!     println!("{}", event?);
//! }
//! ```

// 核心层
pub mod core;

// API 层（对外接口）
pub mod api;

// 平台适配层（CLI 格式化）
pub mod platform;

// 重导出常用类型
pub use api::{
    pipeline, preprocess, scan, scan_with, ErrorReport, EventStream, FrontendError,
    PreprocessOutput, PrintTaps,
};
pub use core::compiler::scanner::{FileScanner, ScanError, ScanEvent, ScanOptions, ScanResult};
pub use core::kit::generator::{drain, filter, into_peekable, tap, transform, try_drain, Generator};
pub use core::{
    config::config, config::init as init_config, logger::init_logger, logger::LogFormat, Config,
    LimitConfig, LogConfig, Phase, ScannerConfig,
};

/// 初始化（使用前先调用）
///
/// 只初始化配置，不初始化日志系统；重复调用时保留第一次的配置。
///
/// # Example
/// ```
/// use llamac::{init, Config};
///
/// init(Config::default());
/// assert!(llamac::core::config::is_initialized());
/// ```
pub fn init(config: Config) {
    if core::config::init(config).is_err() {
        tracing::debug!(target: "llamac::cli", "config already initialized, keeping the first one");
    }
}

/// 初始化配置和日志系统
///
/// # Example
/// ```ignore
/// use llamac::{init_with_logger, Config, LogFormat};
///
/// init_with_logger(Config::default(), LogFormat::Pretty)?;
/// ```
pub fn init_with_logger(
    config: Config,
    format: LogFormat,
) -> Result<(), core::logger::LoggerError> {
    init(config);
    core::logger::init_with_format(format)
}
