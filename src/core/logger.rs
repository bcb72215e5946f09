//! 日志系统初始化
//!
//! 基于 `tracing` 和 `tracing-subscriber` 实现分阶段日志控制。
//! 日志写到 stderr，stdout 留给 `--print-source` 等输出。
//!
//! # 使用示例
//! ```ignore
//! use llamac::core::config::{self, Config};
//! use llamac::core::logger::init_logger;
//!
//! config::init(Config::default()).ok();
//! init_logger()?;
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
    Layer, Registry,
};

use crate::core::config::{self, LogConfig, Phase};

/// 日志输出格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    #[default]
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 日志初始化错误
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot open log file '{}': {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("global logger already installed: {0}")]
    Install(#[from] TryInitError),
}

/// 初始化日志系统
///
/// 读取全局配置中的日志级别；未初始化配置时使用默认值。
pub fn init_logger() -> Result<(), LoggerError> {
    init_with_format(LogFormat::default())
}

/// 使用指定格式初始化日志系统
pub fn init_with_format(format: LogFormat) -> Result<(), LoggerError> {
    init_with_file(format, None::<&Path>)
}

/// 使用文件输出初始化日志系统
///
/// # Arguments
/// * `format` - 日志格式
/// * `file` - 日志文件路径，None 表示只输出到控制台
pub fn init_with_file<P: AsRef<Path>>(format: LogFormat, file: Option<P>) -> Result<(), LoggerError> {
    let targets = build_targets(&config::config().log);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(
        create_format_layer(format, io::stderr)
            .with_filter(targets.clone())
            .boxed(),
    );

    // 同时输出到控制台和文件
    if let Some(path) = file {
        let path = path.as_ref();
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggerError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
        layers.push(
            create_format_layer(format, Arc::new(log_file))
                .with_filter(targets)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// 构建各阶段的目标过滤器
fn build_targets(cfg: &LogConfig) -> Targets {
    Phase::ALL.iter().fold(
        Targets::new().with_default(cfg.global),
        |targets, phase| targets.with_target(phase.target(), cfg.level_for(*phase)),
    )
}

/// 根据格式创建 formatter layer
fn create_format_layer<S, M>(format: LogFormat, make_writer: M) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

/// 为当前测试初始化简单日志（仅打印到控制台）
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// 检查指定阶段的日志是否启用（DEBUG 级别）
#[inline]
pub fn is_enabled(phase: Phase) -> bool {
    match phase {
        Phase::Generator => tracing::enabled!(target: "llamac::generator", tracing::Level::DEBUG),
        Phase::Scanner => tracing::enabled!(target: "llamac::scanner", tracing::Level::DEBUG),
        Phase::Cli => tracing::enabled!(target: "llamac::cli", tracing::Level::DEBUG),
    }
}

/// 创建指定阶段的 span
#[macro_export]
macro_rules! phase_span {
    ($phase:expr, $name:expr) => {
        match $phase {
            $crate::core::config::Phase::Generator => tracing::span!(target: "llamac::generator", tracing::Level::DEBUG, $name),
            $crate::core::config::Phase::Scanner => tracing::span!(target: "llamac::scanner", tracing::Level::DEBUG, $name),
            $crate::core::config::Phase::Cli => tracing::span!(target: "llamac::cli", tracing::Level::DEBUG, $name),
        }
    };
    ($phase:expr, $name:expr, $($field:tt)*) => {
        match $phase {
            $crate::core::config::Phase::Generator => tracing::span!(target: "llamac::generator", tracing::Level::DEBUG, $name, $($field)*),
            $crate::core::config::Phase::Scanner => tracing::span!(target: "llamac::scanner", tracing::Level::DEBUG, $name, $($field)*),
            $crate::core::config::Phase::Cli => tracing::span!(target: "llamac::cli", tracing::Level::DEBUG, $name, $($field)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_targets_follow_phase_levels() {
        let cfg = LogConfig {
            global: Level::WARN,
            generator: None,
            scanner: Some(Level::TRACE),
        };
        let targets = build_targets(&cfg);

        assert!(targets.would_enable("llamac::scanner", &Level::TRACE));
        assert!(!targets.would_enable("llamac::generator", &Level::DEBUG));
        assert!(targets.would_enable("llamac::generator", &Level::WARN));
        assert!(!targets.would_enable("other_crate", &Level::INFO));
    }

    #[test]
    fn test_log_file_error() {
        let dir = std::env::temp_dir().join(format!("llamac_no_such_dir_{}", std::process::id()));
        let err = init_with_file(LogFormat::Compact, Some(dir.join("log.txt"))).unwrap_err();
        assert!(matches!(err, LoggerError::LogFile { .. }));
    }
}
