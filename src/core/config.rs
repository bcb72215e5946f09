//! 全局配置系统
//!
//! 提供线程安全的全局配置单例，包括日志级别、include 限制和扫描选项。
//! 核心组件不读取全局配置，而是显式接收 `ScanOptions`；
//! 只有 API 层通过 [`config()`] 读取（未初始化时使用默认值）。
//!
//! # 使用示例
//! ```
//! use llamac::core::config::{self, Config, LogConfig};
//! use tracing::Level;
//!
//! let cfg = Config {
//!     log: LogConfig {
//!         global: Level::DEBUG,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! assert!(config::init(cfg).is_ok());
//! assert_eq!(config::config().log.global, Level::DEBUG);
//! ```

use once_cell::sync::{Lazy, OnceCell};
use tracing::Level;

use crate::core::compiler::scanner::{ScanOptions, DEFAULT_MAX_INCLUDE_DEPTH};

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();
static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// 初始化全局配置（只能成功一次）
///
/// 已经初始化过时原样返回被拒绝的配置。
pub fn init(config: Config) -> Result<(), Config> {
    GLOBAL_CONFIG.set(config)
}

/// 获取全局配置引用；未初始化时返回默认配置
pub fn config() -> &'static Config {
    try_config().unwrap_or(&DEFAULT_CONFIG)
}

/// 获取已初始化的全局配置
pub fn try_config() -> Option<&'static Config> {
    GLOBAL_CONFIG.get()
}

/// 检查配置是否已初始化
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

/// 全局配置结构
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// 日志配置
    pub log: LogConfig,
    /// 限制配置
    pub limits: LimitConfig,
    /// 扫描器配置
    pub scanner: ScannerConfig,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 全局默认日志级别
    pub global: Level,
    /// 生成器日志级别（None 表示使用 global）
    pub generator: Option<Level>,
    /// 扫描器日志级别
    pub scanner: Option<Level>,
}

/// 限制配置
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// 根文件之上最多的 include 嵌套层数
    pub max_include_depth: usize,
}

/// 扫描器配置
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// 是否检测循环 include
    pub detect_cycles: bool,
}

/// 日志阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Generator,
    Scanner,
    Cli,
}

impl Config {
    /// 由配置得到扫描选项
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_include_depth: self.limits.max_include_depth,
            detect_cycles: self.scanner.detect_cycles,
        }
    }
}

impl LogConfig {
    /// 获取指定阶段的实际日志级别
    ///
    /// 如果该阶段有特定配置则返回特定级别，否则返回全局级别
    pub fn level_for(&self, phase: Phase) -> Level {
        let specific = match phase {
            Phase::Generator => self.generator,
            Phase::Scanner => self.scanner,
            Phase::Cli => None,
        };
        specific.unwrap_or(self.global)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            generator: None,
            scanner: None,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
        }
    }
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Generator, Phase::Scanner, Phase::Cli];

    /// 获取阶段的字符串名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Generator => "generator",
            Phase::Scanner => "scanner",
            Phase::Cli => "cli",
        }
    }

    /// 获取阶段的日志目标名称
    pub fn target(&self) -> String {
        format!("llamac::{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.log.global, Level::WARN);
        assert_eq!(cfg.limits.max_include_depth, 200);
        assert!(cfg.scanner.detect_cycles);
        assert_eq!(cfg.scan_options(), ScanOptions::default());
    }

    #[test]
    fn test_log_level_for() {
        let cfg = LogConfig {
            global: Level::WARN,
            generator: None,
            scanner: Some(Level::TRACE),
        };

        assert_eq!(cfg.level_for(Phase::Scanner), Level::TRACE);
        assert_eq!(cfg.level_for(Phase::Generator), Level::WARN);
        assert_eq!(cfg.level_for(Phase::Cli), Level::WARN);
    }

    #[test]
    fn test_phase_target() {
        assert_eq!(Phase::Generator.as_str(), "generator");
        assert_eq!(Phase::Scanner.target(), "llamac::scanner");
        assert_eq!(Phase::ALL.len(), 3);
    }

    #[test]
    fn test_scan_options_from_config() {
        let cfg = Config {
            limits: LimitConfig {
                max_include_depth: 3,
            },
            scanner: ScannerConfig {
                detect_cycles: false,
            },
            ..Default::default()
        };
        let options = cfg.scan_options();
        assert_eq!(options.max_include_depth, 3);
        assert!(!options.detect_cycles);
    }
}
