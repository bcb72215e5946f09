//! Core - 前端核心逻辑
//!
//! 包含生成器框架、扫描器以及全局配置和日志。
//! 文件访问只经过 `kit::vfs::SourceFileSystem`，不直接做终端输出。

pub mod compiler;
pub mod config;
pub mod kit;
pub mod logger;

// 重导出常用类型
pub use config::{Config, LimitConfig, LogConfig, Phase, ScannerConfig};
