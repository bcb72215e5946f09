//! Platform - 平台适配层
//!
//! 所有终端相关的副作用都在这里实现：
//! - CLI 错误格式化输出
//! - 旁路输出目标（stdout 或文件）

pub mod cli;

// 重导出 CLI 功能
pub use cli::{open_print_target, print_error_with_source, write_error_with_source};
