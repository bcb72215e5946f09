//! 通用工具包（与语言无关）
//!
//! - `handoff`: 单槽阻塞交接通道
//! - `generator`: 基于交接通道的惰性生成器及组合子
//! - `vfs`: 源文件系统抽象

pub mod generator;
pub mod handoff;
pub mod vfs;
