//! 编译器前端
//!
//! 目前只有输入阶段：把源文件（含 include）展开为扫描事件流。

pub mod scanner;

pub use scanner::{FileScanner, ScanError, ScanEvent, ScanOptions, ScanResult};
