//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::compiler::scanner::ScanError;
use crate::core::kit::generator::GeneratorError;

/// 前端错误类型
#[derive(Error, Debug)]
pub enum FrontendError {
    /// 根文件不存在（使用错误，扫描尚未开始）
    #[error("file not found: {path}")]
    RootNotFound { path: String },

    /// 扫描错误
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// 流水线阶段无法启动
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// 输出目标无法打开
    #[error("cannot open output '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FrontendError {
    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            FrontendError::RootNotFound { .. } => "input",
            FrontendError::Scan(ScanError::Spawn(_)) | FrontendError::Generator(_) => "generator",
            FrontendError::Scan(_) => "scanner",
            FrontendError::Io { .. } => "io",
        }
    }

    /// 出错的文件（如果有）
    pub fn path(&self) -> Option<&str> {
        match self {
            FrontendError::RootNotFound { path } => Some(path),
            FrontendError::Scan(e) => e.file(),
            FrontendError::Io { path, .. } => path.to_str(),
            FrontendError::Generator(_) => None,
        }
    }

    /// 获取错误行号（1-based，如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            FrontendError::Scan(e) => e.line(),
            _ => None,
        }
    }

    /// 出错行的原文（如果有）
    pub fn source_text(&self) -> Option<&str> {
        match self {
            FrontendError::Scan(e) => e.source_text(),
            _ => None,
        }
    }

    /// 错误类型（可用于程序化处理）
    pub fn error_kind(&self) -> &'static str {
        match self {
            FrontendError::RootNotFound { .. } => "RootNotFound",
            FrontendError::Scan(e) => e.kind_name(),
            FrontendError::Generator(_) => "SpawnError",
            FrontendError::Io { .. } => "IoError",
        }
    }

    /// 是否为使用错误（而不是源码本身的问题）
    pub fn is_usage_error(&self) -> bool {
        matches!(self, FrontendError::RootNotFound { .. })
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 可以直接打印，工具集成可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            phase: self.phase(),
            file: self.path().map(str::to_string),
            line: self.line(),
            error_kind: self.error_kind().to_string(),
            message: self.to_string(),
            source_text: self.source_text().map(str::to_string),
        }
    }
}

/// 结构化错误报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: input, scanner, generator, io
    pub phase: &'static str,
    /// 出错文件（如果有）
    pub file: Option<String>,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 错误类型
    pub error_kind: String,
    /// 人类可读的错误消息
    pub message: String,
    /// 出错行原文（如果有）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => {
                write!(f, "[{}:{}] {} error: {}", file, line, self.phase, self.message)
            }
            _ => write!(f, "[{}] error: {}", self.phase, self.message),
        }
    }
}

impl ErrorReport {
    /// 转换为 JSON 格式
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}
