//! 扫描错误

use std::io;

use thiserror::Error;

use super::directive::DirectiveError;
use crate::core::kit::generator::GeneratorError;

pub type ScanResult<T> = Result<T, ScanError>;

/// 扫描阶段的所有错误
///
/// 扫描开始后出现的错误都作为事件流的最后一个元素交给消费者。
#[derive(Debug, Error)]
pub enum ScanError {
    /// 根文件或被 include 的文件无法打开
    #[error("cannot open '{path}'{}: {source}", fmt_site(.site))]
    Open {
        path: String,
        /// 发起 include 的位置；根文件为 `None`
        site: Option<IncludeSite>,
        #[source]
        source: io::Error,
    },

    /// 读取过程中的 IO 故障
    #[error("read failure in '{path}' after line {line}: {source}")]
    Read {
        path: String,
        line: usize,
        #[source]
        source: io::Error,
    },

    /// 预处理指令格式错误
    #[error("{path}:{line}: {kind}")]
    Syntax {
        path: String,
        line: usize,
        text: String,
        kind: DirectiveError,
    },

    /// 文件直接或间接地包含了自身
    #[error("{in_file}:{line}: include cycle, '{path}' is already being scanned")]
    IncludeCycle {
        path: String,
        in_file: String,
        line: usize,
    },

    /// include 嵌套超过上限
    #[error("{in_file}:{line}: including '{path}' exceeds the include depth limit of {limit}")]
    IncludeDepthExceeded {
        path: String,
        in_file: String,
        line: usize,
        limit: usize,
    },

    /// 后台任务无法启动
    #[error(transparent)]
    Spawn(#[from] GeneratorError),
}

/// include 指令所在位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeSite {
    pub file: String,
    pub line: usize,
}

fn fmt_site(site: &Option<IncludeSite>) -> String {
    match site {
        Some(site) => format!(" (included from {}:{})", site.file, site.line),
        None => String::new(),
    }
}

impl ScanError {
    /// 出错的文件（对 include 相关错误是发起 include 的文件）
    pub fn file(&self) -> Option<&str> {
        match self {
            ScanError::Open { site: Some(site), .. } => Some(&site.file),
            ScanError::Open { path, .. }
            | ScanError::Read { path, .. }
            | ScanError::Syntax { path, .. } => Some(path),
            ScanError::IncludeCycle { in_file, .. }
            | ScanError::IncludeDepthExceeded { in_file, .. } => Some(in_file),
            ScanError::Spawn(_) => None,
        }
    }

    /// 出错的行号（1-based，如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            ScanError::Syntax { line, .. }
            | ScanError::IncludeCycle { line, .. }
            | ScanError::IncludeDepthExceeded { line, .. } => Some(*line),
            ScanError::Read { line, .. } => Some(*line + 1),
            ScanError::Open { site, .. } => site.as_ref().map(|s| s.line),
            ScanError::Spawn(_) => None,
        }
    }

    /// 出错行的原文（仅指令错误有）
    pub fn source_text(&self) -> Option<&str> {
        match self {
            ScanError::Syntax { text, .. } => Some(text),
            _ => None,
        }
    }

    /// 错误类别名称（可用于程序化处理）
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScanError::Open { .. } => "OpenError",
            ScanError::Read { .. } => "ReadError",
            ScanError::Syntax { .. } => "SyntaxError",
            ScanError::IncludeCycle { .. } => "IncludeCycle",
            ScanError::IncludeDepthExceeded { .. } => "IncludeDepthExceeded",
            ScanError::Spawn(_) => "SpawnError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display() {
        let err = ScanError::Syntax {
            path: "main.lla".to_string(),
            line: 4,
            text: "#foo".to_string(),
            kind: DirectiveError::InvalidDirective("#foo".to_string()),
        };
        assert_eq!(err.to_string(), "main.lla:4: invalid preprocessor directive: #foo");
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.file(), Some("main.lla"));
        assert_eq!(err.source_text(), Some("#foo"));
        assert_eq!(err.kind_name(), "SyntaxError");
    }

    #[test]
    fn test_open_root_display() {
        let err = ScanError::Open {
            path: "missing.lla".to_string(),
            site: None,
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot open 'missing.lla': not found");
        assert_eq!(err.line(), None);
        assert_eq!(err.file(), Some("missing.lla"));
    }

    #[test]
    fn test_open_include_display() {
        let err = ScanError::Open {
            path: "missing.lla".to_string(),
            site: Some(IncludeSite {
                file: "main.lla".to_string(),
                line: 3,
            }),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "cannot open 'missing.lla' (included from main.lla:3): not found"
        );
        assert_eq!(err.file(), Some("main.lla"));
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_cycle_points_at_including_file() {
        let err = ScanError::IncludeCycle {
            path: "a.lla".to_string(),
            in_file: "b.lla".to_string(),
            line: 2,
        };
        assert_eq!(err.file(), Some("b.lla"));
        assert_eq!(err.line(), Some(2));
    }
}
