//! 扫描事件

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// 事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Line,
    FileChange,
}

/// 扫描器产出的不可变事件
///
/// - `Line`: 当前文件中的一行源码（已去掉行尾换行符），行号从 1 开始
/// - `FileChange`: 进入（或返回）某个文件，路径与 include 中书写的一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanEvent {
    Line { text: String, lineno: usize },
    FileChange { path: Arc<str> },
}

impl ScanEvent {
    pub fn line(text: impl Into<String>, lineno: usize) -> Self {
        ScanEvent::Line {
            text: text.into(),
            lineno,
        }
    }

    pub fn file_change(path: impl Into<Arc<str>>) -> Self {
        ScanEvent::FileChange { path: path.into() }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ScanEvent::Line { .. } => EventKind::Line,
            ScanEvent::FileChange { .. } => EventKind::FileChange,
        }
    }

    /// 行内容，或进入的文件路径
    pub fn text(&self) -> &str {
        match self {
            ScanEvent::Line { text, .. } => text,
            ScanEvent::FileChange { path } => path,
        }
    }

    /// 当前文件内的行号；`FileChange` 恒为 0
    pub fn line_number(&self) -> usize {
        match self {
            ScanEvent::Line { lineno, .. } => *lineno,
            ScanEvent::FileChange { .. } => 0,
        }
    }

    /// 预处理后的源码文本（`FileChange` 没有）
    pub fn source_line(&self) -> Option<&str> {
        match self {
            ScanEvent::Line { text, .. } => Some(text),
            ScanEvent::FileChange { .. } => None,
        }
    }

    pub fn is_file_change(&self) -> bool {
        self.kind() == EventKind::FileChange
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::Line { text, lineno } => write!(f, "{:>4} | {}", lineno, text),
            ScanEvent::FileChange { path } => write!(f, "# file {}", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let line = ScanEvent::line("let x = 1", 3);
        assert_eq!(line.kind(), EventKind::Line);
        assert_eq!(line.text(), "let x = 1");
        assert_eq!(line.line_number(), 3);
        assert_eq!(line.source_line(), Some("let x = 1"));

        let change = ScanEvent::file_change("lib.lla");
        assert!(change.is_file_change());
        assert_eq!(change.text(), "lib.lla");
        assert_eq!(change.line_number(), 0);
        assert_eq!(change.source_line(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ScanEvent::line("x", 12).to_string(), "  12 | x");
        assert_eq!(ScanEvent::file_change("a.lla").to_string(), "# file a.lla");
    }

    #[test]
    fn test_serialize_json() {
        let line = serde_json::to_string(&ScanEvent::line("x", 1)).unwrap();
        assert_eq!(line, r#"{"kind":"line","text":"x","lineno":1}"#);

        let change = serde_json::to_string(&ScanEvent::file_change("a.lla")).unwrap();
        assert_eq!(change, r#"{"kind":"file_change","path":"a.lla"}"#);
    }
}
