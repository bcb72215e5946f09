//! API 输入输出类型

use std::io::Write;

use serde::Serialize;

/// 预处理结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreprocessOutput {
    /// 展开后的源码（每行以 `\n` 结尾）
    pub source: String,
    /// 事件总数
    pub events: usize,
    /// 源码行数
    pub lines: usize,
    /// 进入过的文件（去重，按首次进入的顺序）
    pub files: Vec<String>,
    /// 最大文件栈深度（根文件为 1）
    pub max_depth: usize,
}

impl PreprocessOutput {
    /// 不同文件的个数
    pub fn distinct_files(&self) -> usize {
        self.files.len()
    }
}

/// 流水线上的旁路输出
///
/// - `source`: 预处理后的源码文本
/// - `events`: 每个事件一行 JSON
#[derive(Default)]
pub struct PrintTaps {
    pub source: Option<Box<dyn Write + Send>>,
    pub events: Option<Box<dyn Write + Send>>,
}

impl PrintTaps {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, writer: impl Write + Send + 'static) -> Self {
        self.source = Some(Box::new(writer));
        self
    }

    pub fn with_events(mut self, writer: impl Write + Send + 'static) -> Self {
        self.events = Some(Box::new(writer));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.events.is_none()
    }
}

impl std::fmt::Debug for PrintTaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintTaps")
            .field("source", &self.source.is_some())
            .field("events", &self.events.is_some())
            .finish()
    }
}
