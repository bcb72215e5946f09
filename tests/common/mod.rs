//! 测试辅助工具
//!
//! 提供临时源文件树和可共享的输出缓冲区

#![allow(dead_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use llamac::ScanEvent;

static NEXT_TREE: AtomicUsize = AtomicUsize::new(0);

/// 临时目录中的一组源文件，销毁时删除
pub struct TempTree {
    root: PathBuf,
}

impl TempTree {
    pub fn new(name: &str) -> Self {
        let id = NEXT_TREE.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "llamac_test_{}_{}_{}",
            name,
            std::process::id(),
            id
        ));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// 写入一个文件，返回其绝对路径
    pub fn file(&self, name: &str, content: &str) -> String {
        let path = self.root.join(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    /// 文件的绝对路径（不要求存在）
    pub fn path(&self, name: &str) -> String {
        self.root.join(name).to_string_lossy().into_owned()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// `#include` 行
pub fn include(path: &str) -> String {
    format!("#include \"{}\"", path)
}

/// 多线程共享的写入缓冲区
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 事件的简写形式，便于断言
pub fn describe(event: &ScanEvent) -> String {
    match event {
        ScanEvent::Line { text, lineno } => format!("{}:{}", lineno, text),
        ScanEvent::FileChange { path } => format!("> {}", short_name(path)),
    }
}

/// 路径的文件名部分
pub fn short_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}
