//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和输出目标的打开。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::api::FrontendError;

/// 打印错误，有出错行原文时一并显示
pub fn print_error_with_source(e: &FrontendError) {
    let mut stderr = io::stderr().lock();
    let _ = write_error_with_source(&mut stderr, e);
}

/// 把错误及其出错行写入 `out`
pub fn write_error_with_source<W: Write>(out: &mut W, e: &FrontendError) -> io::Result<()> {
    writeln!(out, "error: {}", e)?;

    if let (Some(line), Some(text)) = (e.line(), e.source_text()) {
        write_source_line(out, line, text)?;
    }
    Ok(())
}

/// 写出一行源码，并在首个非空白字符下方标记
pub fn write_source_line<W: Write>(out: &mut W, line: usize, text: &str) -> io::Result<()> {
    let width = line.to_string().len();
    let indent = text.len() - text.trim_start().len();

    writeln!(out, "{:width$} |", "", width = width)?;
    writeln!(out, "{} | {}", line, text)?;
    writeln!(
        out,
        "{:width$} | {:indent$}^",
        "",
        "",
        width = width,
        indent = indent
    )?;
    Ok(())
}

/// 打开旁路输出目标：`None` 为 stdout，否则创建（截断）文件
pub fn open_print_target(path: Option<PathBuf>) -> Result<Box<dyn Write + Send>, FrontendError> {
    match path {
        None => Ok(Box::new(io::stdout())),
        Some(path) => {
            let file = File::create(&path).map_err(|source| FrontendError::Io { path, source })?;
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::scanner::{DirectiveError, ScanError};

    #[test]
    fn test_write_error_with_source() {
        let err = FrontendError::Scan(ScanError::Syntax {
            path: "main.lla".to_string(),
            line: 12,
            text: "    #foo".to_string(),
            kind: DirectiveError::InvalidDirective("#foo".to_string()),
        });
        let mut out = Vec::new();
        write_error_with_source(&mut out, &err).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error: main.lla:12: invalid preprocessor directive: #foo");
        assert_eq!(lines[1], "   |");
        assert_eq!(lines[2], "12 |     #foo");
        assert_eq!(lines[3], "   |     ^");
    }

    #[test]
    fn test_write_error_without_source() {
        let err = FrontendError::RootNotFound {
            path: "x.lla".to_string(),
        };
        let mut out = Vec::new();
        write_error_with_source(&mut out, &err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "error: file not found: x.lla\n");
    }

    #[test]
    fn test_open_print_target_file() {
        let path = std::env::temp_dir().join(format!("llamac_print_target_{}", std::process::id()));
        {
            let mut target = open_print_target(Some(path.clone())).unwrap();
            writeln!(target, "hello").unwrap();
            target.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_open_print_target_bad_path() {
        let path = std::env::temp_dir()
            .join(format!("llamac_missing_dir_{}", std::process::id()))
            .join("out.txt");
        let err = open_print_target(Some(path)).err().unwrap();
        assert_eq!(err.phase(), "io");
    }
}
