//! 预处理指令识别
//!
//! 语法（按行，先去掉首尾空白）：
//! 1. 不以 `#` 开头 => 普通行
//! 2. 以 `#` 开头则必须是 `#include`，后接空白或行尾
//! 3. 其余部分去掉空白后必须是一对双引号包围的非空路径
//! 4. 引号内的路径原样使用

use thiserror::Error;

const INCLUDE: &str = "#include";

/// 指令错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("invalid preprocessor directive: {0}")]
    InvalidDirective(String),

    #[error("empty include path")]
    EmptyIncludePath,

    #[error("invalid include path: {0} (remember to wrap it in '\"')")]
    InvalidIncludePath(String),
}

/// 识别出的指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Include(String),
}

/// 判断一行是否为指令；普通行返回 `Ok(None)`
pub fn parse_directive(line: &str) -> Result<Option<Directive>, DirectiveError> {
    let trimmed = line.trim();
    if !trimmed.starts_with('#') {
        return Ok(None);
    }

    let rest = match trimmed.strip_prefix(INCLUDE) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => {
            let word = trimmed.split_whitespace().next().unwrap_or(trimmed);
            return Err(DirectiveError::InvalidDirective(word.to_string()));
        }
    };

    if rest.is_empty() {
        return Err(DirectiveError::EmptyIncludePath);
    }

    let path = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .filter(|p| !p.contains('"'))
        .ok_or_else(|| DirectiveError::InvalidIncludePath(rest.to_string()))?;

    if path.is_empty() {
        return Err(DirectiveError::EmptyIncludePath);
    }

    Ok(Some(Directive::Include(path.to_string())))
}
