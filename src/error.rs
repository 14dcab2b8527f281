//! 统一错误处理模块
//!
//! 定义chinesize在提取和回填过程中可能出现的错误类型。
//! 前置条件类错误会中止整个操作，文件级错误只影响单个文件。

// 标准库导入
use std::fmt;
use std::path::{Path, PathBuf};

// 第三方crate导入
use anyhow::Error as AnyhowError;

/// chinesize 统一错误类型
#[derive(Debug)]
pub enum ChinesizeError {
    /// 目标目录或输入文件不存在
    PathNotFound {
        /// 缺失的路径
        path: PathBuf,
    },

    /// 路径存在但不是目录
    NotADirectory { path: PathBuf },

    /// 路径存在但不是普通文件
    NotAFile { path: PathBuf },

    /// 翻译字典不是合法的JSON对象
    InvalidDictionary {
        /// 字典文件路径
        path: PathBuf,
        /// 解析失败原因
        reason: String,
    },

    /// 标记解析失败
    Parse {
        /// 出错行号（从1开始）
        line: usize,
        /// 出错列号（从1开始）
        column: usize,
        /// 具体错误信息
        details: String,
    },

    /// 标记渲染失败
    Render { details: String },

    /// prettier配置文件不存在
    FormatterConfigNotFound { path: PathBuf },

    /// 找不到prettier可执行文件
    FormatterUnavailable { details: String },

    /// prettier格式化失败
    Format {
        /// 被格式化的文件
        path: PathBuf,
        /// prettier输出的错误信息
        details: String,
    },

    /// 文件操作相关错误
    FileOperation {
        /// 文件路径
        path: PathBuf,
        /// 操作类型（读取、写入、创建等）
        operation: String,
        /// 底层错误信息
        source: String,
    },

    /// 内部处理错误（包装anyhow::Error）
    Internal { source: AnyhowError },
}

impl ChinesizeError {
    /// 构造带路径的文件操作错误
    pub fn file_op(path: &Path, operation: &str, source: impl fmt::Display) -> Self {
        ChinesizeError::FileOperation {
            path: path.to_path_buf(),
            operation: operation.to_string(),
            source: source.to_string(),
        }
    }

    /// 是否属于前置条件错误（需要在处理任何文件之前中止）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ChinesizeError::PathNotFound { .. }
                | ChinesizeError::NotADirectory { .. }
                | ChinesizeError::NotAFile { .. }
                | ChinesizeError::InvalidDictionary { .. }
                | ChinesizeError::FormatterConfigNotFound { .. }
                | ChinesizeError::FormatterUnavailable { .. }
        )
    }
}

impl fmt::Display for ChinesizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChinesizeError::PathNotFound { path } => {
                write!(f, "路径不存在: \"{}\"", path.display())
            }
            ChinesizeError::NotADirectory { path } => {
                write!(f, "\"{}\" 不是目录", path.display())
            }
            ChinesizeError::NotAFile { path } => {
                write!(f, "\"{}\" 不是文件", path.display())
            }
            ChinesizeError::InvalidDictionary { path, reason } => {
                write!(f, "\"{}\" 不是合法的JSON字典: {}", path.display(), reason)
            }
            ChinesizeError::Parse { line, column, details } => {
                write!(f, "标记解析失败 [{}:{}]: {}", line, column, details)
            }
            ChinesizeError::Render { details } => {
                write!(f, "标记渲染失败: {}", details)
            }
            ChinesizeError::FormatterConfigNotFound { path } => {
                write!(f, "prettier配置文件不存在: \"{}\"", path.display())
            }
            ChinesizeError::FormatterUnavailable { details } => {
                write!(f, "无法使用prettier: {}", details)
            }
            ChinesizeError::Format { path, details } => {
                write!(f, "格式化失败 [{}]: {}", path.display(), details)
            }
            ChinesizeError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path.display(), source)
            }
            ChinesizeError::Internal { source } => {
                write!(f, "内部处理错误: {}", source)
            }
        }
    }
}

impl std::error::Error for ChinesizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChinesizeError::Internal { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// chinesize 结果类型别名
pub type Result<T> = std::result::Result<T, ChinesizeError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! chinesize_error {
    (not_found, $path:expr) => {
        $crate::error::ChinesizeError::PathNotFound {
            path: ::std::path::PathBuf::from($path),
        }
    };
    (not_dir, $path:expr) => {
        $crate::error::ChinesizeError::NotADirectory {
            path: ::std::path::PathBuf::from($path),
        }
    };
    (not_file, $path:expr) => {
        $crate::error::ChinesizeError::NotAFile {
            path: ::std::path::PathBuf::from($path),
        }
    };
    (dictionary, $path:expr, $reason:expr) => {
        $crate::error::ChinesizeError::InvalidDictionary {
            path: ::std::path::PathBuf::from($path),
            reason: $reason.to_string(),
        }
    };
    (parse, $line:expr, $column:expr, $details:expr) => {
        $crate::error::ChinesizeError::Parse {
            line: $line,
            column: $column,
            details: $details.to_string(),
        }
    };
    (render, $details:expr) => {
        $crate::error::ChinesizeError::Render {
            details: $details.to_string(),
        }
    };
    (format, $path:expr, $details:expr) => {
        $crate::error::ChinesizeError::Format {
            path: ::std::path::PathBuf::from($path),
            details: $details.to_string(),
        }
    };
}

/// 从anyhow::Error转换为ChinesizeError
impl From<AnyhowError> for ChinesizeError {
    fn from(error: AnyhowError) -> Self {
        ChinesizeError::Internal { source: error }
    }
}

/// 从std::io::Error转换为ChinesizeError
impl From<std::io::Error> for ChinesizeError {
    fn from(error: std::io::Error) -> Self {
        ChinesizeError::FileOperation {
            path: PathBuf::from("unknown"),
            operation: "io".to_string(),
            source: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChinesizeError::Parse {
            line: 3,
            column: 7,
            details: "未闭合的标签".to_string(),
        };

        assert_eq!(format!("{}", err), "标记解析失败 [3:7]: 未闭合的标签");
    }

    #[test]
    fn test_error_macro() {
        let err = chinesize_error!(dictionary, "/tmp/texts.json", "expected value");
        match err {
            ChinesizeError::InvalidDictionary { path, reason } => {
                assert_eq!(path, PathBuf::from("/tmp/texts.json"));
                assert_eq!(reason, "expected value");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_precondition_classification() {
        assert!(chinesize_error!(not_found, "/missing").is_precondition());
        assert!(chinesize_error!(not_dir, "/etc/hosts").is_precondition());
        assert!(!chinesize_error!(parse, 1, 1, "bad").is_precondition());
        assert!(!chinesize_error!(render, "bad").is_precondition());
    }

    #[test]
    fn test_anyhow_conversion() {
        let anyhow_err = anyhow::anyhow!("Test anyhow error");
        let err: ChinesizeError = anyhow_err.into();

        match err {
            ChinesizeError::Internal { .. } => {}
            _ => panic!("Wrong error type"),
        }
    }
}
