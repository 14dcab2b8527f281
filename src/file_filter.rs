//! 文件过滤模块
//!
//! 把 `--ignore-pattern` 和 `--ignore-config` 提供的规则编译为glob模式，
//! 判断项目中的路径是否跳过。规则语法与 .gitignore 一致：
//! - `#` 开头为注释，空行忽略
//! - `!` 开头表示重新包含
//! - 以 `/` 结尾只匹配目录
//! - 以 `/` 开头或中间含 `/` 的规则相对项目根目录，否则匹配任意层级
//!
//! 后出现的规则优先。

// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use anyhow::anyhow;
use glob::{MatchOptions, Pattern};
use tracing::debug;

// 本地模块导入
use crate::chinesize_error;
use crate::error::{ChinesizeError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnoreRule {
    pattern: Pattern,
    negated: bool,
    dir_only: bool,
}

impl IgnoreRule {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (dir_only, body) = match body.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (anchored, body) = match body.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (body.contains('/'), body),
        };
        if body.is_empty() {
            return Ok(None);
        }

        let glob = if anchored {
            body.to_string()
        } else {
            format!("**/{}", body)
        };
        let pattern = Pattern::new(&glob)
            .map_err(|e| ChinesizeError::from(anyhow!("无效的忽略规则 \"{}\": {}", line, e)))?;

        Ok(Some(Self {
            pattern,
            negated,
            dir_only,
        }))
    }
}

/// 路径过滤器
#[derive(Debug, Clone)]
pub struct FileFilter {
    root: PathBuf,
    rules: Vec<IgnoreRule>,
}

impl FileFilter {
    /// 创建不包含任何规则的过滤器
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            rules: Vec::new(),
        }
    }

    /// 追加命令行提供的忽略模式
    pub fn with_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self.add_rule(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// 追加 .gitignore 风格配置文件中的规则
    pub fn with_ignore_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(chinesize_error!(not_found, path));
        }
        if !path.is_file() {
            return Err(chinesize_error!(not_file, path));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ChinesizeError::file_op(path, "读取", e))?;
        for line in content.lines() {
            self.add_rule(line)?;
        }
        debug!("加载忽略配置 {}: 共 {} 条规则", path.display(), self.rules.len());
        Ok(self)
    }

    pub fn add_rule(&mut self, line: &str) -> Result<()> {
        if let Some(rule) = IgnoreRule::parse(line)? {
            self.rules.push(rule);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 判断路径是否被忽略；任一上级目录被忽略时路径本身也被忽略
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        for depth in 1..components.len() {
            if self.matches(&components[..depth].join("/"), true) {
                return true;
            }
        }
        !components.is_empty() && self.matches(&components.join("/"), is_dir)
    }

    fn matches(&self, relative: &str, is_dir: bool) -> bool {
        let mut ignored = false;
        for rule in &self.rules {
            if rule.dir_only && !is_dir {
                continue;
            }
            if rule.pattern.matches_with(relative, MATCH_OPTIONS) {
                ignored = !rule.negated;
            }
        }
        ignored
    }
}
