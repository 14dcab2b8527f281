//! 翻译字典模块
//!
//! 字典是原文到译文的映射，提取时生成 `{原文: 原文}` 占位文件，
//! 人工翻译后再作为回填的输入。条目保持首次出现的顺序，方便审阅和比对。

// 标准库导入
use std::path::Path;

// 第三方crate导入
use indexmap::IndexMap;
use tracing::debug;

// 本地模块导入
use crate::chinesize_error;
use crate::error::{ChinesizeError, Result};

/// 原文到译文的有序映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: IndexMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按去除空白后的原文精确查找
    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    /// 插入条目；已存在的原文保留原位置，只更新译文
    pub fn insert(&mut self, original: String, translation: String) {
        self.entries.insert(original, translation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 序列化为两空格缩进的JSON对象
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ChinesizeError::Internal { source: e.into() })
    }

    /// 从JSON对象解析字典；`path` 仅用于错误信息
    ///
    /// 值为 `null` 的条目视为尚未翻译，直接丢弃。
    pub fn from_json(text: &str, path: &Path) -> Result<Self> {
        let raw: IndexMap<String, Option<String>> =
            serde_json::from_str(text).map_err(|e| chinesize_error!(dictionary, path, e))?;
        let entries = raw
            .into_iter()
            .filter_map(|(original, translation)| Some((original, translation?)))
            .collect();
        Ok(Self { entries })
    }

    /// 读取字典文件
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ChinesizeError::file_op(path, "读取", e))?;
        let dictionary = Self::from_json(&text, path)?;
        debug!("读取字典 {}: {} 条", path.display(), dictionary.len());
        Ok(dictionary)
    }

    /// 写入字典文件，必要时创建父目录
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ChinesizeError::file_op(parent, "创建目录", e))?;
        }
        let json = self.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| ChinesizeError::file_op(path, "写入", e))?;
        debug!("写入字典 {}: {} 条", path.display(), self.len());
        Ok(())
    }
}

impl FromIterator<(String, String)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// 汇总多个文件的提取结果
///
/// 每个唯一原文映射到自身，作为待翻译的占位；重复原文只保留第一次出现的位置。
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    entries: IndexMap<String, String>,
    total: usize,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, text: &str) {
        self.total += 1;
        if !self.entries.contains_key(text) {
            self.entries.insert(text.to_string(), text.to_string());
        }
    }

    /// 合并一个文件的提取结果
    pub fn merge<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            self.add(text.as_ref());
        }
    }

    /// 已合并的文本总数（含重复）
    pub fn total(&self) -> usize {
        self.total
    }

    /// 唯一文本数
    pub fn unique(&self) -> usize {
        self.entries.len()
    }

    pub fn build(self) -> Dictionary {
        Dictionary {
            entries: self.entries,
        }
    }
}
