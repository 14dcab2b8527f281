//! 目录扫描模块
//!
//! 递归遍历项目目录，按文件类型挑出需要处理的文件，
//! 并决定每个文件按纯标记还是内嵌模板处理。

// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use tracing::{debug, error};
use walkdir::WalkDir;

// 本地模块导入
use crate::config::FileType;
use crate::constants::dictionary_config::OUTPUT_DIR_NAME;
use crate::constants::file_config::{MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS};
use crate::file_filter::FileFilter;
use crate::html_processor::TemplateVariant;

/// 待处理的源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub variant: TemplateVariant,
}

/// 扫描结果
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// 按文件名排序的遍历顺序
    pub files: Vec<SourceFile>,
    /// 无法访问的目录项数量
    pub failures: usize,
}

/// 根据扩展名和类型选择决定文件的处理方式，不处理的文件返回None
pub fn variant_for(path: &Path, file_type: Option<FileType>) -> Option<TemplateVariant> {
    let extension = path.extension()?.to_str()?;

    if MARKUP_EXTENSIONS.contains(&extension) && file_type != Some(FileType::Js) {
        return Some(TemplateVariant::Markup);
    }
    if SCRIPT_EXTENSIONS.contains(&extension) && file_type != Some(FileType::Html) {
        return Some(TemplateVariant::Embedded);
    }
    None
}

/// 递归收集项目中需要处理的文件
///
/// 单个目录项出错只记录日志，不影响其余部分的遍历。
pub fn collect_source_files(
    root: &Path,
    file_type: Option<FileType>,
    filter: &FileFilter,
) -> ScanOutcome {
    let output_dir = root.join(OUTPUT_DIR_NAME);
    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_dir();
            if is_dir && entry.path() == output_dir {
                return false;
            }
            !filter.is_ignored(entry.path(), is_dir)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                error!("❌ 无法访问 {}: {}", location, e);
                outcome.failures += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(variant) = variant_for(entry.path(), file_type) {
            debug!("发现文件: {} ({:?})", entry.path().display(), variant);
            outcome.files.push(SourceFile {
                path: entry.into_path(),
                variant,
            });
        }
    }

    outcome
}
