//! 提取与回填工作流
//!
//! 串联目录扫描、模板定位、文本提取/回填、格式化和文件读写。
//! 每个文件的处理都是独立的异步任务，返回自己的结果；
//! 所有任务完成后再统一汇总，字典只在最后写入一次。

// 标准库导入
use std::path::{Path, PathBuf};
use std::time::Instant;

// 第三方crate导入
use anyhow::anyhow;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

// 本地模块导入
use crate::config::{ExtractOptions, FileType, IgnoreOptions, ReplaceOptions};
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::error::{ChinesizeError, Result};
use crate::file_filter::FileFilter;
use crate::formatter::PrettierFormatter;
use crate::html_processor::{extract_texts, translate_markup, TemplateVariant};
use crate::scanner::{collect_source_files, ScanOutcome, SourceFile};
use crate::stats::RunReport;
use crate::template_locator::locate_template;
use crate::utils::{display_path, validate_input_file, validate_project_dir};

/// 单个文件提取后的状态
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExtractOutcome {
    /// 按遍历顺序提取出的文本
    Extracted(Vec<String>),
    /// 模板边界不明确，未提取
    Skipped,
}

/// 单个文件回填后的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplaceOutcome {
    /// 内容有变化并已写回
    Rewritten { replaced: usize },
    /// 没有需要写回的变化
    Unchanged,
    /// 模板边界不明确，未处理
    Skipped,
}

/// 提取项目中的待翻译文本并写入字典文件
pub async fn extract(options: &ExtractOptions) -> Result<RunReport> {
    let start = Instant::now();
    let root = options.project_dir.as_path();
    validate_project_dir(root)?;

    let filter = build_filter(root, &options.ignore)?;
    let scan = scan_project(root, options.file_type, filter).await?;
    info!("📂 找到 {} 个待处理文件", scan.files.len());

    let results = join_all(scan.files.iter().map(|file| extract_file(file))).await;

    let mut report = RunReport {
        files_scanned: scan.files.len(),
        files_failed: scan.failures,
        ..RunReport::default()
    };
    let mut builder = DictionaryBuilder::new();
    for (file, result) in scan.files.iter().zip(results) {
        match result {
            Ok(ExtractOutcome::Extracted(texts)) => {
                debug!("{}: {} 项文本", display_path(root, &file.path), texts.len());
                builder.merge(&texts);
                report.files_processed += 1;
            }
            Ok(ExtractOutcome::Skipped) => {
                report.files_skipped += 1;
            }
            Err(e) => {
                error!("❌ 提取失败 {}: {}", display_path(root, &file.path), e);
                report.files_failed += 1;
            }
        }
    }
    report.units_found = builder.total();
    report.unique_texts = builder.unique();

    let output = options.dictionary_path();
    if builder.unique() == 0 {
        warn!("⚠️  没有找到待翻译的文本，未生成字典文件");
    } else {
        builder.build().save(&output).await?;
        info!(
            "📄 已写入字典: {} ({} 项唯一文本)",
            output.display(),
            report.unique_texts
        );
    }

    report.elapsed = start.elapsed();
    Ok(report)
}

/// 用译文字典回填项目文件
pub async fn replace(options: &ReplaceOptions) -> Result<RunReport> {
    let start = Instant::now();
    let root = options.project_dir.as_path();
    validate_project_dir(root)?;

    let input = options.dictionary_path();
    validate_input_file(&input)?;
    let dictionary = Dictionary::load(&input).await?;
    info!("📖 读取字典: {} ({} 项)", input.display(), dictionary.len());

    let formatter = options
        .prettier_config
        .as_ref()
        .map(PrettierFormatter::new)
        .transpose()?;
    if let Some(formatter) = &formatter {
        info!("🎨 使用prettier配置: {}", formatter.config_path().display());
    }

    let filter = build_filter(root, &options.ignore)?;
    let scan = scan_project(root, options.file_type, filter).await?;
    info!("📂 找到 {} 个待处理文件", scan.files.len());

    let results = join_all(
        scan.files
            .iter()
            .map(|file| replace_file(file, &dictionary, formatter.as_ref())),
    )
    .await;

    let mut report = RunReport {
        files_scanned: scan.files.len(),
        files_failed: scan.failures,
        unique_texts: dictionary.len(),
        ..RunReport::default()
    };
    for (file, result) in scan.files.iter().zip(results) {
        let shown = display_path(root, &file.path);
        match result {
            Ok(ReplaceOutcome::Rewritten { replaced }) => {
                debug!("{}: 替换 {} 处", shown, replaced);
                report.files_processed += 1;
                report.files_rewritten += 1;
                report.units_found += replaced;
            }
            Ok(ReplaceOutcome::Unchanged) => {
                report.files_processed += 1;
            }
            Ok(ReplaceOutcome::Skipped) => {
                report.files_skipped += 1;
            }
            Err(e) => {
                error!("❌ 回填失败 {}: {}", shown, e);
                report.files_failed += 1;
            }
        }
    }

    report.elapsed = start.elapsed();
    Ok(report)
}

/// 根据忽略选项构建过滤器，配置文件缺失时中止
fn build_filter(root: &Path, ignore: &IgnoreOptions) -> Result<FileFilter> {
    let mut filter = FileFilter::new(root).with_patterns(&ignore.patterns)?;
    for config in &ignore.config_files {
        filter = filter.with_ignore_file(config)?;
    }
    Ok(filter)
}

/// 在阻塞线程池中遍历目录
async fn scan_project(
    root: &Path,
    file_type: Option<FileType>,
    filter: FileFilter,
) -> Result<ScanOutcome> {
    let root: PathBuf = root.to_path_buf();
    tokio::task::spawn_blocking(move || collect_source_files(&root, file_type, &filter))
        .await
        .map_err(|e| ChinesizeError::from(anyhow!("目录扫描任务异常: {}", e)))
}

async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ChinesizeError::file_op(path, "读取", e))
}

/// 提取单个文件中的文本
async fn extract_file(file: &SourceFile) -> Result<ExtractOutcome> {
    let source = read_source(&file.path).await?;

    let texts = match file.variant {
        TemplateVariant::Markup => extract_texts(&source, TemplateVariant::Markup)?,
        TemplateVariant::Embedded => {
            let Some(boundary) = locate_template(&source) else {
                debug!("未找到内嵌模板: {}", file.path.display());
                return Ok(ExtractOutcome::Extracted(Vec::new()));
            };
            if boundary.is_ambiguous() {
                warn!(
                    "⚠️  模板中含有反引号或 ${{ ，跳过提取: {}",
                    file.path.display()
                );
                return Ok(ExtractOutcome::Skipped);
            }
            extract_texts(boundary.body, TemplateVariant::Embedded)?
        }
    };
    Ok(ExtractOutcome::Extracted(texts))
}

/// 回填单个文件；内容没有变化时不写盘
async fn replace_file(
    file: &SourceFile,
    dictionary: &Dictionary,
    formatter: Option<&PrettierFormatter>,
) -> Result<ReplaceOutcome> {
    let source = read_source(&file.path).await?;

    let (translated, replaced) = match file.variant {
        TemplateVariant::Markup => translate_markup(&source, dictionary, TemplateVariant::Markup)?,
        TemplateVariant::Embedded => {
            let Some(boundary) = locate_template(&source) else {
                return Ok(ReplaceOutcome::Unchanged);
            };
            if boundary.is_ambiguous() {
                warn!(
                    "⚠️  模板中含有反引号或 ${{ ，跳过回填: {}",
                    file.path.display()
                );
                return Ok(ReplaceOutcome::Skipped);
            }
            let (body, replaced) =
                translate_markup(boundary.body, dictionary, TemplateVariant::Embedded)?;
            (boundary.reassemble(&body), replaced)
        }
    };

    if replaced == 0 {
        return Ok(ReplaceOutcome::Unchanged);
    }

    let output = match formatter {
        Some(formatter) => formatter.format(&translated, &file.path).await?,
        None => translated,
    };
    if output == source {
        return Ok(ReplaceOutcome::Unchanged);
    }

    tokio::fs::write(&file.path, &output)
        .await
        .map_err(|e| ChinesizeError::file_op(&file.path, "写入", e))?;
    Ok(ReplaceOutcome::Rewritten { replaced })
}
