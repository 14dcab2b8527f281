//! 配置管理模块
//!
//! 提供CLI参数解析，以及提取、回填两个操作的配置结构

// 标准库导入
use std::path::{Path, PathBuf};

// 第三方crate导入
use clap::{Args, Parser, Subcommand, ValueEnum};

// 本地模块导入
use crate::constants::dictionary_config::{FILE_EXTENSION, FILE_STEM, OUTPUT_DIR_NAME};

/// 要处理的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    /// 只处理 .html 文件
    Html,
    /// 只处理 .js / .ts 文件中的内嵌模板
    #[value(alias = "ts")]
    Js,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Html => "html",
            FileType::Js => "js",
        }
    }
}

/// 字典文件的默认位置：`<dir>/chinesize/texts-to-translate[-<type>].json`
pub fn default_dictionary_path(project_dir: &Path, file_type: Option<FileType>) -> PathBuf {
    let file_name = match file_type {
        Some(file_type) => format!("{}-{}.{}", FILE_STEM, file_type.as_str(), FILE_EXTENSION),
        None => format!("{}.{}", FILE_STEM, FILE_EXTENSION),
    };
    project_dir.join(OUTPUT_DIR_NAME).join(file_name)
}

/// 忽略规则来源，两个子命令共用
#[derive(Debug, Clone, Default)]
pub struct IgnoreOptions {
    /// glob形式的忽略模式
    pub patterns: Vec<String>,
    /// .gitignore 风格的忽略配置文件
    pub config_files: Vec<PathBuf>,
}

/// 提取操作配置
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use chinesize::config::{ExtractOptions, FileType};
///
/// let options = ExtractOptions::new("./my-app")
///     .file_type(Some(FileType::Html))
///     .ignore_pattern("node_modules");
/// assert!(options.dictionary_path().ends_with("chinesize/texts-to-translate-html.json"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub project_dir: PathBuf,
    pub file_type: Option<FileType>,
    /// 字典输出路径，None时使用默认位置
    pub output: Option<PathBuf>,
    pub ignore: IgnoreOptions,
}

impl ExtractOptions {
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Self::default()
        }
    }

    pub fn file_type(mut self, file_type: Option<FileType>) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn ignore_pattern(mut self, pattern: &str) -> Self {
        self.ignore.patterns.push(pattern.to_string());
        self
    }

    pub fn ignore_config<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ignore.config_files.push(path.into());
        self
    }

    /// 实际使用的字典输出路径
    pub fn dictionary_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_dictionary_path(&self.project_dir, self.file_type))
    }
}

/// 回填操作配置
#[derive(Debug, Clone, Default)]
pub struct ReplaceOptions {
    pub project_dir: PathBuf,
    pub file_type: Option<FileType>,
    /// 译文字典路径，None时使用默认位置
    pub input: Option<PathBuf>,
    /// prettier配置文件，提供时对回填结果进行格式化
    pub prettier_config: Option<PathBuf>,
    pub ignore: IgnoreOptions,
}

impl ReplaceOptions {
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.into(),
            ..Self::default()
        }
    }

    pub fn file_type(mut self, file_type: Option<FileType>) -> Self {
        self.file_type = file_type;
        self
    }

    pub fn input<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.input = Some(path.into());
        self
    }

    pub fn prettier_config<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.prettier_config = Some(path.into());
        self
    }

    pub fn ignore_pattern(mut self, pattern: &str) -> Self {
        self.ignore.patterns.push(pattern.to_string());
        self
    }

    pub fn ignore_config<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ignore.config_files.push(path.into());
        self
    }

    /// 实际使用的字典输入路径
    pub fn dictionary_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| default_dictionary_path(&self.project_dir, self.file_type))
    }
}

/// CLI参数结构
#[derive(Parser)]
#[command(author, version, about = "前端项目汉化工具 - 提取模板中的待翻译文本并回填译文", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// 显示运行统计
    #[arg(long, global = true)]
    pub stats: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// 提取项目中的待翻译文本，生成字典文件
    Extract {
        /// 项目目录
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// 只处理指定类型的文件
        #[arg(short = 't', long = "type", value_enum)]
        file_type: Option<FileType>,

        /// 字典输出路径 (默认为 <DIR>/chinesize/texts-to-translate[-<TYPE>].json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        ignore: IgnoreArgs,
    },

    /// 根据译文字典回填项目文件
    Replace {
        /// 项目目录
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// 只处理指定类型的文件
        #[arg(short = 't', long = "type", value_enum)]
        file_type: Option<FileType>,

        /// 译文字典路径 (默认为 <DIR>/chinesize/texts-to-translate[-<TYPE>].json)
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// prettier配置文件，提供时格式化回填后的文件
        #[arg(short, long = "prettier-config", value_name = "FILE")]
        prettier_config: Option<PathBuf>,

        #[command(flatten)]
        ignore: IgnoreArgs,
    },
}

/// 忽略规则参数
#[derive(Args, Debug, Default)]
pub struct IgnoreArgs {
    /// 忽略匹配的路径 (glob，可重复)
    #[arg(long = "ignore-pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// 从 .gitignore 风格的文件读取忽略规则 (可重复)
    #[arg(long = "ignore-config", value_name = "FILE")]
    pub config_files: Vec<PathBuf>,
}

impl From<IgnoreArgs> for IgnoreOptions {
    fn from(args: IgnoreArgs) -> Self {
        Self {
            patterns: args.patterns,
            config_files: args.config_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dictionary_path() {
        let dir = Path::new("/work/app");
        assert_eq!(
            default_dictionary_path(dir, None),
            PathBuf::from("/work/app/chinesize/texts-to-translate.json")
        );
        assert_eq!(
            default_dictionary_path(dir, Some(FileType::Js)),
            PathBuf::from("/work/app/chinesize/texts-to-translate-js.json")
        );
    }

    #[test]
    fn test_options_builders() {
        let extract = ExtractOptions::new("/work/app")
            .file_type(Some(FileType::Html))
            .ignore_pattern("dist")
            .ignore_config("/work/app/.gitignore");
        assert_eq!(
            extract.dictionary_path(),
            PathBuf::from("/work/app/chinesize/texts-to-translate-html.json")
        );
        assert_eq!(extract.ignore.patterns, vec!["dist".to_string()]);
        assert_eq!(extract.ignore.config_files.len(), 1);

        let replace = ReplaceOptions::new("/work/app")
            .input("/tmp/zh.json")
            .prettier_config("/work/app/.prettierrc");
        assert_eq!(replace.dictionary_path(), PathBuf::from("/tmp/zh.json"));
        assert!(replace.prettier_config.is_some());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "chinesize",
            "--stats",
            "extract",
            "./app",
            "-t",
            "ts",
            "--ignore-pattern",
            "node_modules",
            "--ignore-pattern",
            "*.spec.ts",
        ]);
        assert!(cli.stats);
        match cli.command {
            Command::Extract {
                dir,
                file_type,
                output,
                ignore,
            } => {
                assert_eq!(dir, PathBuf::from("./app"));
                assert_eq!(file_type, Some(FileType::Js));
                assert_eq!(output, None);
                assert_eq!(ignore.patterns.len(), 2);
            }
            _ => panic!("Wrong subcommand"),
        }

        let cli = Cli::parse_from(["chinesize", "replace", "./app", "-p", ".prettierrc", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Replace {
                prettier_config, ..
            } => assert_eq!(prettier_config, Some(PathBuf::from(".prettierrc"))),
            _ => panic!("Wrong subcommand"),
        }
    }
}
