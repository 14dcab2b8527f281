use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use chinesize::config::{Cli, Command, ExtractOptions, ReplaceOptions};
use chinesize::stats::{format_duration, print_run_report};
use chinesize::utils::init_logging;
use chinesize::workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let (title, result) = match cli.command {
        Command::Extract {
            dir,
            file_type,
            output,
            ignore,
        } => {
            let options = ExtractOptions {
                project_dir: dir,
                file_type,
                output,
                ignore: ignore.into(),
            };
            info!("🚀 开始提取待翻译文本");
            info!("📂 项目目录: {}", options.project_dir.display());
            ("提取", workflow::extract(&options).await)
        }
        Command::Replace {
            dir,
            file_type,
            input,
            prettier_config,
            ignore,
        } => {
            let options = ReplaceOptions {
                project_dir: dir,
                file_type,
                input,
                prettier_config,
                ignore: ignore.into(),
            };
            info!("🚀 开始回填译文");
            info!("📂 项目目录: {}", options.project_dir.display());
            ("回填", workflow::replace(&options).await)
        }
    };

    match result {
        Ok(report) => {
            if report.has_failures() {
                warn!(
                    "⚠️  {}完成，{} 个文件处理失败，耗时: {}",
                    title,
                    report.files_failed,
                    format_duration(report.elapsed)
                );
            } else {
                info!("✅ {}完成！耗时: {}", title, format_duration(report.elapsed));
            }

            // 显示运行统计
            if cli.stats || cli.verbose {
                print_run_report(title, &report);
            }
        }
        Err(e) => {
            if e.is_precondition() {
                error!("❌ {}未开始，已中止: {}", title, e);
            } else {
                error!("❌ {}失败: {}", title, e);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
