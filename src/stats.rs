use std::time::Duration;

/// 单次运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 扫描到的待处理文件数
    pub files_scanned: usize,
    /// 成功处理的文件数
    pub files_processed: usize,
    /// 处理失败的文件数（含无法访问的目录项）
    pub files_failed: usize,
    /// 跳过的文件数（模板不明确等）
    pub files_skipped: usize,
    /// 提取或替换的文本单元数
    pub units_found: usize,
    /// 字典中的唯一文本数
    pub unique_texts: usize,
    /// 实际写回磁盘的文件数
    pub files_rewritten: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
    }
}

/// 打印运行统计
pub fn print_run_report(title: &str, report: &RunReport) {
    println!("\n📊 {}统计报告:", title);
    println!("═══════════════════════════════════════");

    println!("📂 文件统计:");
    println!("   扫描文件: {} 个", report.files_scanned);
    println!("   处理成功: {} 个", report.files_processed);
    if report.files_skipped > 0 {
        println!("   跳过文件: {} 个", report.files_skipped);
    }
    if report.files_failed > 0 {
        println!("   处理失败: {} 个", report.files_failed);
    }
    if report.files_rewritten > 0 {
        println!("   写回文件: {} 个", report.files_rewritten);
    }

    println!("\n🔤 文本统计:");
    println!("   文本单元: {} 项", report.units_found);
    println!("   唯一文本: {} 项", report.unique_texts);

    println!("\n⏱️  总耗时: {}", format_duration(report.elapsed));
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
    }

    #[test]
    fn test_has_failures() {
        let mut report = RunReport::default();
        assert!(!report.has_failures());
        report.files_failed = 1;
        assert!(report.has_failures());
    }
}
