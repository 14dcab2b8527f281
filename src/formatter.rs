//! 代码格式化模块
//!
//! 回填后的文件可以交给prettier按项目配置重新格式化。
//! prettier作为外部进程运行，文本通过stdin/stdout传递，不落盘。

// 标准库导入
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

// 第三方crate导入
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

// 本地模块导入
use crate::chinesize_error;
use crate::constants::file_config::{FORMAT_TIMEOUT_SECS, PRETTIER_BIN};
use crate::error::{ChinesizeError, Result};
use crate::stats::format_duration;

/// prettier格式化器
#[derive(Debug, Clone)]
pub struct PrettierFormatter {
    executable: PathBuf,
    config_path: PathBuf,
    timeout: Duration,
}

impl PrettierFormatter {
    /// 检查配置文件和prettier可执行文件，任一缺失都返回前置条件错误
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            return Err(ChinesizeError::FormatterConfigNotFound {
                path: config_path.to_path_buf(),
            });
        }

        let executable = which::which(PRETTIER_BIN).map_err(|e| {
            ChinesizeError::FormatterUnavailable {
                details: format!("在PATH中找不到 {}: {}", PRETTIER_BIN, e),
            }
        })?;
        debug!("使用prettier: {}", executable.display());

        Ok(Self::with_executable(executable, config_path))
    }

    /// 使用指定的可执行文件，不做PATH查找
    pub fn with_executable<P: Into<PathBuf>>(executable: P, config_path: &Path) -> Self {
        Self {
            executable: executable.into(),
            config_path: config_path.to_path_buf(),
            timeout: Duration::from_secs(FORMAT_TIMEOUT_SECS),
        }
    }

    /// 设置单个文件的超时时间（写入stdin和等待输出都计算在内）
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 格式化一个文件的完整文本；`file_path` 用于prettier推断语言
    pub async fn format(&self, text: &str, file_path: &Path) -> Result<String> {
        let mut child = Command::new(&self.executable)
            .arg("--config")
            .arg(&self.config_path)
            .arg("--stdin-filepath")
            .arg(file_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| chinesize_error!(format, file_path, format!("无法启动prettier: {}", e)))?;

        let stdin = child.stdin.take();
        let run = async move {
            if let Some(mut stdin) = stdin {
                // 进程提前退出时以退出状态和stderr为准
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    if e.kind() != ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
            }
            child.wait_with_output().await
        };

        // 超时后future被丢弃，kill_on_drop会结束子进程
        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                chinesize_error!(
                    format,
                    file_path,
                    format!("超过 {} 未完成", format_duration(self.timeout))
                )
            })?
            .map_err(|e| chinesize_error!(format, file_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(chinesize_error!(format, file_path, stderr.trim()));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| chinesize_error!(format, file_path, format!("输出不是UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config() {
        let result = PrettierFormatter::new("/definitely/missing/.prettierrc");
        assert!(matches!(
            result,
            Err(ChinesizeError::FormatterConfigNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_format_with_stand_in_executable() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".prettierrc");
        std::fs::write(&config, "{}").unwrap();

        // 忽略参数，原样回显stdin
        let script = dir.path().join("fake-prettier.sh");
        std::fs::write(&script, "#!/bin/sh\ncat\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let formatter = PrettierFormatter::with_executable(&script, &config);
        let output = formatter
            .format("<p>保存</p>\n", Path::new("src/app.html"))
            .await
            .unwrap();
        assert_eq!(output, "<p>保存</p>\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_format_times_out_when_input_is_not_read() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".prettierrc");
        std::fs::write(&config, "{}").unwrap();

        // 从不读取stdin，大输入会把管道写满
        let script = dir.path().join("stalled-prettier.sh");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let formatter = PrettierFormatter::with_executable(&script, &config)
            .with_timeout(Duration::from_millis(300));
        let text = "<p>保存</p>\n".repeat(100_000);
        let result = formatter.format(&text, Path::new("src/app.html")).await;
        match result {
            Err(ChinesizeError::Format { details, .. }) => assert!(details.contains("300ms")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_format_failure_is_file_local() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(".prettierrc");
        std::fs::write(&config, "{}").unwrap();

        let script = dir.path().join("failing-prettier.sh");
        std::fs::write(&script, "#!/bin/sh\ncat > /dev/null\necho 'SyntaxError' >&2\nexit 2\n")
            .unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let formatter = PrettierFormatter::with_executable(&script, &config);
        let result = formatter.format("<p>", Path::new("src/app.html")).await;
        match result {
            Err(error @ ChinesizeError::Format { .. }) => {
                assert!(!error.is_precondition());
                assert!(error.to_string().contains("SyntaxError"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
