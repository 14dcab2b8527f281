use std::path::Path;

use tracing::warn;

use crate::chinesize_error;
use crate::error::Result;

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 验证项目目录
pub fn validate_project_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(chinesize_error!(not_found, path));
    }

    if !path.is_dir() {
        return Err(chinesize_error!(not_dir, path));
    }

    Ok(())
}

/// 验证输入文件
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(chinesize_error!(not_found, path));
    }

    if !path.is_file() {
        return Err(chinesize_error!(not_file, path));
    }

    if let Some(ext) = path.extension() {
        if ext != "json" {
            warn!("⚠️  字典文件扩展名不是JSON: {}", ext.to_string_lossy());
        }
    }

    Ok(())
}

/// 相对项目根目录的显示路径，用于日志
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChinesizeError;

    #[test]
    fn test_validate_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_project_dir(dir.path()).is_ok());

        let file = dir.path().join("a.html");
        std::fs::write(&file, "").unwrap();
        assert!(matches!(
            validate_project_dir(&file),
            Err(ChinesizeError::NotADirectory { .. })
        ));
        assert!(matches!(
            validate_project_dir(&dir.path().join("missing")),
            Err(ChinesizeError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_input_file(dir.path()),
            Err(ChinesizeError::NotAFile { .. })
        ));

        let file = dir.path().join("texts.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(validate_input_file(&file).is_ok());
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/work/app");
        assert_eq!(display_path(root, Path::new("/work/app/src/a.html")), "src/a.html");
        assert_eq!(display_path(root, Path::new("/other/b.html")), "/other/b.html");
    }
}
