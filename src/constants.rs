/// chinesize 常量配置
///
/// 该文件集中定义默认路径、模板标记以及标签分类，方便统一管理和维护

/// 字典文件相关配置
pub mod dictionary_config {
    /// 默认输出目录（位于项目根目录下）
    pub const OUTPUT_DIR_NAME: &str = "chinesize";

    /// 默认字典文件名前缀
    pub const FILE_STEM: &str = "texts-to-translate";

    /// 字典文件扩展名
    pub const FILE_EXTENSION: &str = "json";
}

/// 文本识别配置
pub mod text_config {
    /// 注释起始标记
    pub const COMMENT_OPEN: &str = "<!--";

    /// 两种模板都识别的插值定界符
    pub const MUSTACHE: (&str, &str) = ("{{", "}}");

    /// 仅内嵌模板识别的插值定界符
    pub const DOUBLE_BRACKET: (&str, &str) = ("[[", "]]");

    /// 不扫描文本的标签（整棵子树跳过）
    pub const SKIPPED_TAGS: &[&str] = &["style", "script", "code", "pre"];
}

/// 内嵌模板定位标记
pub mod template_config {
    /// 属性写法：`template: `...``,
    pub const PROPERTY_OPEN: &str = "template: `";
    pub const PROPERTY_CLOSE: &str = "`,";

    /// 标签字面量写法：`= html`...``;
    pub const TAGGED_OPEN: &str = "= html`";
    pub const TAGGED_CLOSE: &str = "`;";
}

/// HTML标签分类
pub mod tag_config {
    /// 空元素，没有结束标签
    pub const VOID_ELEMENTS: &[&str] = &[
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ];

    /// 原始文本元素，内容整体保留为一个文本项
    pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];
}

/// 文件类型配置
pub mod file_config {
    /// 纯标记文件扩展名
    pub const MARKUP_EXTENSIONS: &[&str] = &["html"];

    /// 内嵌模板源文件扩展名
    pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "ts"];

    /// prettier可执行文件名
    pub const PRETTIER_BIN: &str = "prettier";

    /// 单个文件格式化的超时时间（秒）
    pub const FORMAT_TIMEOUT_SECS: u64 = 60;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_tags() {
        assert_eq!(text_config::SKIPPED_TAGS.len(), 4);
        assert!(text_config::SKIPPED_TAGS.contains(&"pre"));
        assert!(!text_config::SKIPPED_TAGS.contains(&"span"));
    }

    #[test]
    fn test_template_markers() {
        assert!(template_config::PROPERTY_OPEN.ends_with('`'));
        assert!(template_config::TAGGED_OPEN.ends_with('`'));
        assert!(template_config::PROPERTY_CLOSE.starts_with('`'));
        assert!(template_config::TAGGED_CLOSE.starts_with('`'));
    }

    #[test]
    fn test_raw_text_and_void_disjoint() {
        for tag in tag_config::RAW_TEXT_ELEMENTS {
            assert!(!tag_config::VOID_ELEMENTS.contains(tag));
        }
    }
}
