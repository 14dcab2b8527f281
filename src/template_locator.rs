//! 内嵌模板定位模块
//!
//! 在 `.js` / `.ts` 源文件中找到唯一的模板字符串，把文件切分为
//! 前缀、模板正文、后缀三段。只有正文交给标记解析器，前后缀原样保留。

use crate::constants::template_config::{PROPERTY_CLOSE, PROPERTY_OPEN, TAGGED_CLOSE, TAGGED_OPEN};

/// 模板字符串的书写方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateConvention {
    /// 组件元数据属性：`template: `...``,
    Property,
    /// 标签模板字面量：`= html`...``;
    TaggedLiteral,
}

impl TemplateConvention {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            TemplateConvention::Property => (PROPERTY_OPEN, PROPERTY_CLOSE),
            TemplateConvention::TaggedLiteral => (TAGGED_OPEN, TAGGED_CLOSE),
        }
    }
}

/// 源文件的三段切分，`prefix + body + suffix` 与原文逐字节相同
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBoundary<'a> {
    /// 到开始标记（含）为止的全部内容
    pub prefix: &'a str,
    /// 两个标记之间的模板正文
    pub body: &'a str,
    /// 从结束标记开始到文件末尾
    pub suffix: &'a str,
    pub convention: TemplateConvention,
}

impl<'a> TemplateBoundary<'a> {
    /// 正文里出现反引号或 `${` 时，切分结果可能并不是完整的模板
    pub fn is_ambiguous(&self) -> bool {
        self.body.contains('`') || self.body.contains("${")
    }

    /// 用渲染后的正文重建整个文件
    pub fn reassemble(&self, rendered_body: &str) -> String {
        reassemble(self.prefix, rendered_body, self.suffix)
    }
}

/// 按固定优先级查找模板字符串
///
/// 先找属性写法；只要它的开始标记存在，结果就只由它决定，
/// 找不到结束标记时直接返回None，不会再尝试标签字面量写法。
pub fn locate_template(source: &str) -> Option<TemplateBoundary<'_>> {
    for convention in [TemplateConvention::Property, TemplateConvention::TaggedLiteral] {
        let (open, close) = convention.markers();
        if let Some(open_index) = source.find(open) {
            let body_start = open_index + open.len();
            let body_end = body_start + source[body_start..].find(close)?;
            return Some(TemplateBoundary {
                prefix: &source[..body_start],
                body: &source[body_start..body_end],
                suffix: &source[body_end..],
                convention,
            });
        }
    }
    None
}

/// 拼接前缀、渲染后的正文和后缀
pub fn reassemble(prefix: &str, rendered_body: &str, suffix: &str) -> String {
    let mut output = String::with_capacity(prefix.len() + rendered_body.len() + suffix.len());
    output.push_str(prefix);
    output.push_str(rendered_body);
    output.push_str(suffix);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = r#"import { Component } from '@angular/core';

@Component({
  selector: 'app-hello',
  template: `Hello <span title="Hi">World</span>`,
  styles: [`span { color: red; }`],
})
export class HelloComponent {}
"#;

    #[test]
    fn test_property_convention() {
        let boundary = locate_template(COMPONENT).unwrap();
        assert_eq!(boundary.convention, TemplateConvention::Property);
        assert_eq!(boundary.body, r#"Hello <span title="Hi">World</span>"#);
        assert!(boundary.prefix.ends_with("template: `"));
        assert!(boundary.suffix.starts_with("`,\n  styles"));
    }

    #[test]
    fn test_partition_reconstructs_source() {
        let boundary = locate_template(COMPONENT).unwrap();
        let rebuilt = format!("{}{}{}", boundary.prefix, boundary.body, boundary.suffix);
        assert_eq!(rebuilt, COMPONENT);
        assert_eq!(boundary.reassemble(boundary.body), COMPONENT);
    }

    #[test]
    fn test_tagged_literal_convention() {
        let source = "class Card extends LitElement {\n  render() {\n    const view = html`<p>Card</p>`;\n    return view;\n  }\n}\n";
        let boundary = locate_template(source).unwrap();
        assert_eq!(boundary.convention, TemplateConvention::TaggedLiteral);
        assert_eq!(boundary.body, "<p>Card</p>");
        assert!(boundary.suffix.starts_with("`;"));
    }

    #[test]
    fn test_property_wins_over_tagged_literal() {
        let source = "const a = html`<b>A</b>`;\n@Component({ template: `<i>B</i>`, })";
        let boundary = locate_template(source).unwrap();
        assert_eq!(boundary.convention, TemplateConvention::Property);
        assert_eq!(boundary.body, "<i>B</i>");
    }

    #[test]
    fn test_unterminated_property_does_not_fall_through() {
        let source = "@Component({ template: `<p>Open</p>` })\nconst b = html`<b>B</b>`;";
        assert_eq!(locate_template(source), None);

        let eof = "@Component({ template: `<p>never closed";
        assert_eq!(locate_template(eof), None);
    }

    #[test]
    fn test_no_markers() {
        assert_eq!(locate_template("export const x = 1;\n"), None);
        assert_eq!(locate_template("templateUrl: './a.html',"), None);
    }

    #[test]
    fn test_close_search_starts_after_marker() {
        let source = "template: `,\n<p>x</p>`,";
        let boundary = locate_template(source).unwrap();
        assert_eq!(boundary.body, ",\n<p>x</p>");
    }

    #[test]
    fn test_empty_body() {
        let boundary = locate_template("template: ``,").unwrap();
        assert_eq!(boundary.body, "");
    }

    #[test]
    fn test_ambiguous_body() {
        let nested = locate_template("template: `<p>${name}</p>`,").unwrap();
        assert!(nested.is_ambiguous());
        let plain = locate_template(COMPONENT).unwrap();
        assert!(!plain.is_ambiguous());
    }

    #[test]
    fn test_reassemble() {
        assert_eq!(reassemble("a`", "<p>保存</p>", "`,b"), "a`<p>保存</p>`,b");
    }
}
