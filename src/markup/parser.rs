//! 标记解析器
//!
//! 保留大小写的宽松HTML解析器，专为Angular模板设计：
//! `[ngModel]`、`(click)`、`*ngIf` 等属性原样保留，注释按文本保存，声明原样保留，
//! 每个属性和标签的原始写法都会记录下来，供渲染器逐字节还原。

use crate::chinesize_error;
use crate::constants::tag_config::{RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use crate::error::{ChinesizeError, Result};

use super::node::{AttrValue, Attribute, Content, MarkupTree, Node, Quote};

/// 解析标记文本
pub fn parse(source: &str) -> Result<MarkupTree> {
    Parser::new(source).run()
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|name| name.eq_ignore_ascii_case(tag))
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|name| name.eq_ignore_ascii_case(tag))
}

fn starts_name(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_ascii_alphabetic())
}

/// `<` 之后是否真的开始一段标记；否则它只是普通文本里的小于号
fn is_markup_start(s: &str) -> bool {
    if s.starts_with("<!") || s.starts_with("<?") {
        return true;
    }
    if let Some(rest) = s.strip_prefix("</") {
        return starts_name(rest);
    }
    s.strip_prefix('<').map_or(false, starts_name)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    root: Vec<Content>,
    stack: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<MarkupTree> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.consume_comment()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.consume_declaration()?;
            } else if rest.starts_with("</") && is_markup_start(rest) {
                self.consume_end_tag()?;
            } else if is_markup_start(rest) {
                self.consume_start_tag()?;
            } else {
                self.consume_text();
            }
        }

        // 文件结束时仍未闭合的元素视为隐式闭合
        while let Some(node) = self.stack.pop() {
            self.append(Content::Node(node));
        }

        Ok(MarkupTree::new(self.root))
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn container(&mut self) -> &mut Vec<Content> {
        match self.stack.last_mut() {
            Some(node) => &mut node.content,
            None => &mut self.root,
        }
    }

    fn append(&mut self, item: Content) {
        self.container().push(item);
    }

    fn error_at(&self, offset: usize, details: impl Into<String>) -> ChinesizeError {
        let before = &self.src[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        chinesize_error!(parse, line, column, details.into())
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// 读取名称：首字符总是被消费，之后遇到 `stop` 为真的字符停止
    fn read_name(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| stop(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn consume_text(&mut self) {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(i, c)| c == '<' && is_markup_start(&rest[i..]))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        self.append(Content::Text(rest[..end].to_string()));
    }

    fn consume_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let close = self.rest()[4..]
            .find("-->")
            .ok_or_else(|| self.error_at(start, "注释未闭合"))?;
        let end = start + 4 + close + 3;
        self.pos = end;
        self.append(Content::Text(self.src[start..end].to_string()));
        Ok(())
    }

    /// `<!DOCTYPE ...>`、`<![CDATA[...]]>`、`<?xml ...?>` 原样保留
    fn consume_declaration(&mut self) -> Result<()> {
        let start = self.pos;
        let close = if self.rest().starts_with("<![CDATA[") {
            self.rest().find("]]>").map(|i| i + 3)
        } else {
            self.rest().find('>').map(|i| i + 1)
        };
        let end = start + close.ok_or_else(|| self.error_at(start, "声明未闭合"))?;
        self.pos = end;
        self.append(Content::Raw(self.src[start..end].to_string()));
        Ok(())
    }

    fn consume_start_tag(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 1;
        let tag = self
            .read_name(|c| c.is_whitespace() || c == '/' || c == '>')
            .to_string();

        let mut attrs = Vec::new();
        let tail = loop {
            let leading_start = self.pos;
            loop {
                self.skip_whitespace();
                let rest = self.rest();
                if rest.starts_with('/') && !rest.starts_with("/>") {
                    self.pos += 1;
                    continue;
                }
                break;
            }

            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error_at(start, format!("标签 <{}> 未闭合", tag)));
            }
            if rest.starts_with("/>") {
                let tail = self.src[leading_start..self.pos + 1].to_string();
                self.pos += 2;
                break tail;
            }
            if rest.starts_with('>') {
                let tail = self.src[leading_start..self.pos].to_string();
                self.pos += 1;
                break tail;
            }

            let leading = self.src[leading_start..self.pos].to_string();
            attrs.push(self.read_attribute(leading)?);
        };

        let node = Node {
            tag,
            attrs,
            content: Vec::new(),
            tail,
            end_tag: None,
        };

        if is_void(&node.tag) || node.is_self_closing() {
            self.append(Content::Node(node));
        } else if is_raw_text(&node.tag) {
            self.consume_raw_text(node, start)?;
        } else {
            self.stack.push(node);
        }
        Ok(())
    }

    fn read_attribute(&mut self, leading: String) -> Result<Attribute> {
        let name = self
            .read_name(|c| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .to_string();

        let before_assign = self.pos;
        self.skip_whitespace();
        if self.peek() != Some('=') {
            self.pos = before_assign;
            return Ok(Attribute {
                name,
                value: AttrValue::Flag,
                quote: Quote::Bare,
                leading,
                assign: String::new(),
            });
        }
        self.pos += 1;
        self.skip_whitespace();
        let assign = self.src[before_assign..self.pos].to_string();

        let (value, quote) = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                let open = self.pos;
                self.pos += 1;
                let close = self
                    .rest()
                    .find(q)
                    .ok_or_else(|| self.error_at(open, format!("属性 {} 的引号未闭合", name)))?;
                let value = self.rest()[..close].to_string();
                self.pos += close + 1;
                let quote = if q == '"' { Quote::Double } else { Quote::Single };
                (value, quote)
            }
            _ => {
                let rest = self.rest();
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                (rest[..end].to_string(), Quote::Bare)
            }
        };

        Ok(Attribute {
            name,
            value: AttrValue::Text(value),
            quote,
            leading,
            assign,
        })
    }

    /// 原始文本元素的内容一直延伸到匹配的结束标签
    fn consume_raw_text(&mut self, mut node: Node, start: usize) -> Result<()> {
        let rest = self.rest();
        let tag_len = node.tag.len();
        let close = rest
            .match_indices("</")
            .map(|(i, _)| i)
            .find(|&i| match rest.get(i + 2..i + 2 + tag_len) {
                Some(name) if name.eq_ignore_ascii_case(&node.tag) => rest[i + 2 + tag_len..]
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_whitespace() || c == '>' || c == '/'),
                _ => false,
            })
            .ok_or_else(|| self.error_at(start, format!("<{}> 缺少结束标签", node.tag)))?;

        if close > 0 {
            node.content.push(Content::Text(rest[..close].to_string()));
        }

        let end_tag_start = self.pos + close;
        let gt = self.src[end_tag_start..]
            .find('>')
            .ok_or_else(|| self.error_at(end_tag_start, "结束标签未闭合"))?;
        let end = end_tag_start + gt + 1;
        node.end_tag = Some(self.src[end_tag_start..end].to_string());
        self.pos = end;
        self.append(Content::Node(node));
        Ok(())
    }

    fn consume_end_tag(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 2;
        let name = self
            .read_name(|c| c.is_whitespace() || c == '>' || c == '/')
            .to_string();
        let gt = self
            .rest()
            .find('>')
            .ok_or_else(|| self.error_at(start, format!("结束标签 </{}> 未闭合", name)))?;
        self.pos += gt + 1;
        let raw = self.src[start..self.pos].to_string();

        match self
            .stack
            .iter()
            .rposition(|node| node.tag.eq_ignore_ascii_case(&name))
        {
            Some(index) => {
                // 中间未闭合的元素被隐式闭合
                while self.stack.len() > index + 1 {
                    if let Some(node) = self.stack.pop() {
                        self.append(Content::Node(node));
                    }
                }
                if let Some(mut node) = self.stack.pop() {
                    node.end_tag = Some(raw);
                    self.append(Content::Node(node));
                }
                Ok(())
            }
            None => {
                // `<input></input>` 这类写法：结束标签归属前一个空元素
                if is_void(&name) {
                    if let Some(Content::Node(node)) = self.container().last_mut() {
                        if node.tag.eq_ignore_ascii_case(&name)
                            && node.end_tag.is_none()
                            && !node.is_self_closing()
                        {
                            node.end_tag = Some(raw);
                            return Ok(());
                        }
                    }
                }
                Err(self.error_at(start, format!("多余的结束标签 </{}>", name)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_node(tree: &MarkupTree) -> &Node {
        tree.nodes().next().expect("tree should contain a node")
    }

    #[test]
    fn test_parse_preserves_case_and_bindings() {
        let tree = parse(r#"<mat-option [ngModel]="value" (click)="go()" *ngIf="ok" #ref>Go</mat-option>"#)
            .unwrap();
        let node = first_node(&tree);
        assert_eq!(node.tag, "mat-option");
        let names: Vec<&str> = node.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["[ngModel]", "(click)", "*ngIf", "#ref"]);
        assert_eq!(node.attr("#ref").map(|a| &a.value), Some(&AttrValue::Flag));
        assert_eq!(node.content, vec![Content::Text("Go".to_string())]);
    }

    #[test]
    fn test_comment_is_text_item() {
        let tree = parse("<div><!-- note -->Hi</div>").unwrap();
        let node = first_node(&tree);
        assert_eq!(
            node.content,
            vec![
                Content::Text("<!-- note -->".to_string()),
                Content::Text("Hi".to_string()),
            ]
        );
    }

    #[test]
    fn test_declarations_are_raw_items() {
        let tree = parse("<!DOCTYPE html>\n<?xml version=\"1.0\"?><p><![CDATA[a<b]]></p>").unwrap();
        assert_eq!(tree.content[0], Content::Raw("<!DOCTYPE html>".to_string()));
        assert_eq!(tree.content[1], Content::Text("\n".to_string()));
        assert_eq!(tree.content[2], Content::Raw("<?xml version=\"1.0\"?>".to_string()));
        let node = first_node(&tree);
        assert_eq!(node.content, vec![Content::Raw("<![CDATA[a<b]]>".to_string())]);
    }

    #[test]
    fn test_less_than_in_text() {
        let tree = parse("<p>{{ a < b }} ok</p>").unwrap();
        let node = first_node(&tree);
        assert_eq!(node.content.len(), 1);
        assert_eq!(node.content[0].as_text(), Some("{{ a < b }} ok"));
    }

    #[test]
    fn test_void_and_self_closing() {
        let tree = parse("<p>a<br>b<app-icon name=x />c</p>").unwrap();
        let node = first_node(&tree);
        assert_eq!(node.content.len(), 5);
        match &node.content[3] {
            Content::Node(icon) => {
                assert!(icon.is_self_closing());
                assert_eq!(icon.attr("name").and_then(|a| a.value.as_text()), Some("x"));
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_raw_text_element() {
        let tree = parse("<script>if (a <b) { x = '</div>'; }</script>").unwrap();
        let node = first_node(&tree);
        assert_eq!(node.content.len(), 1);
        assert_eq!(
            node.content[0].as_text(),
            Some("if (a <b) { x = '</div>'; }")
        );
    }

    #[test]
    fn test_implicit_close() {
        let tree = parse("<ul><li>One<li>Two</ul>").unwrap();
        let list = first_node(&tree);
        assert_eq!(list.content.len(), 1);
        match &list.content[0] {
            Content::Node(first) => {
                assert_eq!(first.end_tag, None);
                assert_eq!(first.content.len(), 2);
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_void_end_tag_attached() {
        let tree = parse(r#"<input type="text"></input>"#).unwrap();
        assert_eq!(first_node(&tree).end_tag.as_deref(), Some("</input>"));
    }

    #[test]
    fn test_stray_end_tag_is_error() {
        let err = parse("<div>ok</div>\n  </span>").unwrap_err();
        match err {
            ChinesizeError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unterminated_constructs_are_errors() {
        assert!(parse(r#"<div class="a"#).is_err());
        assert!(parse("<div><!-- open").is_err());
        assert!(parse("<style>p {}").is_err());
        assert!(parse("<div title='x>y").is_err());
    }

    #[test]
    fn test_unicode_text() {
        let tree = parse("<span>保存 <b>文件</b></span>").unwrap();
        let node = first_node(&tree);
        assert_eq!(node.content[0].as_text(), Some("保存 "));
    }
}
