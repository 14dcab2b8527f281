//! 标记树数据模型
//!
//! 结构与posthtml的树一致：节点拥有标签名、有序属性和有序内容项，
//! 内容项可以是子节点、文本（注释也按文本保存），或原样保留的声明。
//! 每个节点额外记录渲染所需的原始片段，保证未修改的树可以逐字节还原。

/// 属性值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// 带值的属性（原始文本，不做实体解码）
    Text(String),
    /// 无值的布尔属性，如 `disabled`
    Flag,
}

impl AttrValue {
    /// 字符串值，布尔属性返回None
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            AttrValue::Flag => None,
        }
    }
}

/// 属性值两侧使用的引号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Bare,
}

impl Quote {
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::Bare => "",
        }
    }
}

/// 单个属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
    pub(crate) quote: Quote,
    /// 属性名之前的空白
    pub(crate) leading: String,
    /// 属性名与值之间的原始写法，如 `=` 或 ` = `
    pub(crate) assign: String,
}

impl Attribute {
    /// 以默认格式（前置一个空格、双引号）创建属性
    pub fn new(name: &str, value: AttrValue) -> Self {
        let (quote, assign) = match value {
            AttrValue::Text(_) => (Quote::Double, "=".to_string()),
            AttrValue::Flag => (Quote::Bare, String::new()),
        };
        Self {
            name: name.to_string(),
            value,
            quote,
            leading: " ".to_string(),
            assign,
        }
    }

    /// 替换属性值，必要时调整引号以保证输出仍然合法
    pub fn set_text(&mut self, value: &str) {
        if matches!(self.value, AttrValue::Flag) {
            self.assign = "=".to_string();
            self.quote = Quote::Double;
        }

        if self.quote == Quote::Bare && needs_quoting(value) {
            self.quote = Quote::Double;
        }

        let escaped = match self.quote {
            Quote::Double => value.replace('"', "&quot;"),
            Quote::Single => value.replace('\'', "&#39;"),
            Quote::Bare => value.to_string(),
        };
        self.value = AttrValue::Text(escaped);
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '`'))
}

/// 内容项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Node(Node),
    /// `<!DOCTYPE ...>`、`<?...?>`、CDATA 等声明，原样输出，不参与文本识别
    Raw(String),
}

impl Content {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Node(_) | Content::Raw(_) => None,
        }
    }
}

/// 元素节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub content: Vec<Content>,
    /// 最后一个属性与 `>` 之间的原始片段（包括自闭合的 `/`）
    pub(crate) tail: String,
    /// 原始结束标签；空元素、自闭合元素和隐式闭合的元素为None
    pub(crate) end_tag: Option<String>,
}

impl Node {
    /// 创建带显式结束标签的空节点
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            content: Vec::new(),
            tail: String::new(),
            end_tag: Some(format!("</{}>", tag)),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push(Attribute::new(name, AttrValue::Text(value.to_string())));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content.push(Content::Text(text.to_string()));
        self
    }

    /// 按名称（区分大小写）查找第一个属性
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    pub fn attr_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attrs.iter_mut().find(|attr| attr.name == name)
    }

    /// 节点是否以自闭合形式书写（`<x />`）
    pub fn is_self_closing(&self) -> bool {
        self.tail.ends_with('/')
    }
}

/// 标记树：有序的顶层内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTree {
    pub content: Vec<Content>,
}

impl MarkupTree {
    pub fn new(content: Vec<Content>) -> Self {
        Self { content }
    }

    /// 顶层元素节点
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.content.iter().filter_map(|item| match item {
            Content::Node(node) => Some(node),
            Content::Text(_) | Content::Raw(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_lookup_is_case_sensitive() {
        let node = Node::new("span").with_attr("Title", "Hi");
        assert!(node.attr("title").is_none());
        assert_eq!(
            node.attr("Title").and_then(|a| a.value.as_text()),
            Some("Hi")
        );
    }

    #[test]
    fn test_set_text_escapes_quote() {
        let mut attr = Attribute::new("title", AttrValue::Text("Save".to_string()));
        attr.set_text("say \"hi\"");
        assert_eq!(attr.value.as_text(), Some("say &quot;hi&quot;"));
    }

    #[test]
    fn test_set_text_quotes_bare_value() {
        let mut attr = Attribute::new("title", AttrValue::Text("Save".to_string()));
        attr.quote = Quote::Bare;
        attr.set_text("保存 文件");
        assert_eq!(attr.quote, Quote::Double);

        let mut single = Attribute::new("title", AttrValue::Text("Save".to_string()));
        single.quote = Quote::Single;
        single.set_text("it's");
        assert_eq!(single.value.as_text(), Some("it&#39;s"));
    }

    #[test]
    fn test_set_text_on_flag() {
        let mut attr = Attribute::new("label", AttrValue::Flag);
        attr.set_text("名称");
        assert_eq!(attr.assign, "=");
        assert_eq!(attr.quote, Quote::Double);
        assert_eq!(attr.value.as_text(), Some("名称"));
    }

    #[test]
    fn test_tree_nodes_skip_text() {
        let tree = MarkupTree::new(vec![
            Content::Text("\n".to_string()),
            Content::Node(Node::new("p")),
        ]);
        assert_eq!(tree.nodes().count(), 1);
    }
}
