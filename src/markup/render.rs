//! 标记渲染器
//!
//! 按解析时记录的原始片段输出，未修改的树逐字节还原。

use std::fmt::{self, Write};

use crate::chinesize_error;
use crate::error::Result;

use super::node::{AttrValue, Attribute, Content, MarkupTree, Node};

/// 将标记树渲染为文本
pub fn render(tree: &MarkupTree) -> Result<String> {
    let mut out = String::new();
    write_content(&mut out, &tree.content).map_err(|e| chinesize_error!(render, e))?;
    Ok(out)
}

impl fmt::Display for MarkupTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_content(f, &self.content)
    }
}

fn write_content<W: Write>(out: &mut W, items: &[Content]) -> fmt::Result {
    for item in items {
        match item {
            Content::Text(text) | Content::Raw(text) => out.write_str(text)?,
            Content::Node(node) => write_node(out, node)?,
        }
    }
    Ok(())
}

fn write_node<W: Write>(out: &mut W, node: &Node) -> fmt::Result {
    write!(out, "<{}", node.tag)?;
    for attr in &node.attrs {
        write_attribute(out, attr)?;
    }
    write!(out, "{}>", node.tail)?;
    write_content(out, &node.content)?;
    if let Some(end_tag) = &node.end_tag {
        out.write_str(end_tag)?;
    }
    Ok(())
}

fn write_attribute<W: Write>(out: &mut W, attr: &Attribute) -> fmt::Result {
    write!(out, "{}{}", attr.leading, attr.name)?;
    if let AttrValue::Text(value) = &attr.value {
        let quote = attr.quote.as_str();
        write!(out, "{}{}{}{}", attr.assign, quote, value, quote)?;
    }
    Ok(())
}
