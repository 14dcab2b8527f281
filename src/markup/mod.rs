//! 标记处理模块
//!
//! 提供标记树模型、解析和渲染功能

pub mod node;
pub mod parser;
pub mod render;

pub use node::{AttrValue, Attribute, Content, MarkupTree, Node, Quote};
pub use parser::parse;
pub use render::render;
