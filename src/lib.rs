//! chinesize - 前端项目模板汉化工具库
//!
//! 这个库提供了模板标记解析与渲染、待翻译文本提取、译文回填、
//! 内嵌模板定位以及项目目录扫描等核心功能。

pub mod config;
pub mod constants;
pub mod dictionary;
pub mod error;
pub mod file_filter;
pub mod formatter;
pub mod html_processor;
pub mod markup;
pub mod scanner;
pub mod stats;
pub mod template_locator;
pub mod utils;
pub mod workflow;
