//! 模板文本处理模块
//!
//! 提供标签过滤、文本识别、树遍历，以及在此之上的文本提取和译文回填。
//! 提取只读取树；回填就地修改树，未命中字典的位置保持原样。

// 本地模块导入
use crate::constants::text_config::{COMMENT_OPEN, DOUBLE_BRACKET, MUSTACHE, SKIPPED_TAGS};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::markup::{self, Attribute, Content, MarkupTree};

/// 模板来源
///
/// 纯标记文件和内嵌在脚本源文件里的模板在识别规则上略有不同：
/// 内嵌模板额外识别 `label` 属性和 `[[ ]]` 插值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariant {
    /// `.html` 文件
    Markup,
    /// `.js` / `.ts` 文件中的模板字符串
    Embedded,
}

impl TemplateVariant {
    /// 需要扫描的属性名（按访问顺序）
    pub fn text_attributes(self) -> &'static [&'static str] {
        match self {
            TemplateVariant::Markup => &["title"],
            TemplateVariant::Embedded => &["title", "label"],
        }
    }

    /// 识别的插值定界符
    pub fn interpolations(self) -> &'static [(&'static str, &'static str)] {
        match self {
            TemplateVariant::Markup => &[MUSTACHE],
            TemplateVariant::Embedded => &[MUSTACHE, DOUBLE_BRACKET],
        }
    }
}

/// 判断以该标签为根的子树是否需要扫描
pub fn is_scannable_tag(tag: &str) -> bool {
    !SKIPPED_TAGS.iter().any(|&skipped| skipped == tag)
}

/// 识别可翻译文本
///
/// `None` 表示非字符串值（如布尔属性）。返回去除首尾空白后的文本，
/// 空白、整段插值表达式和注释返回None。
pub fn classify_text(value: Option<&str>, variant: TemplateVariant) -> Option<&str> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }

    let is_interpolation = variant
        .interpolations()
        .iter()
        .any(|&(open, close)| text.starts_with(open) && text.ends_with(close));
    if is_interpolation || text.starts_with(COMMENT_OPEN) {
        return None;
    }

    Some(text)
}

/// 候选文本在节点中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// 节点内容中的第几项
    Content(usize),
    /// 指定名称的属性
    Attribute(&'static str),
}

/// 候选文本的完整位置：从树根到节点的下标路径，加上节点内的槽位。
/// 路径为空表示树的顶层内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: Vec<usize>,
    pub slot: Slot,
}

/// 一个可翻译单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub location: Location,
    pub text: String,
}

/// 可修改的候选值
pub enum CandidateMut<'a> {
    Text(&'a mut String),
    Attribute(&'a mut Attribute),
}

/// 只读遍历的访问者
pub trait CandidateVisitor {
    fn visit(&mut self, location: Location, value: Option<&str>);
}

/// 可修改遍历的访问者
pub trait CandidateVisitorMut {
    fn visit_mut(&mut self, location: Location, value: CandidateMut<'_>);
}

/// 遍历树中所有可扫描节点，把文本内容项和指定属性交给访问者。
///
/// 每个节点先交出自己的文本内容项，再交出属性，然后才深入子节点。
/// 顶层文本项视为根容器的内容。被过滤的标签整棵子树跳过。
pub fn walk<V: CandidateVisitor>(tree: &MarkupTree, variant: TemplateVariant, visitor: &mut V) {
    let mut path = Vec::new();
    offer_texts(&tree.content, &path, visitor);
    walk_children(&tree.content, variant, &mut path, visitor);
}

fn offer_texts<V: CandidateVisitor>(content: &[Content], path: &[usize], visitor: &mut V) {
    for (index, item) in content.iter().enumerate() {
        if let Content::Text(text) = item {
            let location = Location {
                path: path.to_vec(),
                slot: Slot::Content(index),
            };
            visitor.visit(location, Some(text));
        }
    }
}

fn walk_children<V: CandidateVisitor>(
    content: &[Content],
    variant: TemplateVariant,
    path: &mut Vec<usize>,
    visitor: &mut V,
) {
    for (index, item) in content.iter().enumerate() {
        let Content::Node(node) = item else { continue };
        if !is_scannable_tag(&node.tag) {
            continue;
        }

        path.push(index);
        offer_texts(&node.content, path, visitor);
        for &name in variant.text_attributes() {
            if let Some(attr) = node.attr(name) {
                let location = Location {
                    path: path.clone(),
                    slot: Slot::Attribute(name),
                };
                visitor.visit(location, attr.value.as_text());
            }
        }
        walk_children(&node.content, variant, path, visitor);
        path.pop();
    }
}

/// `walk` 的可修改版本
pub fn walk_mut<V: CandidateVisitorMut>(
    tree: &mut MarkupTree,
    variant: TemplateVariant,
    visitor: &mut V,
) {
    let mut path = Vec::new();
    offer_texts_mut(&mut tree.content, &path, visitor);
    walk_children_mut(&mut tree.content, variant, &mut path, visitor);
}

fn offer_texts_mut<V: CandidateVisitorMut>(
    content: &mut [Content],
    path: &[usize],
    visitor: &mut V,
) {
    for (index, item) in content.iter_mut().enumerate() {
        if let Content::Text(text) = item {
            let location = Location {
                path: path.to_vec(),
                slot: Slot::Content(index),
            };
            visitor.visit_mut(location, CandidateMut::Text(text));
        }
    }
}

fn walk_children_mut<V: CandidateVisitorMut>(
    content: &mut [Content],
    variant: TemplateVariant,
    path: &mut Vec<usize>,
    visitor: &mut V,
) {
    for (index, item) in content.iter_mut().enumerate() {
        let Content::Node(node) = item else { continue };
        if !is_scannable_tag(&node.tag) {
            continue;
        }

        path.push(index);
        offer_texts_mut(&mut node.content, path, visitor);
        for &name in variant.text_attributes() {
            if let Some(attr) = node.attr_mut(name) {
                let location = Location {
                    path: path.clone(),
                    slot: Slot::Attribute(name),
                };
                visitor.visit_mut(location, CandidateMut::Attribute(attr));
            }
        }
        walk_children_mut(&mut node.content, variant, path, visitor);
        path.pop();
    }
}

/// 提取访问者：收集通过识别的文本
struct ExtractVisitor {
    variant: TemplateVariant,
    units: Vec<TextUnit>,
}

impl CandidateVisitor for ExtractVisitor {
    fn visit(&mut self, location: Location, value: Option<&str>) {
        if let Some(text) = classify_text(value, self.variant) {
            self.units.push(TextUnit {
                location,
                text: text.to_string(),
            });
        }
    }
}

/// 按遍历顺序提取树中所有可翻译单元
pub fn extract_units(tree: &MarkupTree, variant: TemplateVariant) -> Vec<TextUnit> {
    let mut visitor = ExtractVisitor {
        variant,
        units: Vec::new(),
    };
    walk(tree, variant, &mut visitor);
    visitor.units
}

/// 解析一段标记并提取其中的可翻译文本
pub fn extract_texts(source: &str, variant: TemplateVariant) -> Result<Vec<String>> {
    let tree = markup::parse(source)?;
    Ok(extract_units(&tree, variant)
        .into_iter()
        .map(|unit| unit.text)
        .collect())
}

/// 回填访问者：命中字典的文本替换为译文
struct SubstituteVisitor<'d> {
    variant: TemplateVariant,
    dictionary: &'d Dictionary,
    replaced: usize,
}

impl SubstituteVisitor<'_> {
    /// 查找译文；空译文视为尚未翻译
    fn translate(&self, raw: Option<&str>) -> Option<String> {
        let key = classify_text(raw, self.variant)?;
        let translation = self.dictionary.get(key).filter(|t| !t.is_empty())?;
        raw.map(|raw| splice_trimmed(raw, translation))
    }
}

impl CandidateVisitorMut for SubstituteVisitor<'_> {
    fn visit_mut(&mut self, _location: Location, value: CandidateMut<'_>) {
        match value {
            CandidateMut::Text(text) => {
                if let Some(translated) = self.translate(Some(text.as_str())) {
                    *text = translated;
                    self.replaced += 1;
                }
            }
            CandidateMut::Attribute(attr) => {
                if let Some(translated) = self.translate(attr.value.as_text()) {
                    attr.set_text(&translated);
                    self.replaced += 1;
                }
            }
        }
    }
}

/// 用译文替换原始值中去除空白后的部分，保留两侧空白
fn splice_trimmed(raw: &str, replacement: &str) -> String {
    let start = raw.len() - raw.trim_start().len();
    let end = raw.trim_end().len().max(start);
    format!("{}{}{}", &raw[..start], replacement, &raw[end..])
}

/// 用字典就地替换树中的文本，返回替换次数
pub fn apply_dictionary(
    tree: &mut MarkupTree,
    dictionary: &Dictionary,
    variant: TemplateVariant,
) -> usize {
    let mut visitor = SubstituteVisitor {
        variant,
        dictionary,
        replaced: 0,
    };
    walk_mut(tree, variant, &mut visitor);
    visitor.replaced
}

/// 解析、回填并重新渲染一段标记；返回新文本和替换次数
pub fn translate_markup(
    source: &str,
    dictionary: &Dictionary,
    variant: TemplateVariant,
) -> Result<(String, usize)> {
    let mut tree = markup::parse(source)?;
    let replaced = apply_dictionary(&mut tree, dictionary, variant);
    Ok((markup::render(&tree)?, replaced))
}
