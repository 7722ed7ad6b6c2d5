//! 从 Markdown 原文静态提取目录。

use once_cell::sync::Lazy;
use regex::Regex;
use utils_common::TocItem;

use crate::slug::{slugify, SlugCounter};

/// 只匹配 `##` 和 `###` 标题
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{2,3})\s+(.+)$").expect("标题正则无效"));

/// 行内强调和代码标记
static INLINE_MARKERS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_`]").expect("行内标记正则无效"));

/// 解析单行，返回 (级别, 展示文本)
pub fn parse_heading_line(line: &str) -> Option<(u8, String)> {
    let caps = HEADING_RE.captures(line.trim())?;
    let depth = caps[1].len() as u8;
    let text = INLINE_MARKERS_RE.replace_all(&caps[2], "").trim().to_string();
    Some((depth, text))
}

/// 按文档顺序提取 `##` / `###` 标题并分配唯一 ID
///
/// 一级标题和四级及以下标题不进入目录；不匹配的行直接跳过，从不报错。
pub fn extract_toc(markdown: &str) -> Vec<TocItem> {
    let mut counter = SlugCounter::new();

    markdown
        .lines()
        .filter_map(parse_heading_line)
        .map(|(depth, text)| {
            let id = counter.unique(&slugify(&text));
            TocItem { id, text, depth }
        })
        .collect()
}
