//! 锚点 slug 生成与文档内去重。

use std::collections::{HashMap, HashSet};

/// 将任意文本转换为适合 URL 片段的 slug
///
/// 转为小写，连续的非字母数字字符折叠为一个 `-`，并去掉首尾的 `-`。
/// 对同一输入确定且幂等：`slugify(&slugify(s)) == slugify(s)`。
///
/// ```
/// use toc_wasm::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        for lower in c.to_lowercase() {
            if lower.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(lower);
            } else {
                pending_dash = true;
            }
        }
    }

    slug
}

/// 单个文档（或单次渲染）范围内的 ID 计数器
///
/// 某个基础 ID 第一次出现时原样使用，之后第 n 次重复追加 `-n`
/// （第一次重复为 `-1`）。生成的 ID 若与本范围内已发出的 ID 冲突，
/// 计数继续递增直到不冲突。
#[derive(Debug, Default, Clone)]
pub struct SlugCounter {
    /// 基础 ID -> 已出现次数
    seen: HashMap<String, usize>,
    /// 已发出的全部 ID
    issued: HashSet<String>,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为基础 ID 分配一个本范围内唯一的 ID
    pub fn unique(&mut self, base: &str) -> String {
        let mut count = self.seen.get(base).copied().unwrap_or(0);
        let mut candidate = suffixed(base, count);

        while self.issued.contains(&candidate) {
            count += 1;
            candidate = suffixed(base, count);
        }

        self.seen.insert(base.to_string(), count + 1);
        self.issued.insert(candidate.clone());
        candidate
    }

    /// 已发出的 ID 数量
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

fn suffixed(base: &str, count: usize) -> String {
    if count == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, count)
    }
}
