use std::collections::VecDeque;

use utils_common::TocItem;

use crate::slug::{slugify, SlugCounter};

/// 渲染期标题 ID 分配器
///
/// 以静态提取的目录为队列，每渲染一个 `h2` / `h3` 调用一次 [`next`](Self::next)。
/// 队列非空时直接取出预先计算的 ID（不比对文本）；队列耗尽后对渲染文本
/// 重新 slugify，并用独立的计数器去重。每次渲染文档都要新建一个实例。
#[derive(Debug, Clone)]
pub struct HeadingIdAssigner {
    queue: VecDeque<TocItem>,
    fallback: SlugCounter,
}

impl HeadingIdAssigner {
    pub fn new(toc: &[TocItem]) -> Self {
        Self::from(toc.to_vec())
    }

    /// 为下一个渲染出的标题返回 ID
    pub fn next(&mut self, text: &str) -> String {
        self.next_with_entry(text).0
    }

    /// 同 [`next`](Self::next)，同时返回被取出的目录项（走回退路径时为 `None`）
    pub fn next_with_entry(&mut self, text: &str) -> (String, Option<TocItem>) {
        if let Some(entry) = self.queue.pop_front() {
            return (entry.id.clone(), Some(entry));
        }

        let id = self.fallback.unique(&slugify(text));
        tracing::debug!(text, id = %id, "目录队列已耗尽，使用回退 ID");
        (id, None)
    }

    /// 队列中剩余的目录项数量
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl From<Vec<TocItem>> for HeadingIdAssigner {
    fn from(toc: Vec<TocItem>) -> Self {
        Self {
            queue: toc.into(),
            fallback: SlugCounter::new(),
        }
    }
}
