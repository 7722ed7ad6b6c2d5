use utils_common::PostMeta;

use crate::error::StoreError;

/// 文章仓库 - 由调用方显式持有，生命周期限定在一次请求或一次测试内
///
/// 内部始终按日期倒序保存，日期相同的文章保持插入顺序。
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PostStore {
    posts: Vec<PostMeta>,
}

impl PostStore {
    /// 创建仓库，slug 重复时报错
    pub fn new(posts: Vec<PostMeta>) -> Result<Self, StoreError> {
        let mut store = Self::default();
        for post in posts {
            store.insert(post)?;
        }
        Ok(store)
    }

    /// 全部文章，按日期倒序
    pub fn all(&self) -> &[PostMeta] {
        &self.posts
    }

    /// 按 slug 查找，`None` 表示不存在
    pub fn get(&self, slug: &str) -> Option<&PostMeta> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// 新增文章
    pub fn insert(&mut self, post: PostMeta) -> Result<(), StoreError> {
        if self.get(&post.slug).is_some() {
            return Err(StoreError::DuplicateSlug(post.slug));
        }

        let pos = self
            .posts
            .iter()
            .position(|existing| existing.date < post.date)
            .unwrap_or(self.posts.len());
        self.posts.insert(pos, post);
        Ok(())
    }

    /// 替换同 slug 的文章
    pub fn update(&mut self, post: PostMeta) -> Result<(), StoreError> {
        let pos = self
            .posts
            .iter()
            .position(|existing| existing.slug == post.slug)
            .ok_or_else(|| StoreError::NotFound(post.slug.clone()))?;

        self.posts[pos] = post;
        self.posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(())
    }

    /// 删除文章并返回被删除的记录
    pub fn remove(&mut self, slug: &str) -> Result<PostMeta, StoreError> {
        let pos = self
            .posts
            .iter()
            .position(|post| post.slug == slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))?;

        Ok(self.posts.remove(pos))
    }
}
