use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use utils_common::compression::{from_compressed_with_max_version, to_compressed};
use utils_common::PostMeta;

use crate::error::QueryError;
use crate::models::PostIndex;
use crate::store::PostStore;
use crate::taxonomy::{all_categories, all_tags};

/// 当前索引格式版本
pub const INDEX_VERSION: [u8; 2] = [1, 0];

/// 文章索引构建器
#[derive(Debug, Default)]
pub struct PostIndexBuilder {
    posts: Vec<PostMeta>,
}

impl PostIndexBuilder {
    /// 创建新的索引构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文章到索引构建器
    pub fn add_post(&mut self, post: PostMeta) {
        self.posts.push(post);
    }

    /// 已添加的文章数量
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// 构建文章索引
    pub fn build_index(&self) -> Result<PostIndex, QueryError> {
        if self.posts.is_empty() {
            tracing::warn!("无法构建索引，没有文章数据");
            return Err(QueryError::EmptyIndex);
        }

        tracing::debug!(posts = self.posts.len(), "开始构建文章索引");

        // 借助仓库校验 slug 唯一并按日期倒序
        let store = PostStore::new(self.posts.clone())?;
        let posts = store.all().to_vec();
        let categories = all_categories(&posts);
        let tags = all_tags(&posts);

        tracing::debug!(
            categories = categories.len(),
            tags = tags.len(),
            "索引构建完成"
        );

        Ok(PostIndex {
            posts,
            categories,
            tags,
            generated_at: Utc::now(),
        })
    }

    /// 编码为压缩的二进制索引
    pub fn encode(&self) -> Result<Vec<u8>, QueryError> {
        let index = self.build_index()?;
        Ok(to_compressed(&index, INDEX_VERSION)?)
    }

    /// 保存索引到文件，返回写入的字节数
    pub fn save_index(&self, path: &Path) -> Result<usize, QueryError> {
        let data = self.encode()?;

        let mut file = File::create(path)?;
        file.write_all(&data)?;

        tracing::info!(path = %path.display(), bytes = data.len(), "文章索引已写入");
        Ok(data.len())
    }
}

impl PostIndex {
    /// 从压缩的二进制数据恢复索引
    pub fn decode(data: &[u8]) -> Result<Self, QueryError> {
        Ok(from_compressed_with_max_version(data, INDEX_VERSION[0])?)
    }

    /// 转换为可查询的仓库
    pub fn into_store(self) -> Result<PostStore, QueryError> {
        Ok(PostStore::new(self.posts)?)
    }
}
