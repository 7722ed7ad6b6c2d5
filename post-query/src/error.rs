use thiserror::Error;
use utils_common::IndexError;

/// 文章仓库错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("文章已存在: {0}")]
    DuplicateSlug(String),

    #[error("文章不存在: {0}")]
    NotFound(String),
}

/// 查询与索引错误
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("未知的排序方式: {0}")]
    UnknownSortMode(String),

    #[error("无法构建索引: 没有文章数据")]
    EmptyIndex,

    #[error("解析查询参数失败: {0}")]
    Params(#[from] serde_json::Error),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("写入索引文件失败: {0}")]
    Io(#[from] std::io::Error),
}
