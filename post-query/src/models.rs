use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utils_common::PostMeta;

use crate::error::QueryError;

/// 每页默认条数（博客首页网格 3x3）
pub const DEFAULT_PER_PAGE: usize = 9;

/// 排序方式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// 按发布日期倒序
    #[default]
    Latest,
    /// 按字数倒序。没有真实的浏览量数据，字数只是热门程度的近似替代。
    Popular,
}

impl FromStr for SortMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortMode::Latest),
            "popular" => Ok(SortMode::Popular),
            other => Err(QueryError::UnknownSortMode(other.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Latest => write!(f, "latest"),
            SortMode::Popular => write!(f, "popular"),
        }
    }
}

/// 查询参数 - 客户端传递的筛选条件，字段均可省略
#[derive(Deserialize, Debug, Default, Clone)]
pub struct QueryParams {
    /// 搜索关键词
    pub query: Option<String>,
    /// 分类，"all" 表示不过滤
    pub category: Option<String>,
    /// 标签（需全部命中）
    pub tags: Option<Vec<String>>,
    /// 排序方式: "latest" 或 "popular"
    pub sort: Option<String>,
    /// 当前页码，从 1 开始
    pub page: Option<usize>,
    /// 每页条数
    pub per_page: Option<usize>,
}

impl QueryParams {
    /// 解析客户端传来的 JSON 参数
    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 分页结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page {
    /// 当前页的文章
    pub items: Vec<PostMeta>,
    /// 分页前的结果总数
    pub total: usize,
    /// 当前页码
    pub page: usize,
    /// 每页条数
    pub per_page: usize,
    /// 总页数，至少为 1
    pub total_pages: usize,
}

/// 持久化的文章索引
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostIndex {
    /// 按日期倒序排列的全部文章
    pub posts: Vec<PostMeta>,
    /// 全部分类（升序）
    pub categories: Vec<String>,
    /// 全部标签（升序）
    pub tags: Vec<String>,
    /// 索引生成时间
    pub generated_at: DateTime<Utc>,
}
