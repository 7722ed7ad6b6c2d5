use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::reading_time::ReadingTime;

/// 文章元数据 - 查询引擎的只读输入
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PostMeta {
    /// 文章唯一标识符（文件名去掉扩展名）
    pub slug: String,
    /// 文章标题
    pub title: String,
    /// 文章摘要
    #[serde(default)]
    pub excerpt: String,
    /// 发布日期
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    /// 封面图片路径
    #[serde(default)]
    pub cover: String,
    /// 分类列表
    #[serde(default)]
    pub categories: Vec<String>,
    /// 标签列表
    #[serde(default)]
    pub tags: Vec<String>,
    /// 作者
    #[serde(default)]
    pub author: String,
    /// 是否为精选文章
    #[serde(default)]
    pub featured: bool,
    /// 阅读时间估算
    #[serde(default)]
    pub reading_time: ReadingTime,
}

impl PostMeta {
    /// 字数，作为"热门"排序的替代指标
    pub fn word_count(&self) -> usize {
        self.reading_time.words
    }
}

/// 目录项 - 一个 `##` / `###` 标题的描述
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TocItem {
    /// 文档内唯一的锚点ID
    pub id: String,
    /// 去掉行内标记后的标题文本
    pub text: String,
    /// 标题级别（2 或 3）
    pub depth: u8,
}

/// 解析日期字符串，支持 RFC 3339 和纯日期（按 UTC 零点处理）
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// serde 辅助函数：宽松解析日期
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("无效的日期: {}", raw)))
}
