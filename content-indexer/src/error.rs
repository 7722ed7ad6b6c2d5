use std::path::PathBuf;

use post_query::QueryError;
use thiserror::Error;

/// 读取文章内容时的错误
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("无法读取文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("遍历目录时出错: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("缺少 front matter: {0}")]
    MissingFrontMatter(PathBuf),

    #[error("解析 front matter 失败 {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("日期格式无效 {path}: {value}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("解析HTML时出错: {0}")]
    Html(#[source] std::io::Error),
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("配置无效: {0}")]
    Validation(String),
}

/// 命令行工具的顶层错误
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("无法写入 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("没有找到有效文章: {0}")]
    NoPosts(PathBuf),

    #[error("缺少参数: --{0}")]
    MissingArgument(&'static str),
}
