use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 站点配置（`blog.toml`），所有字段都有默认值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub index: IndexSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_site_url")]
    pub url: String,

    #[serde(default = "default_site_name")]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSection {
    /// 博客列表每页条数
    #[serde(default = "default_per_page")]
    pub per_page: usize,

    /// 文章目录
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            posts_dir: default_posts_dir(),
        }
    }
}

fn default_site_url() -> String {
    "https://example.com".to_string()
}

fn default_site_name() -> String {
    "Blog".to_string()
}

fn default_per_page() -> usize {
    post_query::DEFAULT_PER_PAGE
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("content/posts")
}

impl SiteConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取配置文件
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index.per_page == 0 {
            return Err(ConfigError::Validation("index.per_page 必须大于 0".into()));
        }
        if self.site.url.is_empty() {
            return Err(ConfigError::Validation("site.url 不能为空".into()));
        }
        Ok(())
    }

    /// 站点内路径的完整 URL
    pub fn canonical(&self, path: &str) -> String {
        let base = self.site.url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// 文章页 URL
    pub fn post_url(&self, slug: &str) -> String {
        self.canonical(&format!("/blog/{}", slug))
    }
}
