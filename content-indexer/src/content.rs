use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use utils_common::reading_time::estimate;
use utils_common::{parse_date, PostMeta};
use walkdir::WalkDir;

use crate::error::ContentError;

/// 默认文章目录（相对站点根目录）
pub const POSTS_DIR: &str = "content/posts";

/// 文章文件扩展名，靠前的优先
const EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// 一篇已加载的文章：元数据加正文
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPost {
    pub meta: PostMeta,
    pub content: String,
    pub path: PathBuf,
}

/// 文件头部的 YAML 元数据
#[derive(Debug, Deserialize)]
struct Frontmatter {
    title: String,
    date: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    cover: String,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    featured: bool,
}

/// 拆分 front matter 与正文，没有 front matter 时返回 `None`
pub fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&raw[start..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// 解析一篇文章的原始文本
pub fn parse_post(slug: &str, raw: &str, path: &Path) -> Result<LoadedPost, ContentError> {
    let (yaml, body) =
        split_front_matter(raw).ok_or_else(|| ContentError::MissingFrontMatter(path.to_path_buf()))?;

    let front: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let date = parse_date(&front.date).ok_or_else(|| ContentError::InvalidDate {
        path: path.to_path_buf(),
        value: front.date.clone(),
    })?;

    let meta = PostMeta {
        slug: slug.to_string(),
        title: front.title,
        excerpt: front.excerpt,
        date,
        cover: front.cover,
        categories: front.categories,
        tags: front.tags,
        author: front.author,
        featured: front.featured,
        reading_time: estimate(body),
    };

    Ok(LoadedPost {
        meta,
        content: body.to_string(),
        path: path.to_path_buf(),
    })
}

fn read_post(slug: &str, path: &Path) -> Result<LoadedPost, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_post(slug, &raw, path)
}

fn post_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    EXTENSIONS.iter().copied().find(|candidate| *candidate == ext)
}

/// 扫描目录下的全部文章，按日期倒序
///
/// 目录不存在时返回空列表；无法解析的文件记录警告后跳过。
/// 同名的 `.mdx` 与 `.md` 只保留 `.mdx`。
pub fn load_posts(dir: &Path) -> Result<Vec<LoadedPost>, ContentError> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "文章目录不存在");
        return Ok(Vec::new());
    }

    let mut files: BTreeMap<String, (&'static str, PathBuf)> = BTreeMap::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let (Some(ext), Some(slug)) = (post_extension(path), path.file_stem().and_then(|s| s.to_str()))
        else {
            continue;
        };

        match files.get(slug) {
            Some((existing, _)) if *existing == EXTENSIONS[0] => {
                tracing::debug!(path = %path.display(), "已存在同名 .mdx，忽略");
            }
            _ => {
                files.insert(slug.to_string(), (ext, path.to_path_buf()));
            }
        }
    }

    let mut posts = Vec::with_capacity(files.len());
    for (slug, (_, path)) in files {
        match read_post(&slug, &path) {
            Ok(post) => posts.push(post),
            Err(e) => tracing::warn!("跳过文章 {}: {}", path.display(), e),
        }
    }

    posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
    tracing::debug!(count = posts.len(), "文章加载完成");
    Ok(posts)
}

/// 按 slug 加载单篇文章，`.mdx` 优先；`Ok(None)` 表示不存在
pub fn load_post(dir: &Path, slug: &str) -> Result<Option<LoadedPost>, ContentError> {
    for ext in EXTENSIONS {
        let path = dir.join(format!("{}.{}", slug, ext));
        if path.is_file() {
            return read_post(slug, &path).map(Some);
        }
    }
    Ok(None)
}
