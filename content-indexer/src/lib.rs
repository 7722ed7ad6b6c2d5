use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use post_query::PostIndexBuilder;
use toc_wasm::extract_toc;

// 导出模块
pub mod anchors;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;

pub use anchors::{anchor_headings, to_render_node, AnchoredHeading};
pub use config::SiteConfig;
pub use content::{load_post, load_posts, parse_post, split_front_matter, LoadedPost, POSTS_DIR};
pub use error::{ConfigError, ContentError, IndexerError};
pub use feed::render_feed;

/// 索引文件名
pub const INDEX_FILE: &str = "posts_index.bin";
/// 订阅源文件名
pub const FEED_FILE: &str = "feed.xml";
/// 每篇文章的目录文件所在子目录
pub const TOC_DIR: &str = "toc";

/// 一次构建的结果
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub posts: usize,
    pub headings: usize,
    pub index_path: PathBuf,
    pub index_bytes: usize,
    pub feed_path: PathBuf,
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), IndexerError> {
    fs::write(path, data).map_err(|source| IndexerError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), IndexerError> {
    fs::create_dir_all(path).map_err(|source| IndexerError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// 读取文章目录，生成索引、每篇文章的目录和订阅源
pub fn build_site(
    source: &Path,
    output: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, IndexerError> {
    let start_time = Instant::now();

    tracing::info!(source = %source.display(), output = %output.display(), "开始生成索引");
    let posts = load_posts(source)?;
    if posts.is_empty() {
        return Err(IndexerError::NoPosts(source.to_path_buf()));
    }

    let toc_dir = output.join(TOC_DIR);
    create_dir(&toc_dir)?;

    let mut builder = PostIndexBuilder::new();
    let mut headings = 0;
    for post in &posts {
        let toc = extract_toc(&post.content);
        headings += toc.len();
        tracing::debug!(slug = %post.meta.slug, headings = toc.len(), "提取目录");

        let path = toc_dir.join(format!("{}.json", post.meta.slug));
        write_file(&path, serde_json::to_string_pretty(&toc)?.as_bytes())?;

        builder.add_post(post.meta.clone());
    }

    let index_path = output.join(INDEX_FILE);
    let index_bytes = builder.save_index(&index_path)?;

    let metas: Vec<_> = posts.iter().map(|post| post.meta.clone()).collect();
    let feed_path = output.join(FEED_FILE);
    write_file(&feed_path, render_feed(config, &metas).as_bytes())?;

    tracing::info!(
        posts = posts.len(),
        headings,
        elapsed_secs = start_time.elapsed().as_secs_f32(),
        "索引生成完成"
    );

    Ok(BuildReport {
        posts: posts.len(),
        headings,
        index_path,
        index_bytes,
        feed_path,
    })
}
