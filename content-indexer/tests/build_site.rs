use std::fs;
use std::path::Path;

use content_indexer::{
    anchor_headings, build_site, load_post, load_posts, IndexerError, SiteConfig, FEED_FILE,
    INDEX_FILE, TOC_DIR,
};
use post_query::{execute, PostIndex, QueryParams};
use toc_wasm::{extract_toc, TocItem};

fn write_post(dir: &Path, file: &str, front: &str, body: &str) {
    fs::write(dir.join(file), format!("---\n{}---\n{}", front, body)).unwrap();
}

fn sample_posts(dir: &Path) {
    write_post(
        dir,
        "getting-started.md",
        "title: Getting Started\ndate: 2024-01-10\ncategories: [Tech]\ntags: [rust]\nexcerpt: First steps\n",
        "## Setup\ninstall things\n### Details\nmore words here\n## Setup\nagain\n",
    );
    write_post(
        dir,
        "design-notes.mdx",
        "title: Design Notes\ndate: 2024-03-05\ncategories: [Design]\ntags: [css, rust]\nfeatured: true\n",
        "## Colors\nred green blue yellow purple orange\n",
    );
    write_post(
        dir,
        "broken.md",
        "title: Broken\ndate: not-a-date\n",
        "## Never\n",
    );
    fs::write(dir.join("notes.txt"), "ignored").unwrap();
}

#[test]
fn loads_posts_newest_first_and_skips_broken() {
    let dir = tempfile::tempdir().unwrap();
    sample_posts(dir.path());

    let posts = load_posts(dir.path()).unwrap();
    let slugs: Vec<_> = posts.iter().map(|p| p.meta.slug.as_str()).collect();

    assert_eq!(slugs, ["design-notes", "getting-started"]);
    assert!(posts[0].meta.featured);
    assert_eq!(posts[1].meta.excerpt, "First steps");
}

#[test]
fn missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let posts = load_posts(&dir.path().join("nope")).unwrap();
    assert!(posts.is_empty());
}

#[test]
fn mdx_wins_over_md() {
    let dir = tempfile::tempdir().unwrap();
    write_post(dir.path(), "same.md", "title: From MD\ndate: 2024-01-01\n", "body");
    write_post(dir.path(), "same.mdx", "title: From MDX\ndate: 2024-01-01\n", "body");

    let posts = load_posts(dir.path()).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].meta.title, "From MDX");

    let single = load_post(dir.path(), "same").unwrap().unwrap();
    assert_eq!(single.meta.title, "From MDX");
    assert!(load_post(dir.path(), "missing").unwrap().is_none());
}

#[test]
fn build_writes_index_toc_and_feed() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    sample_posts(source.path());

    let mut config = SiteConfig::default();
    config.site.url = "https://noah.dev".into();

    let report = build_site(source.path(), output.path(), &config).unwrap();
    assert_eq!(report.posts, 2);
    assert_eq!(report.headings, 4);

    let data = fs::read(output.path().join(INDEX_FILE)).unwrap();
    assert_eq!(data.len(), report.index_bytes);
    let index = PostIndex::decode(&data).unwrap();
    assert_eq!(index.categories, ["Design", "Tech"]);
    assert_eq!(index.tags, ["css", "rust"]);

    let page = execute(
        &index.posts,
        QueryParams {
            tags: Some(vec!["rust".into()]),
            sort: Some("popular".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].slug, "getting-started");

    let toc_json = fs::read_to_string(output.path().join(TOC_DIR).join("getting-started.json")).unwrap();
    let toc: Vec<TocItem> = serde_json::from_str(&toc_json).unwrap();
    let ids: Vec<_> = toc.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["setup", "details", "setup-1"]);
    assert!(!output.path().join(TOC_DIR).join("broken.json").exists());

    let feed = fs::read_to_string(output.path().join(FEED_FILE)).unwrap();
    assert!(feed.contains("<link>https://noah.dev/blog/design-notes</link>"));
    assert_eq!(feed.matches("<item>").count(), 2);
}

#[test]
fn build_without_posts_fails() {
    let source = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let result = build_site(source.path(), output.path(), &SiteConfig::default());
    assert!(matches!(result, Err(IndexerError::NoPosts(_))));
}

#[test]
fn anchors_rendered_post() {
    let dir = tempfile::tempdir().unwrap();
    sample_posts(dir.path());
    let post = load_post(dir.path(), "getting-started").unwrap().unwrap();

    let html = "<main><h2>Setup</h2><h3>Details</h3><h2>Setup</h2><h2>Appendix</h2></main>";
    let (out, headings) = anchor_headings(html, &extract_toc(&post.content)).unwrap();

    let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["setup", "details", "setup-1", "appendix"]);
    assert!(out.contains("<h2 id=\"appendix\">Appendix</h2>"));
}
