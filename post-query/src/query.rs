//! 文章查询引擎：搜索 → 分类过滤 → 标签过滤 → 排序 → 分页。
//!
//! 所有函数都是纯函数，不修改输入集合。

use utils_common::PostMeta;

use crate::error::QueryError;
use crate::models::{Page, QueryParams, SortMode, DEFAULT_PER_PAGE};

/// 拼接标题、摘要、标签和分类作为搜索文本（小写）
fn haystack(post: &PostMeta) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2 + post.tags.len() + post.categories.len());
    parts.push(&post.title);
    parts.push(&post.excerpt);
    parts.extend(post.tags.iter().map(String::as_str));
    parts.extend(post.categories.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// 不区分大小写的子串搜索，空白查询原样返回
pub fn search_posts(posts: &[PostMeta], query: &str) -> Vec<PostMeta> {
    let value = query.trim().to_lowercase();

    if value.is_empty() {
        return posts.to_vec();
    }

    posts
        .iter()
        .filter(|post| haystack(post).contains(&value))
        .cloned()
        .collect()
}

/// 按分类过滤（区分大小写），`None` 或空字符串不过滤
pub fn filter_by_category(posts: &[PostMeta], category: Option<&str>) -> Vec<PostMeta> {
    match category {
        Some(category) if !category.is_empty() => posts
            .iter()
            .filter(|post| post.categories.iter().any(|c| c == category))
            .cloned()
            .collect(),
        _ => posts.to_vec(),
    }
}

/// 按标签过滤，文章必须包含全部标签
pub fn filter_by_tags(posts: &[PostMeta], tags: &[String]) -> Vec<PostMeta> {
    if tags.is_empty() {
        return posts.to_vec();
    }

    posts
        .iter()
        .filter(|post| tags.iter().all(|tag| post.tags.contains(tag)))
        .cloned()
        .collect()
}

/// 稳定排序，返回新的序列
pub fn sort_posts(posts: &[PostMeta], mode: SortMode) -> Vec<PostMeta> {
    let mut sorted = posts.to_vec();

    match mode {
        SortMode::Latest => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortMode::Popular => sorted.sort_by(|a, b| b.word_count().cmp(&a.word_count())),
    }

    sorted
}

/// 总页数，至少为 1
pub fn total_pages(total: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total.div_ceil(per_page).max(1)
}

/// 取第 `page` 页（从 1 开始），越界返回空页而不是报错
pub fn paginate(posts: &[PostMeta], page: usize, per_page: usize) -> Page {
    let total = posts.len();

    let items = if page == 0 || per_page == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(per_page).min(total);
        let end = start.saturating_add(per_page).min(total);
        posts[start..end].to_vec()
    };

    Page {
        items,
        total,
        page,
        per_page,
        total_pages: total_pages(total, per_page),
    }
}

/// 调用方持有的查询状态
///
/// 修改任何过滤、排序或每页条数都会把页码重置为 1，
/// 避免结果变少后停留在不存在的页。
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    query: String,
    category: Option<String>,
    selected_tags: Vec<String>,
    sort: SortMode,
    page: usize,
    per_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            selected_tags: Vec::new(),
            sort: SortMode::Latest,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从客户端参数构建状态，"all" 分类视为不过滤
    pub fn from_params(params: QueryParams) -> Result<Self, QueryError> {
        let mut state = Self::new();

        if let Some(per_page) = params.per_page {
            state.set_per_page(per_page);
        }
        if let Some(query) = params.query {
            state.set_query(query);
        }
        state.set_category(params.category.filter(|c| c != "all"));
        if let Some(tags) = params.tags {
            state.set_tags(tags);
        }
        if let Some(sort) = params.sort {
            state.set_sort(sort.parse()?);
        }
        if let Some(page) = params.page {
            state.set_page(page);
        }

        Ok(state)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.selected_tags = tags;
        self.page = 1;
    }

    /// 已选中则取消，否则追加到末尾
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page;
        self.page = 1;
    }

    /// 翻页不重置其它状态
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// 过滤并排序后的完整结果（分页前）
    pub fn filtered(&self, posts: &[PostMeta]) -> Vec<PostMeta> {
        let by_search = search_posts(posts, &self.query);
        let by_category = filter_by_category(&by_search, self.category());
        let by_tags = filter_by_tags(&by_category, &self.selected_tags);
        sort_posts(&by_tags, self.sort)
    }

    /// 执行完整查询并返回当前页
    pub fn run(&self, posts: &[PostMeta]) -> Page {
        paginate(&self.filtered(posts), self.page, self.per_page)
    }
}

/// 解析参数并执行查询
pub fn execute(posts: &[PostMeta], params: QueryParams) -> Result<Page, QueryError> {
    Ok(QueryState::from_params(params)?.run(posts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, post_with};
    use proptest::prelude::*;

    fn slugs(posts: &[PostMeta]) -> Vec<&str> {
        posts.iter().map(|p| p.slug.as_str()).collect()
    }

    fn intro_posts() -> Vec<PostMeta> {
        vec![
            post_with("intro-x", "Intro to X", "2024-01-01", &["js"], &[], 300),
            post_with("intro-y", "Intro to Y", "2024-02-01", &["js", "ts"], &[], 800),
        ]
    }

    #[test]
    fn end_to_end_intro_scenario() {
        let posts = intro_posts();

        let found = search_posts(&posts, "intro");
        assert_eq!(slugs(&found), ["intro-x", "intro-y"]);

        let tagged = filter_by_tags(&found, &["ts".to_string()]);
        assert_eq!(slugs(&tagged), ["intro-y"]);

        let sorted = sort_posts(&tagged, SortMode::Latest);
        assert_eq!(sorted, tagged);
    }

    #[test]
    fn blank_query_is_identity() {
        let posts = intro_posts();
        assert_eq!(search_posts(&posts, ""), posts);
        assert_eq!(search_posts(&posts, "   \t"), posts);
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let posts = intro_posts();
        assert_eq!(slugs(&search_posts(&posts, "  INTRO TO y ")), ["intro-y"]);
    }

    #[test]
    fn search_matches_tags_categories_and_excerpt() {
        let mut posts = vec![
            post_with("a", "Alpha", "2024-01-01", &["rust"], &["Systems"], 10),
            post_with("b", "Beta", "2024-01-02", &[], &["Design"], 10),
        ];
        posts[1].excerpt = "Notes on typography".to_string();

        assert_eq!(slugs(&search_posts(&posts, "rust")), ["a"]);
        assert_eq!(slugs(&search_posts(&posts, "systems")), ["a"]);
        assert_eq!(slugs(&search_posts(&posts, "typography")), ["b"]);
        // 各字段之间用空格连接
        assert_eq!(slugs(&search_posts(&posts, "alpha rust")), ["a"]);
        assert!(search_posts(&posts, "nothing here").is_empty());
    }

    #[test]
    fn category_filter_is_exact() {
        let posts = vec![
            post_with("a", "A", "2024-01-01", &[], &["Tech"], 10),
            post_with("b", "B", "2024-01-02", &[], &["tech"], 10),
            post_with("c", "C", "2024-01-03", &[], &[], 10),
        ];

        assert_eq!(slugs(&filter_by_category(&posts, Some("Tech"))), ["a"]);
        assert_eq!(filter_by_category(&posts, None), posts);
        assert_eq!(filter_by_category(&posts, Some("")), posts);
    }

    #[test]
    fn tag_filter_requires_every_tag() {
        let posts = vec![
            post_with("a", "A", "2024-01-01", &["js"], &[], 10),
            post_with("b", "B", "2024-01-02", &["js", "ts"], &[], 10),
            post_with("c", "C", "2024-01-03", &["ts"], &[], 10),
        ];

        let both = filter_by_tags(&posts, &["js".to_string(), "ts".to_string()]);
        assert_eq!(slugs(&both), ["b"]);
        assert_eq!(filter_by_tags(&posts, &[]), posts);
    }

    #[test]
    fn popular_sort_uses_word_count_and_is_stable() {
        let posts = vec![
            post_with("short", "S", "2024-01-03", &[], &[], 100),
            post_with("long", "L", "2024-01-01", &[], &[], 900),
            post_with("tie", "T", "2024-01-02", &[], &[], 100),
        ];

        let sorted = sort_posts(&posts, SortMode::Popular);
        assert_eq!(slugs(&sorted), ["long", "short", "tie"]);
        // 输入保持不变
        assert_eq!(slugs(&posts), ["short", "long", "tie"]);
    }

    #[test]
    fn latest_sort_keeps_order_of_equal_dates() {
        let posts = vec![
            post("first", "2024-01-01"),
            post("newest", "2024-03-01"),
            post("second", "2024-01-01"),
        ];

        assert_eq!(slugs(&sort_posts(&posts, SortMode::Latest)), ["newest", "first", "second"]);
    }

    #[test]
    fn paginate_slices_and_reports_total() {
        let posts: Vec<_> = (1..=5).map(|i| post(&format!("p{}", i), "2024-01-01")).collect();

        let second = paginate(&posts, 2, 2);
        assert_eq!(slugs(&second.items), ["p3", "p4"]);
        assert_eq!(second.total, 5);
        assert_eq!(second.total_pages, 3);

        let last = paginate(&posts, 3, 2);
        assert_eq!(slugs(&last.items), ["p5"]);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let posts = vec![post("only", "2024-01-01")];

        assert!(paginate(&posts, 5, 9).items.is_empty());
        assert!(paginate(&posts, 0, 9).items.is_empty());
        assert!(paginate(&posts, 1, 0).items.is_empty());
        assert_eq!(paginate(&posts, 5, 9).total, 1);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn changing_filters_resets_page() {
        let mut state = QueryState::new();

        state.set_page(4);
        state.set_query("rust");
        assert_eq!(state.page(), 1);

        state.set_page(3);
        state.toggle_tag("wasm");
        assert_eq!(state.page(), 1);
        assert_eq!(state.selected_tags(), ["wasm".to_string()]);

        state.set_page(2);
        state.toggle_tag("wasm");
        assert!(state.selected_tags().is_empty());
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_sort(SortMode::Popular);
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_category(Some("Tech".into()));
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_per_page(3);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn run_composes_in_order() {
        let posts = vec![
            post_with("a", "Rust basics", "2024-01-01", &["rust"], &["Tech"], 500),
            post_with("b", "Rust async", "2024-03-01", &["rust", "async"], &["Tech"], 200),
            post_with("c", "Rust design", "2024-02-01", &["rust"], &["Design"], 900),
            post_with("d", "Go basics", "2024-04-01", &["go"], &["Tech"], 100),
        ];

        let mut state = QueryState::new();
        state.set_query("rust");
        state.set_category(Some("Tech".into()));
        let page = state.run(&posts);
        assert_eq!(slugs(&page.items), ["b", "a"]);
        assert_eq!(page.total, 2);

        state.set_sort(SortMode::Popular);
        assert_eq!(slugs(&state.run(&posts).items), ["a", "b"]);
    }

    #[test]
    fn execute_parses_params() {
        let posts = intro_posts();
        let params: QueryParams = serde_json::from_str(
            r#"{"query":"intro","category":"all","tags":["js"],"sort":"popular","page":1,"per_page":1}"#,
        )
        .unwrap();

        let page = execute(&posts, params).unwrap();
        assert_eq!(slugs(&page.items), ["intro-y"]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn execute_rejects_unknown_sort() {
        let params = QueryParams {
            sort: Some("oldest".into()),
            ..Default::default()
        };
        assert!(matches!(
            execute(&[], params),
            Err(QueryError::UnknownSortMode(s)) if s == "oldest"
        ));
    }

    fn arb_posts() -> impl Strategy<Value = Vec<PostMeta>> {
        let tags = proptest::sample::subsequence(vec!["js", "ts", "rust", "go"], 0..=4);
        let cats = proptest::sample::subsequence(vec!["Tech", "Life"], 0..=2);
        proptest::collection::vec(
            (
                "[a-z ]{1,16}",
                "[a-z ]{0,12}",
                1u32..=28,
                1u32..=12,
                tags,
                cats,
                0usize..2000,
            ),
            0..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (title, excerpt, day, month, tags, cats, words))| {
                    let mut post = post_with(
                        &format!("post-{}", i),
                        &title,
                        &format!("2024-{:02}-{:02}", month, day),
                        &tags,
                        &cats,
                        words,
                    );
                    post.excerpt = excerpt;
                    post
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn search_keeps_exactly_matching_posts(posts in arb_posts(), q in "[a-z]{1,3}") {
            let found = search_posts(&posts, &q);
            for post in &posts {
                let matches = post.title.to_lowercase().contains(&q)
                    || post.excerpt.to_lowercase().contains(&q)
                    || post.tags.iter().any(|t| t.to_lowercase().contains(&q))
                    || post.categories.iter().any(|c| c.to_lowercase().contains(&q));
                prop_assert_eq!(matches, found.iter().any(|p| p.slug == post.slug));
            }
        }

        #[test]
        fn sorts_are_non_increasing(posts in arb_posts()) {
            let latest = sort_posts(&posts, SortMode::Latest);
            prop_assert!(latest.windows(2).all(|w| w[0].date >= w[1].date));

            let popular = sort_posts(&posts, SortMode::Popular);
            prop_assert!(popular.windows(2).all(|w| w[0].word_count() >= w[1].word_count()));
        }

        #[test]
        fn tag_filter_is_sound(posts in arb_posts()) {
            let wanted = vec!["js".to_string(), "ts".to_string()];
            for post in filter_by_tags(&posts, &wanted) {
                prop_assert!(wanted.iter().all(|t| post.tags.contains(t)));
            }
        }

        #[test]
        fn pages_reconstruct_input(posts in arb_posts(), per_page in 1usize..8) {
            let total = paginate(&posts, 1, per_page).total;
            prop_assert_eq!(total, posts.len());

            let pages = total_pages(total, per_page);
            let rebuilt: Vec<PostMeta> = (1..=pages)
                .flat_map(|page| paginate(&posts, page, per_page).items)
                .collect();
            prop_assert_eq!(rebuilt, posts);
        }
    }
}
