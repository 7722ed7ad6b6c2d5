use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use utils_common::PostMeta;

/// 按字母顺序（忽略大小写）去重排序
fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = values.filter(|v| seen.insert(*v)).cloned().collect();
    unique.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    unique
}

/// 所有分类
pub fn all_categories(posts: &[PostMeta]) -> Vec<String> {
    sorted_unique(posts.iter().flat_map(|post| post.categories.iter()))
}

/// 所有标签
pub fn all_tags(posts: &[PostMeta]) -> Vec<String> {
    sorted_unique(posts.iter().flat_map(|post| post.tags.iter()))
}

/// 按文章数量倒序的热门分类，数量相同时保持首次出现的顺序
pub fn popular_categories(posts: &[PostMeta], limit: usize) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for category in posts.iter().flat_map(|post| post.categories.iter()) {
        match positions.get(category.as_str()) {
            Some(&pos) => order[pos].1 += 1,
            None => {
                positions.insert(category, order.len());
                order.push((category.clone(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(limit).map(|(category, _)| category).collect()
}

/// 精选文章，不足 `limit` 时用非精选文章按原顺序补齐
pub fn featured_posts(posts: &[PostMeta], limit: usize) -> Vec<PostMeta> {
    let mut featured: Vec<PostMeta> = posts
        .iter()
        .filter(|post| post.featured)
        .take(limit)
        .cloned()
        .collect();

    if featured.len() < limit {
        let missing = limit - featured.len();
        featured.extend(posts.iter().filter(|post| !post.featured).take(missing).cloned());
    }

    featured
}

/// 相关度：共同标签计 2 分，共同分类计 1 分
fn relatedness(post: &PostMeta, current: &PostMeta) -> usize {
    let shared_tags = post.tags.iter().filter(|t| current.tags.contains(t)).count();
    let shared_categories = post
        .categories
        .iter()
        .filter(|c| current.categories.contains(c))
        .count();
    shared_tags * 2 + shared_categories
}

/// 相关文章：按相关度倒序，其次按日期倒序
pub fn related_posts(posts: &[PostMeta], current: &PostMeta, limit: usize) -> Vec<PostMeta> {
    let mut scored: Vec<(usize, &PostMeta)> = posts
        .iter()
        .filter(|post| post.slug != current.slug)
        .map(|post| (relatedness(post, current), post))
        .collect();

    scored.sort_by(|a, b| match b.0.cmp(&a.0) {
        Ordering::Equal => b.1.date.cmp(&a.1.date),
        other => other,
    });

    scored.into_iter().take(limit).map(|(_, post)| post.clone()).collect()
}
