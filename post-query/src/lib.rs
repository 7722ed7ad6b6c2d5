use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::console;

// 导出模块
pub mod builder;
pub mod error;
pub mod models;
pub mod query;
pub mod store;
pub mod taxonomy;

pub use builder::PostIndexBuilder;
pub use error::{QueryError, StoreError};
pub use models::{Page, PostIndex, QueryParams, SortMode, DEFAULT_PER_PAGE};
pub use query::{
    execute, filter_by_category, filter_by_tags, paginate, search_posts, sort_posts, total_pages,
    QueryState,
};
pub use store::PostStore;
pub use taxonomy::{all_categories, all_tags, featured_posts, popular_categories, related_posts};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let message = format!("{}: {}", context, err);
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn string_array(values: &[String]) -> Array {
    values.iter().map(|v| JsValue::from_str(v)).collect()
}

/// 文章查询的JS接口 - 每个实例拥有自己的文章仓库
#[wasm_bindgen]
pub struct PostQueryJS {
    store: PostStore,
    categories: Vec<String>,
    tags: Vec<String>,
}

#[wasm_bindgen]
impl PostQueryJS {
    /// 从压缩索引数据创建查询实例
    #[wasm_bindgen(constructor)]
    pub fn new(index_data: &[u8]) -> Result<PostQueryJS, JsValue> {
        console_error_panic_hook::set_once();

        let index = PostIndex::decode(index_data).map_err(|e| to_js_error("解析索引失败", e))?;
        let categories = index.categories.clone();
        let tags = index.tags.clone();
        let store = index.into_store().map_err(|e| to_js_error("加载文章失败", e))?;

        Ok(Self {
            store,
            categories,
            tags,
        })
    }

    /// 执行查询，参数为 JSON 字符串
    pub fn query(&self, params_json: &str) -> Result<JsValue, JsValue> {
        let params = QueryParams::from_json(params_json).map_err(|e| to_js_error("参数无效", e))?;

        let page = execute(self.store.all(), params).map_err(|e| to_js_error("查询失败", e))?;

        serde_wasm_bindgen::to_value(&page).map_err(|e| to_js_error("序列化结果失败", e))
    }

    /// 按 slug 获取文章，不存在时返回 null
    #[wasm_bindgen(js_name = getPost)]
    pub fn get_post(&self, slug: &str) -> Result<JsValue, JsValue> {
        match self.store.get(slug) {
            Some(post) => {
                serde_wasm_bindgen::to_value(post).map_err(|e| to_js_error("序列化文章失败", e))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// 获取所有分类
    pub fn categories(&self) -> Array {
        string_array(&self.categories)
    }

    /// 获取所有标签
    pub fn tags(&self) -> Array {
        string_array(&self.tags)
    }

    /// 获取热门分类
    #[wasm_bindgen(js_name = popularCategories)]
    pub fn popular_categories(&self, limit: usize) -> Array {
        string_array(&popular_categories(self.store.all(), limit))
    }

    /// 获取精选文章
    pub fn featured(&self, limit: usize) -> Result<JsValue, JsValue> {
        let posts = featured_posts(self.store.all(), limit);
        serde_wasm_bindgen::to_value(&posts).map_err(|e| to_js_error("序列化文章失败", e))
    }

    /// 获取相关文章，slug 不存在时返回空数组
    pub fn related(&self, slug: &str, limit: usize) -> Result<JsValue, JsValue> {
        let posts = match self.store.get(slug) {
            Some(current) => related_posts(self.store.all(), current, limit),
            None => Vec::new(),
        };
        serde_wasm_bindgen::to_value(&posts).map_err(|e| to_js_error("序列化文章失败", e))
    }
}
