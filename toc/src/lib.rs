use wasm_bindgen::prelude::*;
use web_sys::console;

pub mod assign;
pub mod extract;
pub mod render;
pub mod slug;

pub use assign::HeadingIdAssigner;
pub use extract::{extract_toc, parse_heading_line};
pub use render::{escape_html, node_text, render_toc_html, RenderNode};
pub use slug::{slugify, SlugCounter};
pub use utils_common::TocItem;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// WASM入口点 - 提取目录
#[wasm_bindgen(js_name = extractToc)]
pub fn extract_toc_js(markdown: &str) -> Result<JsValue, JsValue> {
    // 捕获Rust panic并转换为JS错误
    console_error_panic_hook::set_once();

    let toc = extract_toc(markdown);
    serde_wasm_bindgen::to_value(&toc)
        .map_err(|e| JsValue::from_str(&format!("序列化目录失败: {}", e)))
}

/// WASM入口点 - 渲染目录导航 HTML
#[wasm_bindgen(js_name = renderToc)]
pub fn render_toc_js(markdown: &str) -> String {
    render_toc_html(&extract_toc(markdown))
}

/// WASM入口点 - 生成 slug
#[wasm_bindgen(js_name = slugify)]
pub fn slugify_js(text: &str) -> String {
    slugify(text)
}

/// 标题 ID 分配器的 JS 接口，每次渲染文档新建一个
#[wasm_bindgen]
pub struct HeadingIdAssignerJS {
    inner: HeadingIdAssigner,
}

#[wasm_bindgen]
impl HeadingIdAssignerJS {
    /// 从目录 JSON（`[{id, text, depth}]`）创建
    #[wasm_bindgen(constructor)]
    pub fn new(toc_json: &str) -> Result<HeadingIdAssignerJS, JsValue> {
        console_error_panic_hook::set_once();

        let toc: Vec<TocItem> = serde_json::from_str(toc_json).map_err(|e| {
            let message = format!("解析目录失败: {}", e);
            console::log_1(&JsValue::from_str(&message));
            JsValue::from_str(&message)
        })?;

        Ok(Self {
            inner: HeadingIdAssigner::from(toc),
        })
    }

    /// 直接从 Markdown 原文创建
    #[wasm_bindgen(js_name = fromMarkdown)]
    pub fn from_markdown(markdown: &str) -> HeadingIdAssignerJS {
        Self {
            inner: HeadingIdAssigner::from(extract_toc(markdown)),
        }
    }

    /// 为下一个渲染出的标题分配 ID
    pub fn next(&mut self, text: &str) -> String {
        self.inner.next(text)
    }

    /// 以内容树 JSON 为输入，先拼接可见文本再分配 ID
    #[wasm_bindgen(js_name = nextNode)]
    pub fn next_node(&mut self, node_json: &str) -> Result<String, JsValue> {
        let node: RenderNode = serde_json::from_str(node_json)
            .map_err(|e| JsValue::from_str(&format!("解析内容树失败: {}", e)))?;
        Ok(self.inner.next(&node_text(&node)))
    }

    /// 剩余的预计算 ID 数量
    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}
