use serde::{Deserialize, Serialize};
use utils_common::TocItem;

/// 渲染期的内容树节点
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderNode {
    /// 文本叶子
    Text { value: String },
    /// 数字叶子
    Number { value: f64 },
    /// 元素节点
    Element {
        tag: String,
        #[serde(default)]
        children: Vec<RenderNode>,
    },
    /// 不可见节点（注释、空插槽等）
    Empty,
}

impl RenderNode {
    pub fn text(value: impl Into<String>) -> Self {
        RenderNode::Text {
            value: value.into(),
        }
    }

    pub fn element(tag: impl Into<String>, children: Vec<RenderNode>) -> Self {
        RenderNode::Element {
            tag: tag.into(),
            children,
        }
    }
}

/// 超出此范围的整数按浮点格式输出，避免截断
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 深度优先、从左到右拼接所有文本和数字叶子
pub fn node_text(node: &RenderNode) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &RenderNode, out: &mut String) {
    match node {
        RenderNode::Text { value } => out.push_str(value),
        RenderNode::Number { value } => {
            if value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER {
                out.push_str(&format!("{}", *value as i64));
            } else {
                out.push_str(&value.to_string());
            }
        }
        RenderNode::Element { children, .. } => {
            for child in children {
                collect_text(child, out);
            }
        }
        RenderNode::Empty => {}
    }
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 将目录渲染为导航 HTML，没有标题时返回空字符串
pub fn render_toc_html(items: &[TocItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut html = String::from("<nav class=\"toc\"><ul>");
    for item in items {
        html.push_str(&format!(
            "<li class=\"toc-depth-{}\"><a href=\"#{}\">{}</a></li>",
            item.depth,
            escape_html(&item.id),
            escape_html(&item.text)
        ));
    }
    html.push_str("</ul></nav>");
    html
}
