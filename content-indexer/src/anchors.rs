use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, parse_fragment, Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use toc_wasm::{node_text, HeadingIdAssigner, RenderNode, TocItem};

use crate::error::ContentError;

/// 写入了 ID 的标题
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredHeading {
    pub tag: String,
    pub text: String,
    pub id: String,
    /// 取出的目录项文本，走回退路径时为 `None`
    pub toc_text: Option<String>,
}

impl AnchoredHeading {
    /// 目录项与渲染文本不一致
    pub fn is_mismatch(&self) -> bool {
        matches!(&self.toc_text, Some(toc) if *toc != self.text)
    }
}

/// 将 DOM 节点转换为渲染树
pub fn to_render_node(handle: &Handle) -> RenderNode {
    let children = || {
        handle
            .children
            .borrow()
            .iter()
            .map(to_render_node)
            .collect::<Vec<_>>()
    };

    match handle.data {
        NodeData::Text { ref contents } => RenderNode::text(contents.borrow().to_string()),
        NodeData::Element { ref name, .. } => RenderNode::element(name.local.to_string(), children()),
        NodeData::Document => RenderNode::element("#document", children()),
        _ => RenderNode::Empty,
    }
}

fn is_anchor_target(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => {
            let tag: &str = &name.local;
            (tag == "h2" || tag == "h3").then(|| tag.to_string())
        }
        _ => None,
    }
}

// 按文档顺序收集 h2 / h3
fn collect_headings(handle: &Handle, out: &mut Vec<(String, Handle)>) {
    if let Some(tag) = is_anchor_target(handle) {
        out.push((tag, handle.clone()));
    }
    for child in handle.children.borrow().iter() {
        collect_headings(child, out);
    }
}

fn set_id(handle: &Handle, id: &str) {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        let mut attrs = attrs.borrow_mut();
        let value = StrTendril::from_slice(id);

        match attrs.iter_mut().find(|attr| &*attr.name.local == "id") {
            Some(attr) => attr.value = value,
            None => attrs.push(Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from("id")),
                value,
            }),
        }
    }
}

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// 带 doctype 或 `<html>` 的完整页面，其余视为正文片段
fn is_full_document(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    lower.contains("<!doctype") || lower.contains("<html")
}

fn parse_html(html: &str, full_document: bool) -> Result<RcDom, ContentError> {
    let mut input = html.as_bytes();
    let dom = if full_document {
        parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut input)
    } else {
        let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
        parse_fragment(RcDom::default(), Default::default(), context, Vec::new())
            .from_utf8()
            .read_from(&mut input)
    };
    dom.map_err(ContentError::Html)
}

/// 为渲染后的 HTML 中每个 `h2` / `h3` 写入 ID
///
/// ID 按文档顺序从目录队列中取出，与文本是否一致无关；不一致时记录警告。
/// 正文片段按原结构写回，不补全 `<html>` / `<body>`。
pub fn anchor_headings(
    html: &str,
    toc: &[TocItem],
) -> Result<(String, Vec<AnchoredHeading>), ContentError> {
    let full_document = is_full_document(html);
    let dom = parse_html(html, full_document)?;

    let mut targets = Vec::new();
    collect_headings(&dom.document, &mut targets);

    let mut assigner = HeadingIdAssigner::new(toc);
    let mut anchored = Vec::with_capacity(targets.len());

    for (tag, handle) in targets {
        let text = node_text(&to_render_node(&handle)).trim().to_string();
        let (id, entry) = assigner.next_with_entry(&text);
        set_id(&handle, &id);

        let heading = AnchoredHeading {
            tag,
            text,
            id,
            toc_text: entry.map(|item| item.text),
        };
        if heading.is_mismatch() {
            tracing::warn!(
                id = %heading.id,
                rendered = %heading.text,
                toc = heading.toc_text.as_deref().unwrap_or_default(),
                "标题文本与目录不一致"
            );
        }
        anchored.push(heading);
    }

    if assigner.remaining() > 0 {
        tracing::warn!(remaining = assigner.remaining(), "目录项多于渲染出的标题");
    }

    // 片段解析时文档下只有一个 html 根节点，只输出它的子节点
    let root = if full_document {
        Some(dom.document.clone())
    } else {
        dom.document.children.borrow().first().cloned()
    };

    let mut out = Vec::new();
    if let Some(root) = root {
        let root: SerializableHandle = root.into();
        serialize(&mut out, &root, SerializeOpts::default()).map_err(ContentError::Html)?;
    }

    Ok((String::from_utf8_lossy(&out).into_owned(), anchored))
}
