use chrono::{DateTime, Utc};
use toc_wasm::escape_html;
use utils_common::PostMeta;

use crate::config::SiteConfig;

/// 包裹为 CDATA，正文中的 `]]>` 拆成两段
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn rfc822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// 生成 RSS 2.0 订阅源，文章按传入顺序输出
pub fn render_feed(config: &SiteConfig, posts: &[PostMeta]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n<channel>\n");
    xml.push_str(&format!("<title>{}</title>\n", cdata(&config.site.name)));
    xml.push_str(&format!("<link>{}</link>\n", escape_html(&config.canonical("/"))));
    xml.push_str(&format!(
        "<description>{}</description>\n",
        cdata(&config.site.description)
    ));

    if let Some(latest) = posts.iter().map(|post| post.date).max() {
        xml.push_str(&format!("<lastBuildDate>{}</lastBuildDate>\n", rfc822(&latest)));
    }

    for post in posts {
        let url = escape_html(&config.post_url(&post.slug));
        xml.push_str("<item>\n");
        xml.push_str(&format!("<title>{}</title>\n", cdata(&post.title)));
        xml.push_str(&format!("<link>{}</link>\n", url));
        xml.push_str(&format!("<guid>{}</guid>\n", url));
        xml.push_str(&format!("<pubDate>{}</pubDate>\n", rfc822(&post.date)));
        xml.push_str(&format!("<description>{}</description>\n", cdata(&post.excerpt)));
        for category in &post.categories {
            xml.push_str(&format!("<category>{}</category>\n", cdata(category)));
        }
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}
