//! HTML pages rendered into a single layout.

use chrono::{DateTime, Utc};
use htmlescape::{encode_attribute, encode_minimal};

use crate::markdown::render_markdown_to_html;
use crate::models::Post;

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; color: #111827; }
main { max-width: 48rem; margin: 0 auto; padding: 4rem 1rem 2rem; }
h1.site-title, h1.post-title { font-size: 3rem; font-weight: 700; margin: 0; }
a { color: inherit; text-decoration: none; }
.post-card { padding: 1.5rem 0; border-top: 1px solid #e5e7eb; }
.post-card h3 { font-size: 1.25rem; font-weight: 700; margin: 0 0 0.25rem; }
.post-card a:hover h3 { text-decoration: underline; }
time { color: #6b7280; font-weight: 500; }
.markdown-body { margin-top: 2rem; line-height: 1.6; }
.markdown-body pre { background: #f6f8fa; padding: 1rem; overflow-x: auto; border-radius: 6px; }
.markdown-body code { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: 0.9em; }
.markdown-body table { border-collapse: collapse; }
.markdown-body th, .markdown-body td { border: 1px solid #d0d7de; padding: 0.4rem 0.8rem; }
.markdown-body blockquote { margin: 0; padding: 0 1rem; color: #57606a; border-left: 0.25rem solid #d0d7de; }
.markdown-body img { max-width: 100%; }
"#;

pub fn render_with_layout(title: &str, content: &str, is_development: bool) -> String {
    let reload = if is_development { HOT_RELOAD_SCRIPT } else { "" };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n{}</body>\n</html>\n",
        encode_minimal(title),
        STYLE,
        content,
        reload
    )
}

/// `January 1, 2024`
pub fn format_long_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn render_time(date: &DateTime<Utc>) -> String {
    format!(
        "<time datetime=\"{}\">{}</time>",
        date.format("%Y-%m-%d"),
        format_long_date(date)
    )
}

fn render_post_card(post: &Post) -> String {
    let date = post
        .published_at
        .as_ref()
        .map(|d| format!(" ({})", render_time(d)))
        .unwrap_or_default();

    format!(
        "<div class=\"post-card\"><a href=\"/{}\"><h3>{}{}</h3><div>{}</div></a></div>",
        encode_attribute(&post.slug),
        encode_minimal(&post.title),
        date,
        encode_minimal(&post.blurb)
    )
}

pub fn render_index(site_title: &str, posts: &[Post]) -> String {
    let cards: String = posts.iter().map(render_post_card).collect();
    format!(
        "<main><h1 class=\"site-title\">{}</h1><div class=\"posts\">{}</div></main>",
        encode_minimal(site_title),
        cards
    )
}

pub fn render_post(post: &Post) -> String {
    let date = post.published_at.as_ref().map(render_time).unwrap_or_default();

    format!(
        "<main><h1 class=\"post-title\">{}</h1>{}<div class=\"markdown-body\">{}</div></main>",
        encode_minimal(&post.title),
        date,
        render_markdown_to_html(&post.content)
    )
}

pub fn render_not_found(slug: &str) -> String {
    format!(
        "<main><h1 class=\"post-title\">Not found</h1><p>There is no post called <code>{}</code>.</p><p><a href=\"/\">&larr; All posts</a></p></main>",
        encode_minimal(slug)
    )
}

pub fn render_error() -> String {
    "<main><h1 class=\"post-title\">Something went wrong</h1><p>The posts could not be loaded.</p></main>"
        .to_string()
}
