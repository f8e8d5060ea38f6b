//! Markup builders for the list, article and error views

use crate::content::PostEntry;
use crate::helpers::{div, escape_attr, escape_html, format_date};
use crate::i18n::I18n;

/// Markup for the two regions of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListView {
    pub count: String,
    pub list: String,
}

/// Long-form date in the catalog's language
pub fn post_date(post: &PostEntry, i18n: &I18n) -> String {
    format_date(&post.date, i18n.language(), &i18n.get("date.unknown"))
}

/// Build the count line and one card per post, in collection order
pub fn render_post_list(posts: &[PostEntry], i18n: &I18n) -> PostListView {
    let count = div(
        "posts-count-text",
        &escape_html(&i18n.get_plural("posts.count", posts.len())),
    );

    if posts.is_empty() {
        return PostListView {
            count,
            list: div("loading", &escape_html(&i18n.get("posts.empty"))),
        };
    }

    let read_more = escape_html(&i18n.get("posts.read_more"));
    let list = posts
        .iter()
        .map(|post| {
            let id = escape_attr(&post.id);
            format!(
                concat!(
                    r#"<div class="post-card fade-in" data-post-id="{id}">"#,
                    r#"<h3 class="post-title">{title}</h3>"#,
                    r#"<p class="post-excerpt">{excerpt}</p>"#,
                    r#"<div class="post-meta"><span>{date}</span>"#,
                    r#"<a class="read-more" data-post-id="{id}">{read_more}</a></div>"#,
                    "</div>"
                ),
                id = id,
                title = escape_html(&post.title),
                excerpt = escape_html(&post.excerpt),
                date = escape_html(&post_date(post, i18n)),
                read_more = read_more,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PostListView { count, list }
}

/// Placeholder shown while a post body is being fetched
pub fn render_loading(i18n: &I18n) -> String {
    div("loading", &escape_html(&i18n.get("post.loading")))
}

/// Title, date line and the already transformed body
pub fn render_article(post: &PostEntry, body_html: &str, i18n: &I18n) -> String {
    let published = i18n.format("post.published", &post_date(post, i18n));
    format!(
        "<h1>{}</h1>\n{}\n{}",
        escape_html(&post.title),
        div("post-date", &escape_html(&published)),
        body_html
    )
}

/// Error block with a reload affordance
pub fn render_error(message: &str, i18n: &I18n) -> String {
    format!(
        concat!(
            r#"<div class="error-block">"#,
            r#"<i class="fas fa-exclamation-triangle"></i>"#,
            "<p>{}</p>",
            r#"<button class="reload-btn" data-action="reload">{}</button>"#,
            "</div>"
        ),
        escape_html(message),
        escape_html(&i18n.get("error.reload"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts() -> Vec<PostEntry> {
        vec![
            PostEntry::new("p1", "First", "2024-01-05", "p1").with_excerpt("one"),
            PostEntry::new("p2", "Second", "2024-02-10", "p2").with_excerpt("two"),
            PostEntry::new("p3", "First", "garbage", "p3"),
        ]
    }

    #[test]
    fn test_one_card_per_post_in_order() {
        let i18n = I18n::new("en");
        let view = render_post_list(&posts(), &i18n);

        assert!(view.count.contains("3 posts"));
        assert_eq!(view.list.matches(r#"class="post-card"#).count(), 3);

        let p1 = view.list.find(r#"data-post-id="p1""#).unwrap();
        let p2 = view.list.find(r#"data-post-id="p2""#).unwrap();
        let p3 = view.list.find(r#"data-post-id="p3""#).unwrap();
        assert!(p1 < p2 && p2 < p3);

        assert!(view.list.contains("<span>January 5, 2024</span>"));
        // Unparseable dates fall back to the raw value
        assert!(view.list.contains("<span>garbage</span>"));
    }

    #[test]
    fn test_empty_collection_placeholder() {
        let i18n = I18n::new("en");
        let view = render_post_list(&[], &i18n);
        assert_eq!(view.list, r#"<div class="loading">No posts yet</div>"#);
        assert!(view.count.contains("No posts"));
    }

    #[test]
    fn test_manifest_strings_are_escaped() {
        let i18n = I18n::new("en");
        let post = PostEntry::new(r#"x" onclick="y"#, "<script>", "2024-01-01", "x")
            .with_excerpt("a & b");
        let view = render_post_list(&[post], &i18n);
        assert!(view.list.contains(r#"data-post-id="x&quot; onclick=&quot;y""#));
        assert!(view.list.contains("&lt;script&gt;"));
        assert!(view.list.contains("a &amp; b"));
    }

    #[test]
    fn test_render_article_zh() {
        let i18n = I18n::new("zh-CN");
        let post = PostEntry::new("p1", "标题", "2024-01-05", "p1");
        let html = render_article(&post, "<p>body</p>", &i18n);
        assert!(html.starts_with("<h1>标题</h1>"));
        assert!(html.contains(r#"<div class="post-date">发布于 2024年1月5日</div>"#));
        assert!(html.ends_with("<p>body</p>"));
    }

    #[test]
    fn test_render_error() {
        let i18n = I18n::new("en");
        let html = render_error("Boom <now>", &i18n);
        assert!(html.contains("<p>Boom &lt;now&gt;</p>"));
        assert!(html.contains(r#"data-action="reload">Reload</button>"#));
    }
}
