//! Asset path rewriting for rendered post bodies

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::helpers::{asset_url, is_absolute};

lazy_static! {
    // The leading whitespace keeps `data-src=` and similar attributes out
    static ref SRC_ATTR: Regex = Regex::new(r#"(\s)src=(?:"([^"]*)"|'([^']*)')"#)
        .expect("src attribute pattern is valid");
}

/// Rewrite relative `src` attributes to live under `<content_root>/<folder>/`
///
/// Absolute references (URL scheme or leading `/`) and empty values are left
/// untouched. The quote style of each attribute is preserved.
///
/// # Examples
/// ```ignore
/// rewrite_asset_paths(r#"<img src="a.png">"#, "post", "hello")
/// // -> <img src="post/hello/a.png">
/// ```
pub fn rewrite_asset_paths(html: &str, content_root: &str, folder: &str) -> String {
    SRC_ATTR
        .replace_all(html, |caps: &Captures| {
            let (value, quote) = match (caps.get(2), caps.get(3)) {
                (Some(v), _) => (v.as_str(), '"'),
                (None, Some(v)) => (v.as_str(), '\''),
                (None, None) => return caps[0].to_string(),
            };

            if value.is_empty() || is_absolute(value) {
                return caps[0].to_string();
            }

            format!(
                "{}src={quote}{}{quote}",
                &caps[1],
                asset_url(content_root, folder, value)
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_references_unchanged() {
        let html = r#"<img src="http://x/y.png"><img src="/z.png">"#;
        assert_eq!(rewrite_asset_paths(html, "post", "abc"), html);
    }

    #[test]
    fn test_relative_reference_rewritten() {
        let html = r#"<p><img src="img1.png" alt="a" /></p>"#;
        assert_eq!(
            rewrite_asset_paths(html, "post", "abc"),
            r#"<p><img src="post/abc/img1.png" alt="a" /></p>"#
        );
    }

    #[test]
    fn test_many_references() {
        let html = concat!(
            r#"<img src="a.png"> text <img src="https://cdn/b.png">"#,
            r#"<img src='c/d.jpg'><img src="data:image/png;base64,AA==">"#
        );
        assert_eq!(
            rewrite_asset_paths(html, "post", "p1"),
            concat!(
                r#"<img src="post/p1/a.png"> text <img src="https://cdn/b.png">"#,
                r#"<img src='post/p1/c/d.jpg'><img src="data:image/png;base64,AA==">"#
            )
        );
    }

    #[test]
    fn test_no_references() {
        let html = "<h1>Title</h1><p>src=\"not-an-attribute\" in text</p>";
        assert_eq!(rewrite_asset_paths(html, "post", "p1"), html);
    }

    #[test]
    fn test_other_attributes_untouched() {
        let html = r#"<img data-src="lazy.png" src="real.png" alt="src.png"><a href="doc.pdf">x</a>"#;
        assert_eq!(
            rewrite_asset_paths(html, "post", "p1"),
            r#"<img data-src="lazy.png" src="post/p1/real.png" alt="src.png"><a href="doc.pdf">x</a>"#
        );
    }

    #[test]
    fn test_empty_value_untouched() {
        let html = r#"<img src="">"#;
        assert_eq!(rewrite_asset_paths(html, "post", "p1"), html);
    }
}
