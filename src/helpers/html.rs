//! HTML helper functions

/// Escape text for an HTML text node
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value placed inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    escape_html(s)
}

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("https://example.com", "example") // -> <a href="https://example.com">example</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape_attr(href), escape_html(text))
}

/// Wrap `inner` in a `<div>` with the given class
pub fn div(class: &str, inner: &str) -> String {
    format!(r#"<div class="{}">{}</div>"#, class, inner)
}
