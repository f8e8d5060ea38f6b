//! Markdown rendering

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::{HighlightConfig, MarkdownConfig};
use crate::helpers::{escape_html, link_to};

lazy_static! {
    static ref BARE_URL: Regex =
        Regex::new(r#"\b(?:https?://|www\.)[^\s<>"']+"#).expect("bare url pattern is valid");
}

/// Turns Markdown into HTML
pub trait Render: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// Markdown renderer with optional syntax highlighting
pub struct MarkdownRenderer {
    options: MarkdownConfig,
    highlighter: Option<Highlighter>,
}

struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with html passthrough, linkify and typographer on
    pub fn new() -> Self {
        Self {
            options: MarkdownConfig::default(),
            highlighter: None,
        }
    }

    /// Create with custom settings
    pub fn with_options(options: MarkdownConfig, highlight: &HighlightConfig) -> Self {
        let highlighter = highlight.enable.then(|| Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        });

        Self {
            options,
            highlighter,
        }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        if self.options.typographer {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    fn render_events(&self, markdown: &str) -> String {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, self.parser_options()));

        let mut events: Vec<Event> = Vec::new();
        // (language, buffered source) while inside a highlighted code block
        let mut highlighted_block: Option<(Option<String>, String)> = None;
        let mut in_code_block = false;
        let mut link_depth = 0usize;

        for event in parser {
            if let Some((_, buf)) = highlighted_block.as_mut() {
                match event {
                    Event::Text(text) => buf.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = highlighted_block.take() {
                            let html = self.highlight_code(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(html)));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) if self.highlighter.is_some() => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    highlighted_block = Some((lang, String::new()));
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    in_code_block = true;
                    events.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(event);
                }
                Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link | TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Html(raw) | Event::InlineHtml(raw) if !self.options.html => {
                    events.push(Event::Text(raw));
                }
                Event::InlineHtml(raw) => {
                    if opens_anchor(&raw) {
                        link_depth += 1;
                    } else if closes_anchor(&raw) {
                        link_depth = link_depth.saturating_sub(1);
                    }
                    events.push(Event::InlineHtml(raw));
                }
                Event::Text(text) if self.options.linkify && link_depth == 0 && !in_code_block => {
                    linkify(&text, &mut events);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            )
        };

        let Some(hl) = &self.highlighter else {
            return plain();
        };

        let syntax = hl
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| hl.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| hl.syntax_set.find_syntax_plain_text());

        let Some(theme) = hl
            .theme_set
            .themes
            .get(&hl.theme_name)
            .or_else(|| hl.theme_set.themes.values().next())
        else {
            return plain();
        };

        match highlighted_html_for_string(code, &hl.syntax_set, syntax, theme) {
            Ok(highlighted) if hl.line_numbers => add_line_numbers(&highlighted, lang),
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                escape_html(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain()
            }
        }
    }
}

impl Render for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        Ok(self.render_events(markdown))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw inline HTML starting an `<a>` element
fn opens_anchor(raw: &str) -> bool {
    let bytes = raw.trim_start().as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'<'
        && bytes[1].eq_ignore_ascii_case(&b'a')
        && (bytes[2] == b'>' || bytes[2].is_ascii_whitespace())
}

fn closes_anchor(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("</a>")
}

/// Split `text` around bare URLs, turning each URL into an anchor
fn linkify<'a>(text: &str, events: &mut Vec<Event<'a>>) {
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        let url = trim_url(m.as_str());
        if url.is_empty() {
            continue;
        }
        let start = m.start();
        let end = start + url.len();

        if start > last {
            events.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }

        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Html(CowStr::from(link_to(&href, url))));
        last = end;
    }

    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Drop trailing punctuation that belongs to the sentence, not the URL
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '*' | '_' => true,
            ')' => url.matches('(').count() < url.matches(')').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|i| format!(r#"<span class="line-number">{}</span>"#, i))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        escape_html(lang),
        gutter,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_image() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("![a](img.png)").unwrap();
        assert!(html.contains(r#"src="img.png""#));
        assert!(html.contains(r#"alt="a""#));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("<div class=\"note\">hi</div>\n\ntext <kbd>Ctrl</kbd>")
            .unwrap();
        assert!(html.contains("<div class=\"note\">hi</div>"));
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_raw_html_escaped_when_disabled() {
        let options = MarkdownConfig {
            html: false,
            ..MarkdownConfig::default()
        };
        let renderer = MarkdownRenderer::with_options(options, &HighlightConfig::default());
        let html = renderer.render("text <kbd>Ctrl</kbd>").unwrap();
        assert!(html.contains("&lt;kbd&gt;Ctrl&lt;/kbd&gt;"));
    }

    #[test]
    fn test_linkify_bare_urls() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("See https://example.com/docs. Or www.rust-lang.org!")
            .unwrap();
        assert!(html.contains(r#"<a href="https://example.com/docs">https://example.com/docs</a>."#));
        assert!(html.contains(r#"<a href="http://www.rust-lang.org">www.rust-lang.org</a>!"#));
    }

    #[test]
    fn test_linkify_skips_links_and_code() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("[https://a.example](https://a.example) and `https://b.example`\n\n```\nhttps://c.example\n```")
            .unwrap();
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains("<code>https://b.example</code>"));
        assert!(html.contains("https://c.example\n</code></pre>"));
    }

    #[test]
    fn test_linkify_skips_inline_html_anchors() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render(r#"see <a href="https://x.example">https://y.example</a> and https://z.example"#)
            .unwrap();
        assert_eq!(html.matches("<a ").count(), 2);
        assert!(html.contains(r#"<a href="https://x.example">https://y.example</a>"#));
        assert!(html.contains(r#"<a href="https://z.example">https://z.example</a>"#));

        // Tags that merely start with "a" are not anchors
        let html = renderer.render("an <abbr>https://w.example</abbr>").unwrap();
        assert!(html.contains(r#"<a href="https://w.example">"#));
    }

    #[test]
    fn test_typographer() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("\"quoted\" -- dash").unwrap();
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{2013}'));

        let options = MarkdownConfig {
            typographer: false,
            ..MarkdownConfig::default()
        };
        let renderer = MarkdownRenderer::with_options(options, &HighlightConfig::default());
        let html = renderer.render("\"quoted\" -- dash").unwrap();
        assert!(!html.contains('\u{201c}'));
        assert!(html.contains("quoted"));
        assert!(html.contains(" -- dash"));
    }

    #[test]
    fn test_render_highlighted_code_block() {
        let highlight = HighlightConfig {
            enable: true,
            line_number: true,
            ..HighlightConfig::default()
        };
        let renderer = MarkdownRenderer::with_options(MarkdownConfig::default(), &highlight);
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight rust"));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url("https://a.b/c."), "https://a.b/c");
        assert_eq!(trim_url("https://a.b/(x)"), "https://a.b/(x)");
        assert_eq!(trim_url("https://a.b/x)"), "https://a.b/x");
    }
}
