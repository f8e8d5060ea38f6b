//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,

    // URL the site is published under, used by the HTTP content source
    pub url: String,

    // Content layout
    pub content_dir: String,
    pub manifest: String,
    pub markdown_ext: String,
    pub i18n_dir: String,

    // Page
    #[serde(default)]
    pub sections: SectionsConfig,
    pub nav: Vec<String>,
    pub home_link: String,
    pub post_fragment_prefix: String,
    pub transition_ms: u64,

    // Rendering
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),

            content_dir: "post".to_string(),
            manifest: "directory.json".to_string(),
            markdown_ext: "md".to_string(),
            i18n_dir: "languages".to_string(),

            sections: SectionsConfig::default(),
            nav: vec!["blog-list".to_string(), "about".to_string()],
            home_link: "home".to_string(),
            post_fragment_prefix: "post".to_string(),
            transition_ms: 600,

            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// URL path prefix of the content root, without a trailing slash
    pub fn content_root(&self) -> &str {
        self.content_dir.trim_end_matches('/')
    }

    /// Path of a post's Markdown body, relative to the content root
    pub fn post_body_path(&self, folder: &str) -> String {
        format!("{folder}/{folder}.{}", self.markdown_ext)
    }

    /// Every section the page manages: list, detail, then the extras
    pub fn all_sections(&self) -> Vec<String> {
        let mut sections = vec![self.sections.list.clone(), self.sections.detail.clone()];
        for extra in &self.sections.extra {
            if !sections.contains(extra) {
                sections.push(extra.clone());
            }
        }
        sections
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// Section identifiers of the hosting page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    pub list: String,
    pub detail: String,
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            list: "blog-list".to_string(),
            detail: "blog-detail".to_string(),
            extra: vec!["about".to_string()],
        }
    }
}

/// Markdown engine flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub html: bool,
    pub linkify: bool,
    pub typographer: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            html: true,
            linkify: true,
            typographer: true,
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_root(), "post");
        assert_eq!(config.manifest, "directory.json");
        assert_eq!(config.transition_ms, 600);
        assert!(config.markdown.html);
        assert!(!config.highlight.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
language: zh-CN
content_dir: content/
sections:
  list: posts
  detail: article
markdown:
  linkify: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.content_root(), "content");
        assert_eq!(config.sections.list, "posts");
        assert!(config.sections.extra.is_empty());
        assert!(!config.markdown.linkify);
        assert!(config.markdown.typographer);
    }

    #[test]
    fn test_post_body_path() {
        let config = SiteConfig::default();
        assert_eq!(config.post_body_path("hello"), "hello/hello.md");
    }

    #[test]
    fn test_all_sections_dedup() {
        let mut config = SiteConfig::default();
        config.sections.extra = vec!["about".to_string(), "blog-list".to_string()];
        assert_eq!(config.all_sections(), vec!["blog-list", "blog-detail", "about"]);
    }
}
