//! blog-reader: a reader for static Markdown blogs
//!
//! A site is a directory (or URL) holding a content root with a
//! `directory.json` manifest and one folder per post containing the post's
//! Markdown body and images. The [`controller::BlogController`] loads the
//! manifest, renders posts and drives the page's sections.

pub mod commands;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod page;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentSource, DirSource, HttpSource, MarkdownRenderer};
use controller::BlogController;
use page::UiSurface;

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root directory (manifest and post folders)
    pub content_dir: PathBuf,
    /// Language override files
    pub i18n_dir: PathBuf,
}

impl Blog {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(config.content_root());
        let i18n_dir = base_dir.join(&config.i18n_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            i18n_dir,
        })
    }

    /// Content source: the site URL when given, otherwise the local directory
    pub fn content_source(&self, url: Option<&str>) -> Result<Arc<dyn ContentSource>> {
        let source: Arc<dyn ContentSource> = match url {
            Some(url) => Arc::new(HttpSource::new(url, self.config.content_root())?),
            None => Arc::new(DirSource::new(&self.content_dir)),
        };
        Ok(source)
    }

    /// String catalog for the configured language, with site overrides
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::new(&self.config.language);
        i18n.load_languages(&self.i18n_dir)?;
        Ok(i18n)
    }

    /// Build a controller for `ui`
    pub fn controller(&self, ui: Arc<dyn UiSurface>, url: Option<&str>) -> Result<BlogController> {
        let renderer = MarkdownRenderer::with_options(
            self.config.markdown.clone(),
            &self.config.highlight,
        );
        Ok(BlogController::new(
            self.config.clone(),
            self.content_source(url)?,
            Arc::new(renderer),
            ui,
        )
        .with_i18n(self.i18n()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_blog_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("post"));
        assert_eq!(blog.config.language, "en");
    }

    #[test]
    fn test_blog_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "language: zh-CN\ncontent_dir: articles\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("articles"));
        assert_eq!(blog.i18n().unwrap().get("posts.empty"), "暂无文章");
    }
}
