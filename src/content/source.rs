//! Content sources: where the manifest, Markdown bodies and images live

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::error::{BlogError, BlogResult};

/// Read-only access to files under the content root
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch a text file; `path` is relative to the content root
    async fn fetch_text(&self, path: &str) -> BlogResult<String>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Content served over HTTP(S)
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// `site_url` is where the site is published, `content_root` the folder
    /// below it holding the manifest
    pub fn new(site_url: &str, content_root: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blog-reader/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut site = Url::parse(site_url)?;
        if !site.path().ends_with('/') {
            let path = format!("{}/", site.path());
            site.set_path(&path);
        }

        let root = content_root.trim_matches('/');
        let base = if root.is_empty() {
            site
        } else {
            site.join(&format!("{}/", root))?
        };

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> BlogResult<String> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| BlogError::fetch(path, e))?;

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BlogError::fetch(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogError::fetch(path, format!("HTTP status {}", status)));
        }

        response.text().await.map_err(|e| BlogError::fetch(path, e))
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Content read from a local directory
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Resolve `path` below the root, refusing anything that escapes it
    fn resolve(&self, path: &str) -> BlogResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(BlogError::fetch(path, "path escapes the content root"));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for DirSource {
    async fn fetch_text(&self, path: &str) -> BlogResult<String> {
        let full = self.resolve(path)?;
        tracing::debug!("Reading {:?}", full);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| BlogError::fetch(path, e))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
