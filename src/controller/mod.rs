//! The blog controller: loads the manifest, opens posts and switches sections
//!
//! The controller owns the post collection, the current post and the visible
//! section. It reaches the outside world only through the injected
//! [`ContentSource`], [`Render`] and [`UiSurface`], so every collaborator can
//! be replaced by a fake.
//!
//! Overlapping [`BlogController::open_post`] calls are resolved by request
//! tokens: the most recently issued call owns the article region and results
//! of older calls are dropped when they arrive.

pub mod view;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::SiteConfig;
use crate::content::{
    find_post, parse_manifest, rewrite_asset_paths, ContentSource, PostEntry, Render,
};
use crate::error::{BlogError, BlogResult};
use crate::helpers;
use crate::i18n::I18n;
use crate::page::{EventSource, Region, UiEvent, UiSurface};

/// Result of a completed `open_post`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The post is shown in the detail view
    Displayed,
    /// A newer `open_post` was issued meanwhile; this result was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct State {
    posts: Vec<PostEntry>,
    current: Option<PostEntry>,
    visible: Option<String>,
}

/// Coordinates content loading, rendering and navigation for one page
pub struct BlogController {
    config: SiteConfig,
    source: Arc<dyn ContentSource>,
    renderer: Arc<dyn Render>,
    ui: Arc<dyn UiSurface>,
    i18n: I18n,
    state: Mutex<State>,
    open_seq: AtomicU64,
    /// Per-section generation of the running transition
    transitions: Arc<Mutex<HashMap<String, u64>>>,
    wired: AtomicBool,
}

impl BlogController {
    pub fn new(
        config: SiteConfig,
        source: Arc<dyn ContentSource>,
        renderer: Arc<dyn Render>,
        ui: Arc<dyn UiSurface>,
    ) -> Self {
        let i18n = I18n::new(&config.language);
        Self {
            config,
            source,
            renderer,
            ui,
            i18n,
            state: Mutex::new(State::default()),
            open_seq: AtomicU64::new(0),
            transitions: Arc::new(Mutex::new(HashMap::new())),
            wired: AtomicBool::new(false),
        }
    }

    /// Replace the string catalog
    pub fn with_i18n(mut self, i18n: I18n) -> Self {
        self.i18n = i18n;
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// The loaded post collection, in manifest order
    pub fn posts(&self) -> Vec<PostEntry> {
        self.lock().posts.clone()
    }

    pub fn current_post(&self) -> Option<PostEntry> {
        self.lock().current.clone()
    }

    pub fn visible_section(&self) -> Option<String> {
        self.lock().visible.clone()
    }

    /// Wire the page, show the list, load the manifest and follow a deep link
    pub async fn initialize(&self) -> BlogResult<()> {
        self.bind_events();
        self.show_section(&self.config.sections.list);
        self.load_post_index().await?;

        if let Some(fragment) = self.ui.fragment() {
            self.follow_fragment(&fragment).await?;
        }
        Ok(())
    }

    fn bind_events(&self) {
        if self.wired.swap(true, Ordering::SeqCst) {
            tracing::debug!("Event sources already wired");
            return;
        }
        for source in EventSource::ALL {
            self.ui.bind(source);
        }
    }

    async fn follow_fragment(&self, fragment: &str) -> BlogResult<()> {
        let target = helpers::decode(fragment.trim_start_matches('#'));
        if target.is_empty() {
            return Ok(());
        }

        let prefix = &self.config.post_fragment_prefix;
        if !prefix.is_empty() && target.starts_with(prefix.as_str()) {
            tracing::info!("Opening deep-linked post {}", target);
            self.open_post(&target).await?;
        } else if target == self.config.home_link {
            self.show_section(&self.config.sections.list);
        } else if self.ui.sections().contains(&target) {
            self.show_section(&target);
        } else {
            tracing::debug!("Ignoring fragment #{}", target);
        }
        Ok(())
    }

    /// Fetch the manifest and replace the post collection
    ///
    /// On failure the previous collection is kept and an error block is
    /// shown. Returns the number of posts loaded.
    pub async fn load_post_index(&self) -> BlogResult<usize> {
        let path = self.config.manifest.as_str();

        let result = match self.source.fetch_text(path).await {
            Ok(payload) => parse_manifest(path, &payload),
            Err(e) => Err(e),
        };

        match result {
            Ok(posts) => {
                let count = posts.len();
                self.lock().posts = posts;
                tracing::info!("Loaded {} posts from {}", count, self.source.describe());
                self.render_post_list();
                Ok(count)
            }
            Err(e) => {
                match &e {
                    BlogError::ParseFailed { .. } => tracing::error!("Manifest is malformed: {}", e),
                    _ => tracing::error!("Manifest could not be fetched: {}", e),
                }
                self.show_error(&self.i18n.get("error.load_posts"));
                Err(e)
            }
        }
    }

    /// Write the count line and the post cards into the list regions
    pub fn render_post_list(&self) {
        let view = view::render_post_list(&self.lock().posts, &self.i18n);
        self.ui.write(Region::PostsCount, &view.count);
        self.ui.write(Region::PostsContainer, &view.list);
    }

    /// Show post `id` in the detail view
    pub async fn open_post(&self, id: &str) -> BlogResult<OpenOutcome> {
        let found = find_post(&self.lock().posts, id).cloned();
        let Some(post) = found else {
            tracing::warn!("Post {} is not in the manifest", id);
            self.show_error(&self.i18n.get("error.not_found"));
            return Err(BlogError::NotFound(id.to_string()));
        };

        let token = self.open_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().current = Some(post.clone());
        self.ui
            .write(Region::ArticleContent, &view::render_loading(&self.i18n));

        let result = self.load_article(&post).await;

        if self.open_seq.load(Ordering::SeqCst) != token {
            tracing::debug!("Dropping stale result for post {}", post.id);
            return Ok(OpenOutcome::Superseded);
        }

        match result {
            Ok(body) => {
                self.ui.write(
                    Region::ArticleContent,
                    &view::render_article(&post, &body, &self.i18n),
                );
                self.show_section(&self.config.sections.detail);
                self.ui.scroll_to_top();
                Ok(OpenOutcome::Displayed)
            }
            Err(e) => {
                tracing::warn!("Failed to load post {}: {}", post.id, e);
                let message = self.i18n.get("error.load_post");
                if self.show_error(&message) != Region::ArticleContent {
                    // Replace the loading placeholder as well
                    self.ui
                        .write(Region::ArticleContent, &view::render_error(&message, &self.i18n));
                }
                Err(e)
            }
        }
    }

    /// Fetch, render and fix up the body of `post`
    async fn load_article(&self, post: &PostEntry) -> BlogResult<String> {
        let path = self.config.post_body_path(&post.folder);
        let markdown = self.source.fetch_text(&path).await?;
        let html = self
            .renderer
            .render(&markdown)
            .map_err(|e| BlogError::RenderFailed(e.to_string()))?;
        Ok(rewrite_asset_paths(
            &html,
            self.config.content_root(),
            &post.folder,
        ))
    }

    /// Show exactly one section and mark its navigation link active
    ///
    /// Unknown section ids leave the page untouched.
    pub fn show_section(&self, id: &str) {
        let sections = self.ui.sections();
        if !sections.iter().any(|s| s == id) {
            tracing::debug!("Unknown section {}", id);
            return;
        }

        for section in &sections {
            self.ui.set_section_visible(section, false);
        }
        self.ui.set_section_visible(id, true);
        self.lock().visible = Some(id.to_string());
        self.start_transition(id);
        self.update_nav_active(id);
    }

    fn start_transition(&self, id: &str) {
        self.ui.set_transition(id, true);

        let ui = Arc::clone(&self.ui);
        let id = id.to_string();
        let duration = self.config.transition();
        let generation = {
            let mut transitions = lock_transitions(&self.transitions);
            let generation = transitions.entry(id.clone()).or_default();
            *generation += 1;
            *generation
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let transitions = Arc::clone(&self.transitions);
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    // A later show of the same section owns the class now
                    if lock_transitions(&transitions).get(&id) == Some(&generation) {
                        ui.set_transition(&id, false);
                    }
                });
            }
            Err(_) => ui.set_transition(&id, false),
        }
    }

    fn update_nav_active(&self, id: &str) {
        let targets = self.ui.nav_targets();
        for target in &targets {
            self.ui.set_nav_active(target, false);
        }
        if targets.iter().any(|t| t == id) {
            self.ui.set_nav_active(id, true);
        }
    }

    /// Long-form date in the configured language; never fails
    pub fn format_date(&self, value: &str) -> String {
        helpers::format_date(value, self.i18n.language(), &self.i18n.get("date.unknown"))
    }

    /// Show an error block in the region of the visible section
    ///
    /// Returns the region written to.
    pub fn show_error(&self, message: &str) -> Region {
        let region = match self.lock().visible.as_deref() {
            Some(s) if s == self.config.sections.detail => Region::ArticleContent,
            _ => Region::PostsContainer,
        };
        self.ui.write(region, &view::render_error(message, &self.i18n));
        region
    }

    /// Dispatch a user interaction
    pub async fn handle(&self, event: UiEvent) -> BlogResult<()> {
        tracing::debug!("Handling {:?}", event);
        match event {
            UiEvent::Navigate(target) if target == self.config.home_link => {
                self.show_section(&self.config.sections.list);
            }
            UiEvent::Navigate(target) => self.show_section(&target),
            UiEvent::Home | UiEvent::Back => self.show_section(&self.config.sections.list),
            UiEvent::OpenPost(id) => {
                self.open_post(&id).await?;
            }
            UiEvent::Reload => {
                self.load_post_index().await?;
                self.show_section(&self.config.sections.list);
            }
        }
        Ok(())
    }
}

fn lock_transitions(
    transitions: &Mutex<HashMap<String, u64>>,
) -> MutexGuard<'_, HashMap<String, u64>> {
    transitions.lock().unwrap_or_else(PoisonError::into_inner)
}
