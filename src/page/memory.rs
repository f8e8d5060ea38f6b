//! In-memory page model

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{EventSource, Region, UiEvent, UiSurface};
use crate::config::SiteConfig;
use crate::helpers::{escape_attr, escape_html};

#[derive(Debug, Clone)]
struct SectionState {
    id: String,
    visible: bool,
    transition: bool,
}

#[derive(Debug, Clone)]
struct NavState {
    target: String,
    active: bool,
}

#[derive(Debug, Default)]
struct PageState {
    sections: Vec<SectionState>,
    nav: Vec<NavState>,
    regions: HashMap<Region, String>,
    bindings: HashMap<EventSource, usize>,
    scroll_resets: usize,
}

/// A page held in memory, the stand-in for a browser document
#[derive(Debug)]
pub struct Page {
    title: String,
    list_section: String,
    detail_section: String,
    home_link: String,
    fragment: Option<String>,
    state: Mutex<PageState>,
}

impl Page {
    /// Build the page described by the site configuration; every section
    /// starts hidden
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut seen = HashSet::new();
        let sections = config
            .all_sections()
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .map(|id| SectionState {
                id,
                visible: false,
                transition: false,
            })
            .collect();

        let nav = config
            .nav
            .iter()
            .map(|target| NavState {
                target: target.clone(),
                active: false,
            })
            .collect();

        Self {
            title: config.title.clone(),
            list_section: config.sections.list.clone(),
            detail_section: config.sections.detail.clone(),
            home_link: config.home_link.clone(),
            fragment: None,
            state: Mutex::new(PageState {
                sections,
                nav,
                ..PageState::default()
            }),
        }
    }

    /// Open the page at `fragment`, e.g. `#post-hello`
    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ids of the sections currently shown
    pub fn visible_sections(&self) -> Vec<String> {
        self.lock()
            .sections
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.lock().sections.iter().any(|s| s.id == id && s.visible)
    }

    pub fn in_transition(&self, id: &str) -> bool {
        self.lock().sections.iter().any(|s| s.id == id && s.transition)
    }

    /// Targets of the navigation links currently marked active
    pub fn active_nav(&self) -> Vec<String> {
        self.lock()
            .nav
            .iter()
            .filter(|n| n.active)
            .map(|n| n.target.clone())
            .collect()
    }

    /// Current markup of a region
    pub fn region(&self, region: Region) -> String {
        self.lock().regions.get(&region).cloned().unwrap_or_default()
    }

    /// How many times `source` was bound
    pub fn binding_count(&self, source: EventSource) -> usize {
        self.lock().bindings.get(&source).copied().unwrap_or(0)
    }

    pub fn scroll_resets(&self) -> usize {
        self.lock().scroll_resets
    }

    fn bound(&self, source: EventSource) -> bool {
        self.binding_count(source) > 0
    }

    /// Click a navigation link
    pub fn click_nav(&self, target: &str) -> Option<UiEvent> {
        if !self.bound(EventSource::NavLinks) {
            return None;
        }
        self.lock()
            .nav
            .iter()
            .any(|n| n.target == target)
            .then(|| UiEvent::Navigate(target.to_string()))
    }

    pub fn click_home(&self) -> Option<UiEvent> {
        self.bound(EventSource::HomeLink).then_some(UiEvent::Home)
    }

    pub fn click_back(&self) -> Option<UiEvent> {
        self.bound(EventSource::BackButton).then_some(UiEvent::Back)
    }

    /// Click the card of post `id`, if the list shows one
    pub fn click_post(&self, id: &str) -> Option<UiEvent> {
        if !self.bound(EventSource::PostCards) {
            return None;
        }
        let marker = format!(r#"data-post-id="{}""#, escape_attr(id));
        self.region(Region::PostsContainer)
            .contains(&marker)
            .then(|| UiEvent::OpenPost(id.to_string()))
    }

    /// Click a reload button, if any region shows one
    pub fn click_reload(&self) -> Option<UiEvent> {
        if !self.bound(EventSource::ReloadButtons) {
            return None;
        }
        self.lock()
            .regions
            .values()
            .any(|html| html.contains(r#"data-action="reload""#))
            .then_some(UiEvent::Reload)
    }

    /// Serialize the page as a standalone HTML document
    pub fn to_html(&self) -> String {
        let state = self.lock();
        let region = |r: Region| state.regions.get(&r).cloned().unwrap_or_default();

        let mut nav = format!(
            r##"<a class="nav-link" href="#{}">{}</a>"##,
            escape_attr(&self.home_link),
            escape_html(&self.title)
        );
        for link in &state.nav {
            nav.push_str(&format!(
                r##"<a class="nav-link{}" href="#{}">{}</a>"##,
                if link.active { " active" } else { "" },
                escape_attr(&link.target),
                escape_html(&link.target)
            ));
        }

        let mut body = String::new();
        for section in &state.sections {
            let inner = if section.id == self.list_section {
                format!(
                    r#"<div id="{}">{}</div><div id="{}">{}</div>"#,
                    Region::PostsCount.element_id(),
                    region(Region::PostsCount),
                    Region::PostsContainer.element_id(),
                    region(Region::PostsContainer)
                )
            } else if section.id == self.detail_section {
                format!(
                    r#"<button id="back-btn">←</button><article id="{}">{}</article>"#,
                    Region::ArticleContent.element_id(),
                    region(Region::ArticleContent)
                )
            } else {
                String::new()
            };
            body.push_str(&format!(
                r#"<section id="{}" style="display: {}">{}</section>"#,
                escape_attr(&section.id),
                if section.visible { "block" } else { "none" },
                inner
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<nav>{}</nav>\n<main>{}</main>\n</body>\n</html>\n",
            escape_html(&self.title),
            nav,
            body
        )
    }
}

impl UiSurface for Page {
    fn bind(&self, source: EventSource) {
        *self.lock().bindings.entry(source).or_insert(0) += 1;
    }

    fn sections(&self) -> Vec<String> {
        self.lock().sections.iter().map(|s| s.id.clone()).collect()
    }

    fn set_section_visible(&self, id: &str, visible: bool) {
        if let Some(section) = self.lock().sections.iter_mut().find(|s| s.id == id) {
            section.visible = visible;
        }
    }

    fn set_transition(&self, id: &str, active: bool) {
        if let Some(section) = self.lock().sections.iter_mut().find(|s| s.id == id) {
            section.transition = active;
        }
    }

    fn nav_targets(&self) -> Vec<String> {
        self.lock().nav.iter().map(|n| n.target.clone()).collect()
    }

    fn set_nav_active(&self, target: &str, active: bool) {
        for link in self.lock().nav.iter_mut().filter(|n| n.target == target) {
            link.active = active;
        }
    }

    fn write(&self, region: Region, html: &str) {
        self.lock().regions.insert(region, html.to_string());
    }

    fn scroll_to_top(&self) {
        self.lock().scroll_resets += 1;
    }

    fn fragment(&self) -> Option<String> {
        self.fragment.clone()
    }
}
