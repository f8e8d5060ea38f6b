//! The hosting page: sections, navigation links and content regions
//!
//! The controller only talks to the page through [`UiSurface`]. [`Page`] is
//! the in-memory implementation used by the command line and by tests.

mod memory;

pub use memory::Page;

/// Insertion points the controller writes markup into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    PostsCount,
    PostsContainer,
    ArticleContent,
}

impl Region {
    /// Element id of the region in the page markup
    pub fn element_id(&self) -> &'static str {
        match self {
            Region::PostsCount => "posts-count",
            Region::PostsContainer => "posts-container",
            Region::ArticleContent => "article-content",
        }
    }
}

/// Interactive sources the controller wires on start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    NavLinks,
    BackButton,
    HomeLink,
    PostCards,
    ReloadButtons,
}

impl EventSource {
    pub const ALL: [EventSource; 5] = [
        EventSource::NavLinks,
        EventSource::BackButton,
        EventSource::HomeLink,
        EventSource::PostCards,
        EventSource::ReloadButtons,
    ];
}

/// A user interaction, delivered to `BlogController::handle`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A navigation link targeting a section
    Navigate(String),
    /// The home link
    Home,
    /// The back button of the detail view
    Back,
    /// A post card's open affordance
    OpenPost(String),
    /// The reload button of an error block
    Reload,
}

/// What the controller needs from the hosting page
pub trait UiSurface: Send + Sync {
    /// Start delivering events from `source`
    fn bind(&self, source: EventSource);

    /// Every section the page manages
    fn sections(&self) -> Vec<String>;

    fn set_section_visible(&self, id: &str, visible: bool);

    /// Toggle the entry transition of a section
    fn set_transition(&self, id: &str, active: bool);

    /// Section ids targeted by the navigation links
    fn nav_targets(&self) -> Vec<String>;

    fn set_nav_active(&self, target: &str, active: bool);

    /// Replace the markup of a region
    fn write(&self, region: Region, html: &str);

    /// Move the viewport to the top of the content
    fn scroll_to_top(&self);

    /// Fragment of the address the page was opened with, `#` included
    fn fragment(&self) -> Option<String>;
}
