//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::MarkdownConfig;
pub use site::SectionsConfig;
pub use site::SiteConfig;
