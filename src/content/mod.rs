//! Content module - manifest entries, content sources and Markdown processing

mod assets;
mod markdown;
mod post;
mod source;

pub use assets::rewrite_asset_paths;
pub use markdown::{MarkdownRenderer, Render};
pub use post::{find_post, parse_manifest, PostEntry};
pub use source::{ContentSource, DirSource, HttpSource};
