//! Manifest entries

use serde::{Deserialize, Serialize};

use crate::error::{BlogError, BlogResult};

/// One entry of the post manifest (`directory.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    /// Unique post id, also used in deep links
    pub id: String,

    /// Post title
    pub title: String,

    /// Short summary shown on the list card
    #[serde(default)]
    pub excerpt: String,

    /// Publication date, any format `helpers::parse_date` understands
    pub date: String,

    /// Folder under the content root holding the Markdown body and images
    pub folder: String,
}

impl PostEntry {
    pub fn new(id: &str, title: &str, date: &str, folder: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            date: date.to_string(),
            folder: folder.to_string(),
        }
    }

    pub fn with_excerpt(mut self, excerpt: &str) -> Self {
        self.excerpt = excerpt.to_string();
        self
    }
}

/// Decode a manifest payload, keeping manifest order
pub fn parse_manifest(path: &str, payload: &str) -> BlogResult<Vec<PostEntry>> {
    let posts: Vec<PostEntry> =
        serde_json::from_str(payload).map_err(|e| BlogError::parse(path, e))?;

    for (i, post) in posts.iter().enumerate() {
        if posts[..i].iter().any(|p| p.id == post.id) {
            tracing::warn!("Duplicate post id {:?} in {}, first entry wins", post.id, path);
        }
    }

    Ok(posts)
}

/// Find a post by id
pub fn find_post<'a>(posts: &'a [PostEntry], id: &str) -> Option<&'a PostEntry> {
    posts.iter().find(|p| p.id == id)
}
