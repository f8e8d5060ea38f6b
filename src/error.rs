//! Error types for loading and displaying posts

use thiserror::Error;

/// Failures the controller recovers from by showing an error block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlogError {
    /// Transport failure or non-success status while reading content
    #[error("failed to fetch {path}: {reason}")]
    FetchFailed { path: String, reason: String },

    /// Payload arrived but could not be decoded
    #[error("failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    /// Referenced post id is not in the loaded collection
    #[error("post not found: {0}")]
    NotFound(String),

    /// Markdown could not be turned into HTML
    #[error("failed to render post: {0}")]
    RenderFailed(String),
}

impl BlogError {
    pub fn fetch(path: impl Into<String>, reason: impl ToString) -> Self {
        BlogError::FetchFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(path: impl Into<String>, reason: impl ToString) -> Self {
        BlogError::ParseFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type BlogResult<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlogError::fetch("directory.json", "HTTP status 404");
        assert_eq!(
            err.to_string(),
            "failed to fetch directory.json: HTTP status 404"
        );
        assert_eq!(
            BlogError::NotFound("p9".to_string()).to_string(),
            "post not found: p9"
        );
    }
}
