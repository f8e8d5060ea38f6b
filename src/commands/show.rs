//! Render a single post

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::page::{Page, Region};
use crate::Blog;

/// Open post `id`; print the article markup or write the whole page to `output`
pub async fn run(blog: &Blog, url: Option<&str>, id: &str, output: Option<&Path>) -> Result<()> {
    let page = Arc::new(Page::from_config(&blog.config));
    let controller = blog.controller(page.clone(), url)?;
    controller.initialize().await?;
    controller
        .open_post(id)
        .await
        .with_context(|| format!("Failed to open post {}", id))?;

    match output {
        Some(path) => {
            fs::write(path, page.to_html())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", page.region(Region::ArticleContent)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let post_dir = dir.path().join("post/hello");
        fs::create_dir_all(&post_dir).unwrap();
        fs::write(
            dir.path().join("post/directory.json"),
            r#"[{"id":"post-hello","title":"Hello","excerpt":"hi","date":"2024-01-05","folder":"hello"}]"#,
        )
        .unwrap();
        fs::write(post_dir.join("hello.md"), "# Hello\n\n![pic](pic.png)").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_show_writes_document() {
        let dir = site();
        let blog = Blog::new(dir.path()).unwrap();
        let output = dir.path().join("out.html");

        run(&blog, None, "post-hello", Some(output.as_path())).await.unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(r#"<section id="blog-detail" style="display: block">"#));
        assert!(html.contains(r#"src="post/hello/pic.png""#));
    }

    #[tokio::test]
    async fn test_show_unknown_post_fails() {
        let dir = site();
        let blog = Blog::new(dir.path()).unwrap();
        let err = run(&blog, None, "missing", None).await.unwrap_err();
        assert!(err.to_string().contains("Failed to open post missing"));
    }
}
