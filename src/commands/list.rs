//! List the posts of a site

use anyhow::Result;
use std::sync::Arc;

use crate::page::{Page, Region};
use crate::Blog;

/// Load the manifest and print the posts, or the list markup with `html`
pub async fn run(blog: &Blog, url: Option<&str>, html: bool) -> Result<()> {
    let page = Arc::new(Page::from_config(&blog.config));
    let controller = blog.controller(page.clone(), url)?;
    controller.initialize().await?;

    if html {
        println!("{}", page.region(Region::PostsCount));
        println!("{}", page.region(Region::PostsContainer));
        return Ok(());
    }

    let posts = controller.posts();
    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} [{}]",
            controller.format_date(&post.date),
            post.title,
            post.id
        );
    }

    Ok(())
}
