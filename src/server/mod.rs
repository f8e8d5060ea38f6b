//! Preview server for the site directory

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Blog;

/// Build the router serving `site_dir` as static files
pub fn router(site_dir: &Path) -> Router {
    let files = ServeDir::new(site_dir).append_index_html_on_directories(true);
    Router::new()
        .fallback_service(files)
        .layer(TraceLayer::new_for_http())
}

/// Start serving the site directory
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(&blog.base_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Serving {} at {}", blog.base_dir.display(), url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentSource, HttpSource};
    use std::fs;

    #[tokio::test]
    async fn test_served_site_is_readable_over_http() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("post/p1")).unwrap();
        fs::write(dir.path().join("post/directory.json"), "[]").unwrap();
        fs::write(dir.path().join("post/p1/p1.md"), "# One").unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(dir.path());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let source = HttpSource::new(&format!("http://{}", addr), "post").unwrap();
        assert_eq!(source.fetch_text("directory.json").await.unwrap(), "[]");
        assert_eq!(source.fetch_text("p1/p1.md").await.unwrap(), "# One");
        assert!(source.fetch_text("p2/p2.md").await.is_err());
    }
}
