//! CLI entry point for blog-reader

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-reader")]
#[command(version)]
#[command(about = "Read a static Markdown blog described by a directory manifest", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Read content from this site URL instead of the site directory
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the posts in the manifest
    #[command(alias = "ls")]
    List {
        /// Print the list markup instead of a summary
        #[arg(long)]
        html: bool,
    },

    /// Render a single post
    #[command(alias = "open")]
    Show {
        /// Post id from the manifest
        id: String,

        /// Write the whole page to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the site directory locally
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_reader=debug,info"
    } else {
        "blog_reader=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine site directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let url = cli.url.as_deref();

    match cli.command {
        Commands::List { html } => {
            let blog = blog_reader::Blog::new(&base_dir)?;
            blog_reader::commands::list::run(&blog, url, html).await?;
        }

        Commands::Show { id, output } => {
            let blog = blog_reader::Blog::new(&base_dir)?;
            tracing::info!("Opening post {}", id);
            blog_reader::commands::show::run(&blog, url, &id, output.as_deref()).await?;
        }

        Commands::Server { port, ip, open } => {
            let blog = blog_reader::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blog_reader::server::start(&blog, &ip, port, open).await?;
        }

        Commands::Version => {
            println!("blog-reader version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
