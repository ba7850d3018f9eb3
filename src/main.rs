use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use sitemapgen::application::ProgressTracker;
use sitemapgen::infrastructure::config::AppConfig;
use sitemapgen::infrastructure::storage::OutputLayout;
use sitemapgen::interfaces::http::start_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let layout = OutputLayout::new(&config.data_dir);
    layout.ensure_all()?;

    tracing::info!(host = %config.host, port = config.port, "Starting sitemap generator");
    println!(
        "Sitemap generator running at http://{}:{}/",
        config.host, config.port
    );

    let server = start_server(
        &config,
        layout,
        ProgressTracker::new(),
        Arc::new(Mutex::new(Vec::new())),
    )?;

    server.await
}
