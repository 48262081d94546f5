use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clinic_scraper::config::{load_config, Config};
use clinic_scraper::export::write_csv;
use clinic_scraper::models::Result;
use clinic_scraper::pipeline::Pipeline;
use clinic_scraper::places::PlacesClient;
use clinic_scraper::web_crawler::SiteCrawler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    std::env::set_var("RUST_LOG", "clinic_scraper=info,hyper=warn,reqwest=warn");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            format!("clinic_scraper={}", config.logging.level)
                .parse()
                .unwrap(),
        ))
        .with_max_level(tracing::Level::INFO)
        .init();

    let api_key = std::env::var("GOOGLE_API_KEY")
        .map_err(|_| "Missing GOOGLE_API_KEY (set it in the environment or a .env file)")?;

    // Create output directory
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let places = Arc::new(PlacesClient::new(api_key));
    let crawler = Arc::new(SiteCrawler::new(config.crawl_config()));
    let pipeline = Pipeline::new(places, crawler);
    let run_config = config.run_config();

    info!(
        "Starting run: {} terms, target {} per term",
        run_config.terms.len(),
        run_config.target_per_term
    );

    // Add graceful shutdown
    tokio::select! {
        result = pipeline.run(&run_config) => {
            let rows = result?;
            let path = std::path::Path::new(&config.output.directory)
                .join(&config.output.file_name);
            write_csv(&path, &rows)?;
            info!("Done. {} rows.", rows.len());
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
