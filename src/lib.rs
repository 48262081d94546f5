pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod places;
pub mod web_crawler;

pub use config::{load_config, Config, RunConfig, SearchTerm};
pub use error::{PipelineError, ProviderError};
pub use models::{DetailRecord, OutputRecord, SearchCandidate};
pub use pipeline::Pipeline;
pub use places::{PlacesApi, PlacesClient};
pub use web_crawler::{Crawl, CrawlOutcome, SiteCrawler};
