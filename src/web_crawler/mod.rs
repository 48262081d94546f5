pub mod contact_extractor;
pub mod crawler;
pub mod types;

// Re-export the main types for easy importing
pub use contact_extractor::ContactExtractor;
pub use crawler::{Crawl, SiteCrawler};
pub use types::{CrawlConfig, CrawlOutcome};
