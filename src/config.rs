use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::GeoBias;
use crate::places::paginator::TOKEN_DELAY_MS;
use crate::web_crawler::CrawlConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub pools: PoolsConfig,
    pub crawl: CrawlSettings,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub areas: Vec<AreaConfig>,
    pub specialties: Vec<String>,
    pub results_per_query: usize,
    pub include_reviews: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AreaConfig {
    pub name: String,
    #[serde(default)]
    pub geo_bias: Option<GeoBias>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolsConfig {
    pub detail_workers: usize,
    pub crawl_workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlSettings {
    pub page_timeout_seconds: u64,
    pub max_subpages: usize,
    pub deadline_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub file_name: String,
}

/// One search term handed to the pipeline: "<specialty> in <area>".
#[derive(Debug, Clone)]
pub struct SearchTerm {
    pub specialty: String,
    pub area: String,
    pub geo_bias: Option<GeoBias>,
}

impl SearchTerm {
    pub fn query(&self) -> String {
        format!("{} in {}", self.specialty, self.area)
    }
}

/// Everything the pipeline entry point needs, passed explicitly. The core
/// never reads ambient configuration itself.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub terms: Vec<SearchTerm>,
    pub target_per_term: usize,
    pub include_reviews: bool,
    pub detail_workers: usize,
    pub crawl_workers: usize,
    /// Randomized pause range before a continuation token is used.
    pub token_delay_ms: (u64, u64),
    /// Hard wall-clock bound per crawl enforced by the crawl pool.
    pub crawl_deadline: Duration,
}

impl Config {
    pub fn run_config(&self) -> RunConfig {
        let mut terms = Vec::new();
        for area in &self.search.areas {
            for specialty in &self.search.specialties {
                terms.push(SearchTerm {
                    specialty: specialty.clone(),
                    area: area.name.clone(),
                    geo_bias: area.geo_bias,
                });
            }
        }

        RunConfig {
            terms,
            target_per_term: self.search.results_per_query,
            include_reviews: self.search.include_reviews,
            detail_workers: self.pools.detail_workers,
            crawl_workers: self.pools.crawl_workers,
            token_delay_ms: TOKEN_DELAY_MS,
            crawl_deadline: Duration::from_secs(self.crawl.deadline_seconds),
        }
    }

    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            page_timeout: Duration::from_secs(self.crawl.page_timeout_seconds),
            max_subpages: self.crawl.max_subpages,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                areas: vec![
                    AreaConfig {
                        name: "Aundh, Pune".to_string(),
                        geo_bias: None,
                    },
                    AreaConfig {
                        name: "Baner, Pune".to_string(),
                        geo_bias: None,
                    },
                    AreaConfig {
                        name: "Wakad, Pune".to_string(),
                        geo_bias: None,
                    },
                ],
                specialties: vec![
                    "cardiologist".to_string(),
                    "dermatologist".to_string(),
                    "neurologist".to_string(),
                    "oncologist".to_string(),
                    "general surgeon".to_string(),
                    "orthopedic".to_string(),
                    "neurosurgeon".to_string(),
                    "pediatrician".to_string(),
                    "gynecologist".to_string(),
                    "psychiatrist".to_string(),
                ],
                results_per_query: 15,
                include_reviews: false,
            },
            pools: PoolsConfig {
                detail_workers: 6,
                crawl_workers: 4,
            },
            crawl: CrawlSettings {
                page_timeout_seconds: 8,
                max_subpages: 8,
                deadline_seconds: 8,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                file_name: "clinic_leads.csv".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
