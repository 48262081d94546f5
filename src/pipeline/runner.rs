// src/pipeline/runner.rs - drives the enrichment pipeline for one run
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::PipelineError;
use crate::models::OutputRecord;
use crate::pipeline::assembler::ResultAssembler;
use crate::pipeline::cache::TtlCache;
use crate::pipeline::dedup::DedupRegistry;
use crate::pipeline::detail::{DetailFetcher, DETAIL_CACHE_TTL};
use crate::places::client::PlacesApi;
use crate::places::paginator::SearchPaginator;
use crate::web_crawler::Crawl;

/// One control task driving two bounded worker pools: detail fetches and
/// website crawls. Backpressure comes purely from the pool capacities; no
/// unbounded queue sits between stages.
pub struct Pipeline {
    places: Arc<dyn PlacesApi>,
    crawler: Arc<dyn Crawl>,
    dedup: DedupRegistry,
    detail: DetailFetcher,
    assembler: ResultAssembler,
}

impl Pipeline {
    pub fn new(places: Arc<dyn PlacesApi>, crawler: Arc<dyn Crawl>) -> Self {
        let detail_cache = Arc::new(TtlCache::new(DETAIL_CACHE_TTL));
        let detail = DetailFetcher::new(Arc::clone(&places), detail_cache);

        Self {
            places,
            crawler,
            dedup: DedupRegistry::new(),
            detail,
            assembler: ResultAssembler::new(),
        }
    }

    /// Runs every query term to completion and returns the unordered result
    /// rows. Per-candidate failures are isolated; a failed term is logged
    /// and skipped. Only the total failure of every term is an error.
    pub async fn run(&self, config: &RunConfig) -> Result<Vec<OutputRecord>, PipelineError> {
        let paginator = SearchPaginator::new(config.token_delay_ms);
        let mut rows: Vec<OutputRecord> = Vec::new();
        let mut failed_terms = 0usize;

        for term in &config.terms {
            let query = term.query();
            info!("Searching: {}", query);

            let candidates = match paginator
                .collect(
                    self.places.as_ref(),
                    &query,
                    term.geo_bias.as_ref(),
                    config.target_per_term,
                )
                .await
            {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!("Search failed for '{}': {}", query, err);
                    failed_terms += 1;
                    continue;
                }
            };

            // Ids already processed under an earlier term are dropped here,
            // so each id yields at most one output row per run.
            let admitted: Vec<_> = candidates
                .into_iter()
                .filter(|c| self.dedup.admit(&c.id))
                .collect();
            info!("{} new candidates for '{}'", admitted.len(), query);

            let fetcher = self.detail.clone();
            let term_rows: Vec<OutputRecord> = stream::iter(admitted)
                .map(|candidate| {
                    let fetcher = fetcher.clone();
                    async move {
                        let detail = match fetcher.fetch(&candidate.id, config.include_reviews).await
                        {
                            Ok(detail) => Some(detail),
                            Err(err) => {
                                warn!("Detail fetch failed for {}: {}", candidate.id, err);
                                None
                            }
                        };
                        (candidate, detail)
                    }
                })
                .buffer_unordered(config.detail_workers)
                .map(|(candidate, detail)| {
                    let crawler = Arc::clone(&self.crawler);
                    let assembler = &self.assembler;
                    async move {
                        let website = detail.as_ref().and_then(|d| d.website_uri.clone());
                        let crawl = match website {
                            Some(url) if !url.is_empty() => {
                                crawl_with_deadline(crawler, url, config.crawl_deadline).await
                            }
                            _ => None,
                        };
                        assembler.assemble(&candidate, detail.as_ref(), crawl.as_ref(), term)
                    }
                })
                .buffer_unordered(config.crawl_workers)
                .collect()
                .await;

            rows.extend(term_rows);
        }

        if !config.terms.is_empty() && failed_terms == config.terms.len() {
            return Err(PipelineError::NoData);
        }

        info!("Run complete: {} rows from {} terms", rows.len(), config.terms.len());
        Ok(rows)
    }
}

/// Enforces the per-crawl wall-clock bound. A crawl that outlives the
/// deadline is abandoned for this run but keeps running in the background,
/// so its outcome can still land in the cache for future runs.
async fn crawl_with_deadline(
    crawler: Arc<dyn Crawl>,
    url: String,
    deadline: Duration,
) -> Option<crate::web_crawler::CrawlOutcome> {
    let log_url = url.clone();
    let handle = tokio::spawn(async move { crawler.crawl(&url).await });

    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(outcome)) => Some(outcome),
        Ok(Err(err)) => {
            warn!("Crawl task for {} panicked: {}", log_url, err);
            None
        }
        Err(_) => {
            debug!("Crawl deadline expired for {}", log_url);
            None
        }
    }
}
