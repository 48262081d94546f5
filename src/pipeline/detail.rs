// src/pipeline/detail.rs - TTL-cached, retried detail resolution
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::ProviderError;
use crate::models::DetailRecord;
use crate::pipeline::cache::TtlCache;
use crate::places::client::PlacesApi;
use crate::places::retry::{retry_request, BACKOFF_BASE, DETAIL_ATTEMPTS};

/// Repeated fetches within this horizon are served from the cache.
pub const DETAIL_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Resolves detail records by id. Cloned into every detail-pool worker; the
/// cache is shared. A failure here is isolated by the caller and never
/// aborts sibling candidates.
#[derive(Clone)]
pub struct DetailFetcher {
    api: Arc<dyn PlacesApi>,
    cache: Arc<TtlCache<String, DetailRecord>>,
}

impl DetailFetcher {
    pub fn new(api: Arc<dyn PlacesApi>, cache: Arc<TtlCache<String, DetailRecord>>) -> Self {
        Self { api, cache }
    }

    pub async fn fetch(
        &self,
        place_id: &str,
        want_reviews: bool,
    ) -> Result<DetailRecord, ProviderError> {
        if let Some(hit) = self.cache.get(place_id) {
            debug!("Detail cache hit for {}", place_id);
            return Ok(hit);
        }

        let record = retry_request(
            || self.api.place_details(place_id, want_reviews),
            DETAIL_ATTEMPTS,
            BACKOFF_BASE,
        )
        .await?;

        self.cache.insert(place_id.to_string(), record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::models::{GeoBias, SearchResponse};

    struct CountingDetails {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PlacesApi for CountingDetails {
        async fn text_search(
            &self,
            _query: &str,
            _page_size: usize,
            _page_token: Option<&str>,
            _bias: Option<&GeoBias>,
        ) -> Result<SearchResponse, ProviderError> {
            unreachable!("detail fetcher never searches")
        }

        async fn place_details(
            &self,
            place_id: &str,
            _want_reviews: bool,
        ) -> Result<DetailRecord, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DetailRecord {
                id: place_id.to_string(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn cache_short_circuits_repeat_fetches() {
        let api = Arc::new(CountingDetails {
            calls: AtomicU32::new(0),
        });
        let cache = Arc::new(TtlCache::new(DETAIL_CACHE_TTL));
        let fetcher = DetailFetcher::new(api.clone(), cache);

        let first = fetcher.fetch("ChIJabc", false).await.unwrap();
        let second = fetcher.fetch("ChIJabc", false).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}
