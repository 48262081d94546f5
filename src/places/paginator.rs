// src/places/paginator.rs - drives paged text searches for one query term
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::models::{GeoBias, SearchCandidate};
use crate::places::client::PlacesApi;
use crate::places::retry::{retry_request, BACKOFF_BASE, SEARCH_ATTEMPTS};

/// Provider cap on page size.
pub const PAGE_SIZE_CAP: usize = 50;
/// Safety ceiling against malformed or endlessly-valid continuation tokens.
pub const MAX_PAGES: usize = 25;
/// The backing service needs a moment to materialize the next page before a
/// continuation token becomes usable.
pub const TOKEN_DELAY_MS: (u64, u64) = (1500, 2100);

pub struct SearchPaginator {
    token_delay_ms: (u64, u64),
}

impl SearchPaginator {
    pub fn new(token_delay_ms: (u64, u64)) -> Self {
        Self { token_delay_ms }
    }

    /// Collects up to `target` candidates for one query term. Terminates on
    /// target reached, continuation token absent (normal exhaustion), or the
    /// page ceiling. Errors abort only this term.
    pub async fn collect(
        &self,
        api: &dyn PlacesApi,
        query: &str,
        bias: Option<&GeoBias>,
        target: usize,
    ) -> Result<Vec<SearchCandidate>, ProviderError> {
        let mut out: Vec<SearchCandidate> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        while out.len() < target {
            if pages >= MAX_PAGES {
                warn!(
                    "Page ceiling ({}) hit for '{}' with {} candidates collected",
                    MAX_PAGES,
                    query,
                    out.len()
                );
                break;
            }

            let page_size = (target - out.len()).min(PAGE_SIZE_CAP);
            let token = page_token.clone();
            let response = retry_request(
                || api.text_search(query, page_size, token.as_deref(), bias),
                SEARCH_ATTEMPTS,
                BACKOFF_BASE,
            )
            .await?;
            pages += 1;

            debug!(
                "Page {} for '{}': {} candidates",
                pages,
                query,
                response.places.len()
            );

            for candidate in response.places {
                if out.len() == target {
                    break;
                }
                out.push(candidate);
            }

            match response.next_page_token {
                Some(token) if out.len() < target => {
                    self.pause_for_token().await;
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(out)
    }

    async fn pause_for_token(&self) {
        let (min, max) = self.token_delay_ms;
        let delay = if max > min { fastrand::u64(min..=max) } else { min };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}
