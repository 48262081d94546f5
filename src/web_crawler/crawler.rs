// src/web_crawler/crawler.rs - bounded one-hop crawl of a candidate website
use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::pipeline::cache::TtlCache;
use crate::web_crawler::contact_extractor::ContactExtractor;
use crate::web_crawler::types::{CrawlConfig, CrawlOutcome};

/// Crawl outcomes, including empty ones, are honored for this long.
pub const CRAWL_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Links whose URL or anchor text mention one of these are worth a visit
/// when the homepage leaves a field unresolved.
const SUBPAGE_KEYWORDS: [&str; 7] = [
    "contact",
    "about",
    "team",
    "doctor",
    "providers",
    "staff",
    "meet",
];

/// Seam over the crawler so the pipeline and its tests can substitute stubs.
#[async_trait]
pub trait Crawl: Send + Sync {
    async fn crawl(&self, url: &str) -> CrawlOutcome;
}

pub struct SiteCrawler {
    client: Client,
    extractor: ContactExtractor,
    config: CrawlConfig,
    cache: TtlCache<String, CrawlOutcome>,
}

impl SiteCrawler {
    pub fn new(config: CrawlConfig) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; ClinicScraper/1.0)")
            .timeout(config.page_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            extractor: ContactExtractor::new(),
            config,
            cache: TtlCache::new(CRAWL_CACHE_TTL),
        }
    }

    /// Crawling is best-effort, not transactional: any fetch or parse
    /// failure yields nothing rather than an error.
    async fn fetch_page(&self, url: &str) -> Option<String> {
        let response = self.client.get(url).send().await.ok()?;
        if !response.status().is_success() {
            debug!("Skipping {} ({})", url, response.status());
            return None;
        }
        response.text().await.ok()
    }

    async fn crawl_site(&self, url: &str) -> CrawlOutcome {
        let Some(homepage) = self.fetch_page(url).await else {
            return CrawlOutcome::default();
        };

        let mut outcome = self.extractor.extract_page(&homepage);
        if outcome.is_complete() {
            return outcome;
        }

        // One hop only: subpage candidates come from the homepage alone.
        let links = subpage_candidates(&homepage, url, self.config.max_subpages);
        let mut visited: HashSet<String> = HashSet::from([url.to_string()]);

        for link in links {
            if outcome.is_complete() {
                break;
            }
            if !visited.insert(link.clone()) {
                continue;
            }
            let Some(html) = self.fetch_page(&link).await else {
                continue;
            };

            let page = self.extractor.extract_page(&html);
            if outcome.email.is_none() {
                outcome.email = page.email;
            }
            if outcome.years_of_experience.is_none() {
                outcome.years_of_experience = page.years_of_experience;
            }
        }

        outcome
    }
}

#[async_trait]
impl Crawl for SiteCrawler {
    async fn crawl(&self, url: &str) -> CrawlOutcome {
        if let Some(hit) = self.cache.get(url) {
            debug!("Crawl cache hit for {}", url);
            return hit;
        }

        let started = Instant::now();
        let outcome = self.crawl_site(url).await;
        info!(
            "Crawled {} in {}ms: email={}, years={}",
            url,
            started.elapsed().as_millis(),
            outcome.email.is_some(),
            outcome.years_of_experience.is_some()
        );

        self.cache.insert(url.to_string(), outcome.clone());
        outcome
    }
}

/// Internal links whose URL or anchor text match the contact-relevant
/// keyword set, resolved against the homepage and capped at `max`.
fn subpage_candidates(html: &str, base_url: &str, max: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();
    let base = Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href_lower = href.to_lowercase();
        let anchor_text = element.text().collect::<String>().to_lowercase();
        if !SUBPAGE_KEYWORDS
            .iter()
            .any(|k| href_lower.contains(k) || anchor_text.contains(k))
        {
            continue;
        }

        let resolved = match Url::parse(href) {
            Ok(url) => url,
            Err(_) => match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(url) => url,
                None => continue,
            },
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        // The crawl never leaves the site.
        if let (Some(base), Some(host)) = (base.as_ref(), resolved.host_str()) {
            if base.host_str().is_some_and(|base_host| base_host != host) {
                continue;
            }
        }

        let resolved = resolved.to_string();
        if resolved == base_url {
            continue;
        }
        if seen.insert(resolved.clone()) {
            out.push(resolved);
            if out.len() == max {
                break;
            }
        }
    }

    out
}
