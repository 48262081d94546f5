use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use clinic_scraper::config::{RunConfig, SearchTerm};
use clinic_scraper::error::{PipelineError, ProviderError};
use clinic_scraper::models::{
    DetailRecord, GeoBias, LocalizedText, SearchCandidate, SearchResponse, NOT_AVAILABLE,
};
use clinic_scraper::pipeline::Pipeline;
use clinic_scraper::places::PlacesApi;
use clinic_scraper::web_crawler::{Crawl, CrawlOutcome};

fn term(specialty: &str, area: &str) -> SearchTerm {
    SearchTerm {
        specialty: specialty.to_string(),
        area: area.to_string(),
        geo_bias: None,
    }
}

fn run_config(terms: Vec<SearchTerm>) -> RunConfig {
    RunConfig {
        terms,
        target_per_term: 10,
        include_reviews: false,
        detail_workers: 4,
        crawl_workers: 2,
        token_delay_ms: (0, 0),
        crawl_deadline: Duration::from_secs(2),
    }
}

fn candidate(id: &str, name: &str) -> SearchCandidate {
    SearchCandidate {
        id: id.to_string(),
        display_name: Some(LocalizedText {
            text: name.to_string(),
        }),
        formatted_address: Some(format!("{} Lane, Pune", name)),
        rating: Some(4.2),
        user_rating_count: Some(20),
        ..Default::default()
    }
}

/// Serves the same fixed candidate list for every query; details succeed
/// unless the id is listed as failing.
struct StubPlaces {
    candidates: Vec<SearchCandidate>,
    failing_details: HashSet<String>,
    detail_calls: AtomicU32,
}

impl StubPlaces {
    fn new(candidates: Vec<SearchCandidate>) -> Self {
        Self {
            candidates,
            failing_details: HashSet::new(),
            detail_calls: AtomicU32::new(0),
        }
    }

    fn with_failing_detail(mut self, id: &str) -> Self {
        self.failing_details.insert(id.to_string());
        self
    }
}

#[async_trait]
impl PlacesApi for StubPlaces {
    async fn text_search(
        &self,
        _query: &str,
        _page_size: usize,
        _page_token: Option<&str>,
        _bias: Option<&GeoBias>,
    ) -> Result<SearchResponse, ProviderError> {
        Ok(SearchResponse {
            places: self.candidates.clone(),
            next_page_token: None,
        })
    }

    async fn place_details(
        &self,
        place_id: &str,
        _want_reviews: bool,
    ) -> Result<DetailRecord, ProviderError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.contains(place_id) {
            return Err(ProviderError::Permanent {
                status: Some(404),
                message: "unknown place".to_string(),
            });
        }
        Ok(DetailRecord {
            id: place_id.to_string(),
            display_name: Some(LocalizedText {
                text: format!("Dr. Verma - {} Clinic", place_id),
            }),
            formatted_address: Some("1 Hill Road, Pune".to_string()),
            website_uri: Some(format!("https://{}.example", place_id)),
            national_phone_number: Some("020 5555 0000".to_string()),
            rating: Some(4.6),
            user_rating_count: Some(64),
            ..Default::default()
        })
    }
}

struct FailingPlaces;

#[async_trait]
impl PlacesApi for FailingPlaces {
    async fn text_search(
        &self,
        _query: &str,
        _page_size: usize,
        _page_token: Option<&str>,
        _bias: Option<&GeoBias>,
    ) -> Result<SearchResponse, ProviderError> {
        Err(ProviderError::Permanent {
            status: Some(403),
            message: "API not enabled".to_string(),
        })
    }

    async fn place_details(
        &self,
        _place_id: &str,
        _want_reviews: bool,
    ) -> Result<DetailRecord, ProviderError> {
        unreachable!("search never succeeds")
    }
}

struct StubCrawler {
    outcome: CrawlOutcome,
    calls: AtomicU32,
}

impl StubCrawler {
    fn new(outcome: CrawlOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicU32::new(0),
        }
    }

    fn empty() -> Self {
        Self::new(CrawlOutcome::default())
    }
}

#[async_trait]
impl Crawl for StubCrawler {
    async fn crawl(&self, _url: &str) -> CrawlOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[tokio::test]
async fn each_candidate_id_yields_at_most_one_row() {
    let places = Arc::new(StubPlaces::new(vec![
        candidate("p1", "Alpha Clinic"),
        candidate("p2", "Beta Hospital"),
        candidate("p3", "Gamma Clinic"),
    ]));
    let crawler = Arc::new(StubCrawler::empty());
    let pipeline = Pipeline::new(places.clone(), crawler);

    // Both terms surface the same three candidates.
    let config = run_config(vec![
        term("dermatologist", "Baner, Pune"),
        term("cardiologist", "Baner, Pune"),
    ]);
    let rows = pipeline.run(&config).await.unwrap();

    assert_eq!(rows.len(), 3);
    let ids: HashSet<&str> = rows.iter().map(|r| r.place_id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    // Second term admitted nothing, so no extra detail calls happened.
    assert_eq!(places.detail_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn detail_failure_is_isolated_and_falls_back_to_candidate() {
    let places = Arc::new(
        StubPlaces::new(vec![
            candidate("p1", "Alpha Clinic"),
            candidate("p2", "Beta Hospital"),
        ])
        .with_failing_detail("p2"),
    );
    let crawler = Arc::new(StubCrawler::empty());
    let pipeline = Pipeline::new(places, crawler);

    let rows = pipeline
        .run(&run_config(vec![term("dermatologist", "Baner, Pune")]))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let fallback = rows.iter().find(|r| r.place_id == "p2").unwrap();
    assert_eq!(fallback.organization, "Beta Hospital");
    assert_eq!(fallback.address, "Beta Hospital Lane, Pune");
    // No detail record means no website, so the crawl never ran for it.
    assert_eq!(fallback.email, NOT_AVAILABLE);

    let enriched = rows.iter().find(|r| r.place_id == "p1").unwrap();
    assert_eq!(enriched.doctor_name, "Dr. Verma");
    assert_eq!(enriched.recommendation, "Highly recommended");
}

#[tokio::test]
async fn crawl_outcome_enriches_rows() {
    let places = Arc::new(StubPlaces::new(vec![candidate("p1", "Alpha Clinic")]));
    let crawler = Arc::new(StubCrawler::new(CrawlOutcome {
        email: Some("desk@alpha.example".to_string()),
        years_of_experience: Some(12),
    }));
    let pipeline = Pipeline::new(places, crawler.clone());

    let rows = pipeline
        .run(&run_config(vec![term("dermatologist", "Baner, Pune")]))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "desk@alpha.example");
    assert_eq!(rows[0].years_of_experience, "12");
    assert_eq!(crawler.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_crawl_is_abandoned_without_stalling_the_run() {
    struct SlowCrawler;

    #[async_trait]
    impl Crawl for SlowCrawler {
        async fn crawl(&self, _url: &str) -> CrawlOutcome {
            tokio::time::sleep(Duration::from_secs(30)).await;
            CrawlOutcome {
                email: Some("too@late.example".to_string()),
                years_of_experience: None,
            }
        }
    }

    let places = Arc::new(StubPlaces::new(vec![candidate("p1", "Alpha Clinic")]));
    let pipeline = Pipeline::new(places, Arc::new(SlowCrawler));

    let mut config = run_config(vec![term("dermatologist", "Baner, Pune")]);
    config.crawl_deadline = Duration::from_millis(50);
    let rows = pipeline.run(&config).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, NOT_AVAILABLE);
}

#[tokio::test]
async fn all_terms_failing_surfaces_no_data() {
    let pipeline = Pipeline::new(Arc::new(FailingPlaces), Arc::new(StubCrawler::empty()));

    let result = pipeline
        .run(&run_config(vec![
            term("dermatologist", "Baner, Pune"),
            term("cardiologist", "Aundh, Pune"),
        ]))
        .await;

    assert!(matches!(result, Err(PipelineError::NoData)));
}
