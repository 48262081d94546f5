// src/web_crawler/types.rs
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Best-effort extraction result for one website. Both fields are
/// independently nullable; the all-None outcome is a valid, cacheable
/// negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub email: Option<String>,
    pub years_of_experience: Option<u32>,
}

impl CrawlOutcome {
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && self.years_of_experience.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.years_of_experience.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub page_timeout: Duration,
    pub max_subpages: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(8),
            max_subpages: 8,
        }
    }
}
