// src/web_crawler/contact_extractor.rs - per-page email/tenure heuristics
use chrono::{Datelike, Utc};
use regex::Regex;
use scraper::{Html, Selector};

use crate::web_crawler::types::CrawlOutcome;

/// Years implied by "since <year>" are only plausible within this range.
const MIN_FOUNDING_YEAR: i32 = 1970;

/// Ordered pattern matchers over normalized page text. Regexes are compiled
/// once; the same content always yields the same (email, years) pair.
pub struct ContactExtractor {
    email: Regex,
    obfuscated_email: Regex,
    years_direct: Regex,
    years_over: Regex,
    since_year: Regex,
    practicing_since: Regex,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            // "name [at] domain [dot] com" and close variants
            obfuscated_email: Regex::new(
                r"(?i)([A-Za-z0-9._%+-]+)\s*(?:\[at\]|\(at\)|\bat\b|@)\s*([A-Za-z0-9-]+)\s*(?:\[dot\]|\(dot\)|\bdot\b|\.)\s*([A-Za-z]{2,})",
            )
            .unwrap(),
            years_direct: Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\s*(?:of\s+)?experience")
                .unwrap(),
            years_over: Regex::new(r"(?i)\bover\s+(\d{1,2})\s*(?:years?|yrs?)\b").unwrap(),
            since_year: Regex::new(r"(?i)\bsince\s+((?:19|20)\d{2})\b").unwrap(),
            practicing_since: Regex::new(r"(?i)\bpracticing\s+since\s+((?:19|20)\d{2})\b").unwrap(),
        }
    }

    /// Runs the full per-page search: email tiers against the parsed
    /// document, tenure heuristics against the normalized text.
    pub fn extract_page(&self, html: &str) -> CrawlOutcome {
        let document = Html::parse_document(html);
        let text = clean_text(&document);

        CrawlOutcome {
            email: self.extract_email(&document, &text),
            years_of_experience: self.extract_years(&text),
        }
    }

    /// Strict priority order: mailto anchors, JSON-LD email fields, plain
    /// text, obfuscated text. The first matching tier wins; lower tiers are
    /// not consulted.
    pub fn extract_email(&self, document: &Html, text: &str) -> Option<String> {
        self.mailto_email(document)
            .or_else(|| self.json_ld_email(document))
            .or_else(|| self.plain_text_email(text))
            .or_else(|| self.obfuscated_text_email(text))
    }

    fn mailto_email(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(r#"a[href^="mailto:"]"#).unwrap();
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let address = href
                .trim_start_matches("mailto:")
                .split('?')
                .next()
                .unwrap_or("")
                .trim();
            if self.is_full_email(address) {
                return Some(address.to_string());
            }
        }
        None
    }

    fn json_ld_email(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
        for node in document.select(&selector) {
            let raw = node.text().collect::<String>();
            let Ok(data) = serde_json::from_str::<serde_json::Value>(&raw) else {
                continue;
            };
            let objects = match data {
                serde_json::Value::Array(items) => items,
                other => vec![other],
            };
            for object in objects {
                if let Some(email) = object.get("email").and_then(|v| v.as_str()) {
                    let email = email.trim();
                    if !email.is_empty() {
                        return Some(email.to_string());
                    }
                }
            }
        }
        None
    }

    fn plain_text_email(&self, text: &str) -> Option<String> {
        self.email.find(text).map(|m| m.as_str().to_string())
    }

    fn obfuscated_text_email(&self, text: &str) -> Option<String> {
        self.obfuscated_email.captures(text).map(|caps| {
            format!("{}@{}.{}", &caps[1], &caps[2], &caps[3])
        })
    }

    /// Ordered heuristics; the first that produces a value wins. Year-based
    /// forms convert to an elapsed count against the current calendar year.
    pub fn extract_years(&self, text: &str) -> Option<u32> {
        self.extract_years_at(text, Utc::now().year())
    }

    pub fn extract_years_at(&self, text: &str, now_year: i32) -> Option<u32> {
        self.direct_years(text)
            .or_else(|| self.over_years(text))
            .or_else(|| self.since_years(&self.since_year, text, now_year))
            .or_else(|| self.since_years(&self.practicing_since, text, now_year))
    }

    fn direct_years(&self, text: &str) -> Option<u32> {
        self.years_direct
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }

    fn over_years(&self, text: &str) -> Option<u32> {
        self.years_over
            .captures(text)
            .and_then(|caps| caps[1].parse().ok())
    }

    fn since_years(&self, pattern: &Regex, text: &str, now_year: i32) -> Option<u32> {
        let year: i32 = pattern.captures(text)?.get(1)?.as_str().parse().ok()?;
        if (MIN_FOUNDING_YEAR..=now_year).contains(&year) {
            Some((now_year - year) as u32)
        } else {
            None
        }
    }

    fn is_full_email(&self, value: &str) -> bool {
        self.email
            .find(value)
            .is_some_and(|m| m.start() == 0 && m.end() == value.len())
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace-normalized visible text of the page body.
pub fn clean_text(document: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let text = match document.select(&body_selector).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
