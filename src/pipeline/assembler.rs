// src/pipeline/assembler.rs - merges candidate + detail + crawl into one row
use regex::Regex;

use crate::config::SearchTerm;
use crate::models::{
    DetailRecord, OutputRecord, Review, SearchCandidate, NOT_AVAILABLE,
};
use crate::web_crawler::CrawlOutcome;

const CLINIC_KEYWORDS: [&str; 8] = [
    "clinic",
    "hospital",
    "centre",
    "center",
    "medical",
    "healthcare",
    "polyclinic",
    "care",
];

const NAME_SEPARATORS: [char; 5] = ['-', '|', ',', ':', '–'];

pub struct ResultAssembler {
    honorific: Regex,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self {
            honorific: Regex::new(r"^(?:Dr|Drs|Prof)\.?$").unwrap(),
        }
    }

    /// Produces one output row. Name/address/phone/website prefer the detail
    /// record and fall back to the search summary when detail resolution
    /// failed. Unresolved fields render the explicit marker, never a blank.
    pub fn assemble(
        &self,
        candidate: &SearchCandidate,
        detail: Option<&DetailRecord>,
        crawl: Option<&CrawlOutcome>,
        term: &SearchTerm,
    ) -> OutputRecord {
        let name = detail
            .and_then(|d| d.display_name.as_ref())
            .map(|t| t.text.clone())
            .or_else(|| candidate.display_name.as_ref().map(|t| t.text.clone()));
        let address = detail
            .and_then(|d| d.formatted_address.clone())
            .or_else(|| candidate.formatted_address.clone());
        let phone = detail
            .and_then(|d| {
                d.international_phone_number
                    .clone()
                    .or_else(|| d.national_phone_number.clone())
            })
            .or_else(|| candidate.national_phone_number.clone());
        let website = detail
            .and_then(|d| d.website_uri.clone())
            .or_else(|| candidate.website_uri.clone());
        let rating = detail.and_then(|d| d.rating).or(candidate.rating);
        let review_count = detail
            .and_then(|d| d.user_rating_count)
            .or(candidate.user_rating_count);

        let (person, organization) = match name.as_deref() {
            Some(full) => self.split_name(full),
            None => (None, None),
        };

        OutputRecord {
            address: or_not_available(address),
            doctor_name: or_not_available(person),
            specialty: title_case(&term.specialty),
            organization: or_not_available(organization),
            years_of_experience: or_not_available(
                crawl
                    .and_then(|c| c.years_of_experience)
                    .map(|y| y.to_string()),
            ),
            phone: or_not_available(phone),
            email: or_not_available(crawl.and_then(|c| c.email.clone())),
            rating: or_not_available(rating.map(|r| format!("{:.1}", r))),
            review_count: or_not_available(review_count.map(|c| c.to_string())),
            summary: or_not_available(detail.and_then(|d| summarize_reviews(&d.reviews))),
            recommendation: recommendation(rating, review_count).to_string(),
            website: or_not_available(website),
            place_id: candidate.id.clone(),
            locality: term.area.clone(),
        }
    }

    /// Splits "Dr. <Name> - <Clinic>" style display names. A leading
    /// honorific followed by capitalized tokens is the person; remaining
    /// text counts as the organization only when it carries a
    /// clinic/hospital-type keyword. Without an honorific the whole name is
    /// the organization.
    pub fn split_name(&self, full: &str) -> (Option<String>, Option<String>) {
        let full = full.trim();
        if full.is_empty() {
            return (None, None);
        }

        let tokens: Vec<&str> = full.split_whitespace().collect();
        if !self.honorific.is_match(tokens[0]) {
            return (None, Some(full.to_string()));
        }

        let mut person = vec![tokens[0]];
        let mut idx = 1;
        while idx < tokens.len() && person.len() <= 3 {
            let token = tokens[idx];
            let starts_upper = token.chars().next().is_some_and(|c| c.is_uppercase());
            if token.chars().all(|c| NAME_SEPARATORS.contains(&c))
                || is_clinic_keyword(token)
                || !starts_upper
            {
                break;
            }
            person.push(token);
            idx += 1;
        }

        if person.len() == 1 {
            // Honorific with nothing usable after it.
            return (None, Some(full.to_string()));
        }

        let remainder = tokens[idx..]
            .join(" ")
            .trim_matches(|c: char| NAME_SEPARATORS.contains(&c) || c.is_whitespace())
            .to_string();
        let organization = if !remainder.is_empty() && contains_clinic_keyword(&remainder) {
            Some(remainder)
        } else {
            None
        };

        (Some(person.join(" ")), organization)
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Recommendation tier from rating and review count.
pub fn recommendation(rating: Option<f64>, review_count: Option<u32>) -> &'static str {
    match (rating, review_count) {
        (Some(r), Some(c)) if r >= 4.5 && c >= 50 => "Highly recommended",
        (Some(r), Some(c)) if r >= 4.0 && c >= 10 => "Recommended",
        (Some(_), Some(c)) if c > 0 => "Consider with caution",
        _ => "Insufficient data",
    }
}

/// Joins the first five review snippets, trimmed to 140 chars each.
pub fn summarize_reviews(reviews: &[Review]) -> Option<String> {
    let snippets: Vec<String> = reviews
        .iter()
        .take(5)
        .filter_map(|r| r.text.as_ref())
        .map(|t| t.text.trim().replace('\n', " "))
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(140).collect())
        .collect();

    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join(" | "))
    }
}

fn or_not_available(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn is_clinic_keyword(token: &str) -> bool {
    let token = token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    CLINIC_KEYWORDS.contains(&token.as_str())
}

fn contains_clinic_keyword(text: &str) -> bool {
    let text = text.to_lowercase();
    CLINIC_KEYWORDS.iter().any(|k| text.contains(k))
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
