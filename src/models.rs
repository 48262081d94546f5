use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Marker rendered for any field that could not be resolved. The output
/// schema is always structurally complete, never blank.
pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
}

/// One summary row from a text-search page. Immutable once parsed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
}

/// Full per-entity record from the detail endpoint. Cached by id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub text: Option<LocalizedText>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub places: Vec<SearchCandidate>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Circular location bias for a text search.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct GeoBias {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// Fully merged output row. Column names match the exported spreadsheet.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Complete address")]
    pub address: String,
    #[serde(rename = "Doctor/Clinic name")]
    pub doctor_name: String,
    #[serde(rename = "Specialty (from query)")]
    pub specialty: String,
    #[serde(rename = "Clinic/Hospital")]
    pub organization: String,
    #[serde(rename = "Years of experience")]
    pub years_of_experience: String,
    #[serde(rename = "Contact number")]
    pub phone: String,
    #[serde(rename = "Contact email")]
    pub email: String,
    #[serde(rename = "Ratings")]
    pub rating: String,
    #[serde(rename = "Reviews count")]
    pub review_count: String,
    #[serde(rename = "Pros/Cons summary")]
    pub summary: String,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Place ID")]
    pub place_id: String,
    #[serde(rename = "Locality searched")]
    pub locality: String,
}
