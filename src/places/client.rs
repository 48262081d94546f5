// src/places/client.rs - Places v1 text search + detail-by-id
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::models::{DetailRecord, GeoBias, SearchResponse};

const TEXT_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";
const DETAIL_URL_BASE: &str = "https://places.googleapis.com/v1/places";

// Field masks control payload size and billing tier per request.
const TEXT_FIELDS: &str = "places.id,places.displayName,places.formattedAddress,\
places.types,places.rating,places.userRatingCount,places.websiteUri,\
places.nationalPhoneNumber,nextPageToken";
const DETAIL_FIELDS_BASE: &str = "id,displayName,formattedAddress,types,websiteUri,\
nationalPhoneNumber,internationalPhoneNumber,rating,userRatingCount";

/// Seam over the search/detail endpoints so the pipeline and its tests can
/// run against stub providers.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn text_search(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
        bias: Option<&GeoBias>,
    ) -> Result<SearchResponse, ProviderError>;

    async fn place_details(
        &self,
        place_id: &str,
        want_reviews: bool,
    ) -> Result<DetailRecord, ProviderError>;
}

pub struct PlacesClient {
    client: Client,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_key }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Provider returned {}: {}", status, body);
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        response.json::<T>().await.map_err(|e| ProviderError::Permanent {
            status: None,
            message: format!("malformed response body: {}", e),
        })
    }
}

#[async_trait]
impl PlacesApi for PlacesClient {
    async fn text_search(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
        bias: Option<&GeoBias>,
    ) -> Result<SearchResponse, ProviderError> {
        debug!("Text search '{}' (page_size={})", query, page_size);

        let mut payload = json!({
            "textQuery": query,
            "pageSize": page_size,
        });
        if let Some(token) = page_token {
            payload["pageToken"] = json!(token);
        }
        if let Some(bias) = bias {
            payload["locationBias"] = json!({
                "circle": {
                    "center": {
                        "latitude": bias.latitude,
                        "longitude": bias.longitude,
                    },
                    "radius": bias.radius_meters,
                }
            });
        }

        let response = self
            .client
            .post(TEXT_SEARCH_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", TEXT_FIELDS)
            .json(&payload)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        Self::read_json(response).await
    }

    async fn place_details(
        &self,
        place_id: &str,
        want_reviews: bool,
    ) -> Result<DetailRecord, ProviderError> {
        debug!("Fetching details for {}", place_id);

        let fields = if want_reviews {
            format!("{},reviews", DETAIL_FIELDS_BASE)
        } else {
            DETAIL_FIELDS_BASE.to_string()
        };

        let response = self
            .client
            .get(format!("{}/{}", DETAIL_URL_BASE, place_id))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", fields)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        Self::read_json(response).await
    }
}
