//! `search_image`: a stock photo suggestion from Unsplash `search/photos`.
//!
//! Falls back to the placeholder photo when no access key is configured,
//! the call fails, or nothing matches.

use super::fetch_json;
use neighborly_domain::directory::hint_from_query;
use neighborly_domain::tool::names::SEARCH_IMAGE;
use neighborly_domain::{ImageSuggestion, ToolDefinition, ToolEffect, ToolParameter};
use serde_json::Value;
use tracing::{debug, warn};

pub fn search_image_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_IMAGE,
        "Find a stock photo for a topic. Returns a photo id and a short image hint.",
        ToolEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::new("query", "One or two keywords describing the image", true))
}

pub struct UnsplashImageSearch {
    client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
}

impl UnsplashImageSearch {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_key: None,
        }
    }

    pub fn with_access_key(mut self, access_key: Option<String>) -> Self {
        self.access_key = access_key;
        self
    }

    pub async fn search(&self, query: &str) -> ImageSuggestion {
        let Some(key) = &self.access_key else {
            debug!(tool = SEARCH_IMAGE, "Image search not configured");
            return ImageSuggestion::placeholder(query);
        };

        let url = format!("{}/search/photos", self.base_url.trim_end_matches('/'));
        let request = self
            .client
            .get(url)
            .header("Authorization", format!("Client-ID {}", key))
            .header("Accept-Version", "v1")
            .query(&[("query", query), ("per_page", "1")]);
        match fetch_json(request).await {
            Ok(body) => first_photo(&body, query),
            Err(e) => {
                warn!(tool = SEARCH_IMAGE, error = %e, "Image search failed");
                ImageSuggestion::placeholder(query)
            }
        }
    }
}

fn first_photo(body: &Value, query: &str) -> ImageSuggestion {
    body["results"]
        .as_array()
        .and_then(|results| results.first())
        .and_then(|photo| photo["id"].as_str())
        .filter(|id| !id.is_empty())
        .map(|id| ImageSuggestion::new(id, hint_from_query(query)))
        .unwrap_or_else(|| ImageSuggestion::placeholder(query))
}
