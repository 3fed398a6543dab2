//! `web_search`: organic results from the Google Custom Search JSON API.
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |
//!
//! Needs an API key and a programmable search engine id (`cx`); without
//! either the tool answers `{"results": []}`.

use super::fetch_json;
use neighborly_domain::tool::names::WEB_SEARCH;
use neighborly_domain::{SearchResults, ToolDefinition, ToolEffect, ToolParameter, WebSearchResult};
use serde_json::Value;
use tracing::{debug, warn};

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web. Returns titles, links and snippets of the top results.",
        ToolEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::new("query", "The search query", true))
}

pub struct GoogleWebSearch {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleWebSearch {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
            engine_id: None,
        }
    }

    pub fn with_credentials(mut self, api_key: Option<String>, engine_id: Option<String>) -> Self {
        self.api_key = api_key;
        self.engine_id = engine_id.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }

    pub async fn search(&self, query: &str) -> SearchResults<WebSearchResult> {
        let (Some(key), Some(cx)) = (&self.api_key, &self.engine_id) else {
            debug!(tool = WEB_SEARCH, "Web search not configured");
            return SearchResults::empty();
        };

        let request = self
            .client
            .get(&self.base_url)
            .query(&[("key", key.as_str()), ("cx", cx.as_str()), ("q", query)]);
        match fetch_json(request).await {
            Ok(body) => SearchResults::new(parse_items(&body)),
            Err(e) => {
                warn!(tool = WEB_SEARCH, error = %e, "Web search failed");
                SearchResults::empty()
            }
        }
    }
}

/// `items[]` of a Custom Search response; entries without a link are dropped.
fn parse_items(body: &Value) -> Vec<WebSearchResult> {
    let Some(items) = body["items"].as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let link = item["link"].as_str().filter(|l| !l.is_empty())?;
            Some(WebSearchResult {
                title: item["title"].as_str().unwrap_or_default().to_string(),
                link: link.to_string(),
                snippet: item["snippet"].as_str().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}
