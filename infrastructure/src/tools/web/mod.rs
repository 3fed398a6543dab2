//! Third-party search tools over HTTP.
//!
//! Both tools need credentials. Without them, or when the remote call
//! fails, they return their negative value instead of an error.

pub mod image;
pub mod search;

pub use image::{UnsplashImageSearch, search_image_definition};
pub use search::{GoogleWebSearch, web_search_definition};

/// Send a request and decode a JSON body, flattening every failure to text.
pub(crate) async fn fetch_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, String> {
    let response = request
        .send()
        .await
        .map_err(|e| format!("request failed: {}", e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("API returned {}", status));
    }
    response
        .json()
        .await
        .map_err(|e| format!("unreadable response: {}", e))
}
