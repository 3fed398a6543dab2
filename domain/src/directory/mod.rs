//! Read-only projections of platform data handed to the model as context.
//!
//! None of these are persisted by the flow layer. Each tool outcome type
//! carries its own negative shape (`NotFound`, empty list, placeholder) so
//! a failed lookup never has to be expressed as an error.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Photo id returned when no image could be found.
pub const PLACEHOLDER_PHOTO_ID: &str = "placeholder";

/// Directory entry for a business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Outcome of a business lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessLookup {
    Found(BusinessInfo),
    NotFound,
}

impl BusinessLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, BusinessLookup::Found(_))
    }

    pub fn business(&self) -> Option<&BusinessInfo> {
        match self {
            BusinessLookup::Found(info) => Some(info),
            BusinessLookup::NotFound => None,
        }
    }
}

impl From<Option<BusinessInfo>> for BusinessLookup {
    fn from(value: Option<BusinessInfo>) -> Self {
        value.map_or(BusinessLookup::NotFound, BusinessLookup::Found)
    }
}

/// `{"isFound": false}` or `{"isFound": true, "name": ..., ...}`.
impl Serialize for BusinessLookup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BusinessLookup::NotFound => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("isFound", &false)?;
                map.end()
            }
            BusinessLookup::Found(info) => {
                let mut map = serializer.serialize_map(Some(7))?;
                map.serialize_entry("isFound", &true)?;
                map.serialize_entry("name", &info.name)?;
                map.serialize_entry("category", &info.category)?;
                map.serialize_entry("address", &info.address)?;
                map.serialize_entry("phone", &info.phone)?;
                map.serialize_entry("website", &info.website)?;
                map.serialize_entry("description", &info.description)?;
                map.end()
            }
        }
    }
}

/// A passage from the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub content: String,
    pub source: String,
}

/// Result list wrapper used by search tools: `{"results": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub results: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self { results }
    }

    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One organic web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Suggested stock photo for generated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSuggestion {
    pub photo_id: String,
    pub image_hint: String,
}

impl ImageSuggestion {
    pub fn new(photo_id: impl Into<String>, image_hint: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            image_hint: image_hint.into(),
        }
    }

    /// Placeholder carrying the query as its hint.
    pub fn placeholder(query: &str) -> Self {
        Self::new(PLACEHOLDER_PHOTO_ID, hint_from_query(query))
    }

    pub fn is_placeholder(&self) -> bool {
        self.photo_id == PLACEHOLDER_PHOTO_ID
    }
}

/// Image hints are at most two keywords.
pub fn hint_from_query(query: &str) -> String {
    query
        .split_whitespace()
        .take(2)
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
