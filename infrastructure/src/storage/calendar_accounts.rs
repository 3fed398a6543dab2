//! Resolves a business to its owner's connected calendar.
//!
//! business (`businessProfile.placeId`) → `ownerId` → `users/<ownerId>`,
//! whose `calendar` object holds the calendar id and access token.

use super::directory::{BUSINESSES, PLACE_ID_PATH};
use super::document_store::{JsonDocumentStore, field_at};
use async_trait::async_trait;
use neighborly_application::{CalendarAccount, CalendarAccountResolver, CalendarError};
use serde::Deserialize;
use serde_json::{Value, json};

pub const USERS: &str = "users";
const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarConnection {
    #[serde(default)]
    calendar_id: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

pub struct DocumentCalendarAccounts {
    store: JsonDocumentStore,
}

impl DocumentCalendarAccounts {
    pub fn new(store: JsonDocumentStore) -> Self {
        Self { store }
    }

    async fn owner_of(&self, business_id: &str) -> Result<String, CalendarError> {
        let matches = self
            .store
            .find_by_field(BUSINESSES, PLACE_ID_PATH, &json!(business_id))
            .await?;
        matches
            .iter()
            .find_map(|d| field_at(&d.data, "ownerId").and_then(Value::as_str))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| CalendarError::OwnerNotFound(business_id.to_string()))
    }
}

#[async_trait]
impl CalendarAccountResolver for DocumentCalendarAccounts {
    async fn resolve(&self, business_id: &str) -> Result<CalendarAccount, CalendarError> {
        let owner_id = self.owner_of(business_id).await?;
        let user: Option<Value> = self.store.get(USERS, &owner_id).await?;
        let Some(user) = user else {
            return Err(CalendarError::OwnerNotFound(business_id.to_string()));
        };

        let connection = user
            .get("calendar")
            .cloned()
            .and_then(|c| serde_json::from_value::<CalendarConnection>(c).ok());
        let Some(CalendarConnection {
            calendar_id,
            access_token: Some(access_token),
        }) = connection.filter(|c| c.access_token.as_deref().is_some_and(|t| !t.is_empty()))
        else {
            return Err(CalendarError::NotConnected(owner_id));
        };

        Ok(CalendarAccount {
            owner_id,
            calendar_id: calendar_id.unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            access_token,
        })
    }
}
