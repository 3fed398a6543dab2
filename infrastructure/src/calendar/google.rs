//! Google Calendar v3 client: free/busy queries and event insertion.
//!
//! Requests authenticate with the owner's OAuth access token as a bearer
//! token. Token refresh is the platform's job; an expired token surfaces
//! as [`CalendarError::Api`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neighborly_application::{CalendarAccount, CalendarApi, CalendarError};
use neighborly_domain::{AppointmentRequest, BusyInterval};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct GoogleCalendarClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<BusyInterval>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

impl GoogleCalendarClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CalendarError::Api(format!("Invalid calendar base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::Api("Calendar base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post(&self, url: Url, token: &str, body: &Value) -> Result<Value, CalendarError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| CalendarError::Api(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CalendarError::Api(format!("{}: {}", status, detail.trim())));
        }
        response
            .json()
            .await
            .map_err(|e| CalendarError::Api(format!("Unreadable response: {}", e)))
    }
}

pub(crate) fn free_busy_body(calendar_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "timeMin": start.to_rfc3339(),
        "timeMax": end.to_rfc3339(),
        "items": [{ "id": calendar_id }],
    })
}

pub(crate) fn event_body(request: &AppointmentRequest) -> Value {
    json!({
        "summary": request.title(),
        "start": { "dateTime": request.start().to_rfc3339() },
        "end": { "dateTime": request.end().to_rfc3339() },
    })
}

pub(crate) fn parse_busy(calendar_id: &str, body: Value) -> Result<Vec<BusyInterval>, CalendarError> {
    let response: FreeBusyResponse = serde_json::from_value(body)
        .map_err(|e| CalendarError::Api(format!("Unexpected freeBusy response: {}", e)))?;
    let Some(calendar) = response.calendars.get(calendar_id) else {
        return Err(CalendarError::Api(format!("Calendar {} missing from freeBusy response", calendar_id)));
    };
    if !calendar.errors.is_empty() {
        return Err(CalendarError::Api(format!("freeBusy errors: {}", Value::from(calendar.errors.clone()))));
    }
    Ok(calendar.busy.clone())
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn free_busy(
        &self,
        account: &CalendarAccount,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError> {
        let url = self.url(&["freeBusy"])?;
        let body = free_busy_body(&account.calendar_id, start, end);
        let response = self.post(url, &account.access_token, &body).await?;
        let busy = parse_busy(&account.calendar_id, response)?;
        debug!(owner = %account.owner_id, busy = busy.len(), "Fetched busy intervals");
        Ok(busy)
    }

    async fn insert_event(
        &self,
        account: &CalendarAccount,
        request: &AppointmentRequest,
    ) -> Result<String, CalendarError> {
        let url = self.url(&["calendars", &account.calendar_id, "events"])?;
        let response = self
            .post(url, &account.access_token, &event_body(request))
            .await?;
        let event: InsertedEvent = serde_json::from_value(response).map_err(|e| {
            warn!(owner = %account.owner_id, error = %e, "Event created but response had no id");
            CalendarError::Api(format!("Unexpected insert response: {}", e))
        })?;
        Ok(event.id)
    }
}
