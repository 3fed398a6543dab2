//! Calendar ports: who owns a business calendar, and how to query it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use neighborly_domain::{AppointmentRequest, BusyInterval};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("No calendar owner for business {0}")]
    OwnerNotFound(String),

    #[error("Calendar owner {0} has not connected a calendar")]
    NotConnected(String),

    #[error("Calendar API error: {0}")]
    Api(String),

    #[error(transparent)]
    Storage(#[from] crate::ports::repository::RepositoryError),
}

/// Delegated access to one owner's calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarAccount {
    pub owner_id: String,
    pub calendar_id: String,
    pub access_token: String,
}

/// Resolves a business to the calendar of the account that owns it.
#[async_trait]
pub trait CalendarAccountResolver: Send + Sync {
    async fn resolve(&self, business_id: &str) -> Result<CalendarAccount, CalendarError>;
}

#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn free_busy(
        &self,
        account: &CalendarAccount,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarError>;

    /// Create an event; returns the event id.
    async fn insert_event(
        &self,
        account: &CalendarAccount,
        request: &AppointmentRequest,
    ) -> Result<String, CalendarError>;
}
