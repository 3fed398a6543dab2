//! `check_availability` and `create_appointment` against a business owner's
//! calendar.
//!
//! Both resolve the business to its owner's connected calendar first. Any
//! failure after argument parsing is logged and returned as the tool's
//! negative value (`availableSlots: []` with an error text, or
//! `success: false`).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use neighborly_application::{CalendarAccountResolver, CalendarApi, CalendarError};
use neighborly_domain::tool::names::{CHECK_AVAILABILITY, CREATE_APPOINTMENT};
use neighborly_domain::{
    AppointmentOutcome, AppointmentRequest, Availability, ToolDefinition, ToolEffect, ToolParameter,
    WorkingHours, available_slots,
};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 60;

pub fn check_availability_definition() -> ToolDefinition {
    ToolDefinition::new(
        CHECK_AVAILABILITY,
        "List the free one-hour appointment slots a business has on a given day.",
        ToolEffect::ReadOnly,
    )
    .with_parameter(ToolParameter::new("businessId", "Place id of the business", true))
    .with_parameter(ToolParameter::new("date", "Day to check", true).with_type("date"))
}

pub fn create_appointment_definition() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_APPOINTMENT,
        "Book an appointment in a business owner's calendar. Only call this after the \
         participant has confirmed the time.",
        ToolEffect::Mutating,
    )
    .with_parameter(ToolParameter::new("businessId", "Place id of the business", true))
    .with_parameter(ToolParameter::new("title", "Short title for the appointment", true))
    .with_parameter(ToolParameter::new("startTime", "When the appointment starts", true).with_type("datetime"))
    .with_parameter(
        ToolParameter::new("durationMinutes", "Length in minutes (default 60)", false).with_type("integer"),
    )
}

pub struct CalendarTools {
    accounts: Arc<dyn CalendarAccountResolver>,
    api: Arc<dyn CalendarApi>,
    hours: WorkingHours,
    default_duration_minutes: i64,
}

impl CalendarTools {
    pub fn new(accounts: Arc<dyn CalendarAccountResolver>, api: Arc<dyn CalendarApi>) -> Self {
        Self {
            accounts,
            api,
            hours: WorkingHours::default(),
            default_duration_minutes: DEFAULT_APPOINTMENT_MINUTES,
        }
    }

    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_default_duration(mut self, minutes: i64) -> Self {
        self.default_duration_minutes = minutes;
        self
    }

    pub async fn check_availability(&self, business_id: &str, date: &str) -> Availability {
        let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
            return Availability::unavailable(format!("Invalid date '{}', expected YYYY-MM-DD", date));
        };

        match self.busy_slots(business_id, day).await {
            Ok(slots) => Availability::slots(slots),
            Err(e) => {
                warn!(tool = CHECK_AVAILABILITY, business_id, error = %e, "Availability check failed");
                Availability::unavailable(e.to_string())
            }
        }
    }

    async fn busy_slots(&self, business_id: &str, day: NaiveDate) -> Result<Vec<String>, CalendarError> {
        let account = self.accounts.resolve(business_id).await?;
        let (start, end) = self.hours.window(day);
        let busy = self.api.free_busy(&account, start, end).await?;
        Ok(available_slots(day, &self.hours, &busy))
    }

    async fn book(&self, business_id: &str, request: &AppointmentRequest) -> Result<String, CalendarError> {
        let account = self.accounts.resolve(business_id).await?;
        self.api.insert_event(&account, request).await
    }

    pub async fn create_appointment(
        &self,
        business_id: &str,
        title: &str,
        start_time: &str,
        duration_minutes: Option<i64>,
    ) -> AppointmentOutcome {
        let Some(start) = parse_start(start_time, self.hours.offset()) else {
            warn!(tool = CREATE_APPOINTMENT, start_time, "Unparseable appointment start");
            return AppointmentOutcome::failed();
        };
        let minutes = duration_minutes
            .filter(|m| *m > 0)
            .unwrap_or(self.default_duration_minutes);
        let request = match AppointmentRequest::new(title, start, minutes) {
            Ok(request) => request,
            Err(e) => {
                warn!(tool = CREATE_APPOINTMENT, business_id, error = %e, "Rejected appointment");
                return AppointmentOutcome::failed();
            }
        };

        match self.book(business_id, &request).await {
            Ok(event_id) => {
                info!(tool = CREATE_APPOINTMENT, business_id, event_id = %event_id, "Appointment created");
                AppointmentOutcome::created(event_id)
            }
            Err(e) => {
                warn!(tool = CREATE_APPOINTMENT, business_id, error = %e, "Appointment creation failed");
                AppointmentOutcome::failed()
            }
        }
    }
}

/// RFC 3339, or a local date-time without offset interpreted in the
/// business's working-hours offset.
fn parse_start(value: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(start) = DateTime::parse_from_rfc3339(value) {
        return Some(start);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use neighborly_application::CalendarAccount;
    use neighborly_domain::BusyInterval;
    use std::sync::Mutex;

    pub(crate) struct OneOwner;

    #[async_trait]
    impl CalendarAccountResolver for OneOwner {
        async fn resolve(&self, business_id: &str) -> Result<CalendarAccount, CalendarError> {
            match business_id {
                "abc123" => Ok(CalendarAccount {
                    owner_id: "owner-1".to_string(),
                    calendar_id: "primary".to_string(),
                    access_token: "tok".to_string(),
                }),
                "unlinked" => Err(CalendarError::NotConnected("owner-2".to_string())),
                other => Err(CalendarError::OwnerNotFound(other.to_string())),
            }
        }
    }

    /// Busy 10:00-11:00 UTC on every queried day; records inserted events.
    #[derive(Default)]
    pub(crate) struct FakeCalendar {
        pub(crate) inserted: Mutex<Vec<AppointmentRequest>>,
        pub(crate) fail_inserts: bool,
    }

    #[async_trait]
    impl CalendarApi for FakeCalendar {
        async fn free_busy(
            &self,
            _account: &CalendarAccount,
            start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<BusyInterval>, CalendarError> {
            let day = start.date_naive();
            let at = |h| Utc.from_utc_datetime(&day.and_hms_opt(h, 0, 0).unwrap_or_default());
            Ok(vec![BusyInterval::new(at(10), at(11))])
        }

        async fn insert_event(
            &self,
            _account: &CalendarAccount,
            request: &AppointmentRequest,
        ) -> Result<String, CalendarError> {
            if self.fail_inserts {
                return Err(CalendarError::Api("403 Forbidden".to_string()));
            }
            let mut inserted = self.inserted.lock().unwrap();
            inserted.push(request.clone());
            Ok(format!("evt-{}", inserted.len()))
        }
    }

    fn tools(api: Arc<FakeCalendar>) -> CalendarTools {
        CalendarTools::new(Arc::new(OneOwner), api)
    }

    #[tokio::test]
    async fn test_busy_hour_is_excluded() {
        let availability = tools(Arc::default()).check_availability("abc123", "2024-05-14").await;
        assert!(availability.error.is_none());
        assert_eq!(availability.available_slots.len(), 7);
        assert!(!availability.available_slots.contains(&"10:00".to_string()));
    }

    #[tokio::test]
    async fn test_unresolvable_business_degrades() {
        let tools = tools(Arc::default());
        let availability = tools.check_availability("nope", "2024-05-14").await;
        assert!(availability.available_slots.is_empty());
        assert!(availability.error.unwrap().contains("nope"));

        let availability = tools.check_availability("unlinked", "2024-05-14").await;
        assert!(availability.error.unwrap().contains("not connected"));
    }

    #[tokio::test]
    async fn test_bad_date_degrades() {
        let availability = tools(Arc::default()).check_availability("abc123", "next tuesday").await;
        assert!(availability.available_slots.is_empty());
        assert!(availability.error.unwrap().contains("YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn test_create_appointment_uses_default_duration() {
        let api = Arc::new(FakeCalendar::default());
        let outcome = tools(api.clone())
            .create_appointment("abc123", "Haircut", "2024-05-14T14:00:00Z", None)
            .await;
        assert_eq!(outcome, AppointmentOutcome::created("evt-1"));

        let inserted = api.inserted.lock().unwrap();
        assert_eq!(inserted[0].duration(), chrono::Duration::minutes(60));
        assert_eq!(inserted[0].title(), "Haircut");
    }

    #[tokio::test]
    async fn test_create_appointment_failures() {
        let failing = Arc::new(FakeCalendar {
            fail_inserts: true,
            ..Default::default()
        });
        let outcome = tools(failing)
            .create_appointment("abc123", "Haircut", "2024-05-14T14:00:00Z", Some(30))
            .await;
        assert_eq!(outcome, AppointmentOutcome::failed());

        let tools = tools(Arc::default());
        assert!(!tools.create_appointment("nope", "Haircut", "2024-05-14T14:00:00Z", None).await.success);
        assert!(!tools.create_appointment("abc123", "Haircut", "tomorrow at 2", None).await.success);
    }

    #[tokio::test]
    async fn test_create_appointment_rejects_oversized_duration() {
        let api = Arc::new(FakeCalendar::default());
        let tools = tools(api.clone());
        for minutes in [i64::MAX / 2, i64::MAX, 24 * 60 + 1] {
            let outcome = tools
                .create_appointment("abc123", "Haircut", "2024-05-14T14:00:00Z", Some(minutes))
                .await;
            assert_eq!(outcome, AppointmentOutcome::failed());
        }
        assert!(api.inserted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parse_start() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let local = parse_start("2024-05-14T10:00", minus_five).unwrap();
        assert_eq!(local.to_rfc3339(), "2024-05-14T10:00:00-05:00");

        let explicit = parse_start("2024-05-14T10:00:00+02:00", minus_five).unwrap();
        assert_eq!(explicit.offset().local_minus_utc(), 2 * 3600);
        assert!(parse_start("soon", minus_five).is_none());
    }
}
