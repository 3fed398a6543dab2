//! Calendar availability: free hourly slots inside a working window.
//!
//! [`available_slots`] is pure; fetching busy blocks and creating events
//! happens behind the application layer's calendar ports.

use crate::core::error::DomainError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Daily window in which appointments can be booked, in the business's
/// local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    start_hour: u32,
    end_hour: u32,
    offset: FixedOffset,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32, offset: FixedOffset) -> Result<Self, DomainError> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(DomainError::InvalidWorkingHours {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
            offset,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn local_hour(&self, date: NaiveDate, hour: u32) -> DateTime<FixedOffset> {
        let midnight = date.and_time(NaiveTime::MIN);
        let local = midnight + Duration::hours(i64::from(hour));
        DateTime::from_naive_utc_and_offset(local - self.offset, self.offset)
    }

    /// Start and end of the window on `date`, in UTC.
    pub fn window(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.local_hour(date, self.start_hour).with_timezone(&Utc),
            self.local_hour(date, self.end_hour).with_timezone(&Utc),
        )
    }
}

impl Default for WorkingHours {
    /// 09:00–17:00 UTC.
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            offset: Utc.fix(),
        }
    }
}

/// A block of time the calendar reports as taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Hourly slots on `date` (formatted `HH:00`, local time) that do not
/// overlap any busy interval.
pub fn available_slots(date: NaiveDate, hours: &WorkingHours, busy: &[BusyInterval]) -> Vec<String> {
    (hours.start_hour..hours.end_hour)
        .filter(|&hour| {
            let start = hours.local_hour(date, hour).with_timezone(&Utc);
            let end = start + Duration::hours(1);
            !busy.iter().any(|b| b.overlaps(start, end))
        })
        .map(|hour| format!("{:02}:00", hour))
        .collect()
}

/// Output of the availability tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available_slots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Availability {
    pub fn slots(available_slots: Vec<String>) -> Self {
        Self {
            available_slots,
            error: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available_slots: Vec::new(),
            error: Some(reason.into()),
        }
    }
}

/// Longest appointment that can be booked (one day).
pub const MAX_APPOINTMENT_MINUTES: i64 = 24 * 60;

/// Appointment to insert into an owner's calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    title: String,
    start: DateTime<FixedOffset>,
    duration: Duration,
    end: DateTime<FixedOffset>,
}

impl AppointmentRequest {
    /// Fails when the duration is not within `1..=MAX_APPOINTMENT_MINUTES`
    /// or the end time is out of range.
    pub fn new(
        title: impl Into<String>,
        start: DateTime<FixedOffset>,
        duration_minutes: i64,
    ) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidAppointmentDuration(duration_minutes);
        if !(1..=MAX_APPOINTMENT_MINUTES).contains(&duration_minutes) {
            return Err(invalid());
        }
        let duration = Duration::try_minutes(duration_minutes).ok_or_else(invalid)?;
        let end = start.checked_add_signed(duration).ok_or_else(invalid)?;
        Ok(Self {
            title: title.into(),
            start,
            duration,
            end,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }
}

/// Outcome of appointment creation: `{"success": true, "eventId": ...}`
/// or `{"success": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl AppointmentOutcome {
    pub fn created(event_id: impl Into<String>) -> Self {
        Self {
            success: true,
            event_id: Some(event_id.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            event_id: None,
        }
    }
}
