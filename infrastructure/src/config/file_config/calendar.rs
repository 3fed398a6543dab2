//! Calendar configuration (`[calendar]` section)

use chrono::FixedOffset;
use neighborly_domain::{DomainError, WorkingHours};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCalendarConfig {
    /// First bookable hour (local time).
    pub start_hour: u32,
    /// End of the working window (exclusive).
    pub end_hour: u32,
    /// Local offset from UTC for the working window.
    pub utc_offset_minutes: i32,
    pub default_duration_minutes: i64,
    pub base_url: String,
}

impl Default for FileCalendarConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            utc_offset_minutes: 0,
            default_duration_minutes: 60,
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
        }
    }
}

impl FileCalendarConfig {
    pub fn working_hours(&self) -> Result<WorkingHours, DomainError> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or(
            DomainError::InvalidWorkingHours {
                start: self.start_hour,
                end: self.end_hour,
            },
        )?;
        WorkingHours::new(self.start_hour, self.end_hour, offset)
    }
}
