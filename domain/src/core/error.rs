//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid agent configuration: {0}")]
    InvalidAgentConfig(String),

    #[error("Invalid working hours: {start}:00-{end}:00")]
    InvalidWorkingHours { start: u32, end: u32 },

    #[error("Invalid appointment duration: {0} minutes")]
    InvalidAppointmentDuration(i64),
}
