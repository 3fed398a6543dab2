//! Raw TOML configuration data types
//!
//! These structs mirror the config file. Every section has defaults, so a
//! missing file or a partial file is fine.

mod agent;
mod calendar;
mod execution;
mod gemini;
mod pricing;
mod storage;
mod tools;

pub use agent::FileAgentConfig;
pub use calendar::FileCalendarConfig;
pub use execution::FileExecutionConfig;
pub use gemini::FileGeminiConfig;
pub use pricing::{FilePricingConfig, rate_table};
pub use storage::{FileLoggingConfig, FileStorageConfig};
pub use tools::{FileImageSearchConfig, FileToolsConfig, FileWebSearchConfig};

use neighborly_application::ExecutionParams;
use neighborly_domain::RateTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("gemini.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("agent.model cannot be empty")]
    EmptyModelName,

    #[error("calendar working window is invalid: {start}:00-{end}:00")]
    InvalidWorkingWindow { start: u32, end: u32 },

    #[error("calendar.default_duration_minutes must be positive")]
    InvalidDuration,

    #[error("execution.knowledge_top_k cannot be 0")]
    InvalidTopK,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub gemini: FileGeminiConfig,
    /// Default assistant model and system prompt
    pub agent: FileAgentConfig,
    pub execution: FileExecutionConfig,
    pub tools: FileToolsConfig,
    pub calendar: FileCalendarConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
    /// Per-model rate overrides
    pub pricing: FilePricingConfig,
}

impl FileConfig {
    /// Reject settings the application cannot start with.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.gemini.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.agent.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.calendar.working_hours().is_err() {
            return Err(ConfigValidationError::InvalidWorkingWindow {
                start: self.calendar.start_hour,
                end: self.calendar.end_hour,
            });
        }
        if self.calendar.default_duration_minutes <= 0 {
            return Err(ConfigValidationError::InvalidDuration);
        }
        if self.execution.knowledge_top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK);
        }
        Ok(())
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_tool_turns(self.execution.max_tool_turns)
            .with_knowledge_top_k(self.execution.knowledge_top_k)
            .with_default_appointment_minutes(self.calendar.default_duration_minutes)
    }

    pub fn rate_table(&self) -> RateTable {
        rate_table(&self.pricing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::Model;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gemini]
api_key = "test-key"
timeout_seconds = 10

[agent]
model = "googleai/gemini-2.5-flash"
system_prompt = "You help the residents of Maple Street."

[execution]
max_tool_turns = 3

[tools.web_search]
engine_id = "cx-123"

[calendar]
start_hour = 8
end_hour = 18
utc_offset_minutes = 60

[storage]
data_dir = "/var/lib/neighborly"

[pricing."gemini-2.5-flash"]
input_per_million = "0.25"
output_per_million = "2.00"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.resolve_api_key(), Some("test-key".to_string()));
        assert_eq!(config.gemini.timeout_seconds, 10);
        assert_eq!(config.agent.to_agent_config().model, Model::Gemini25Flash);
        assert_eq!(config.execution.max_tool_turns, 3);
        assert_eq!(config.execution.knowledge_top_k, 3);
        assert_eq!(config.tools.web_search.engine_id.as_deref(), Some("cx-123"));
        assert_eq!(config.calendar.working_hours().unwrap().start_hour(), 8);
        assert!(config.validate().is_ok());

        let rates = config.rate_table();
        assert_eq!(rates.cost(&Model::Gemini25Flash, 1_000_000, 0), dec!(0.25));
        assert_eq!(rates.cost(&Model::Gemini15Pro, 1_000_000, 0), dec!(1.25));
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.calendar.start_hour, 9);
        assert_eq!(config.calendar.end_hour, 17);
        assert_eq!(config.execution_params().default_appointment_minutes, 60);
        assert!(config.pricing.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FileConfig::default();
        config.gemini.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.agent.model = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));

        let mut config = FileConfig::default();
        config.calendar.start_hour = 17;
        config.calendar.end_hour = 9;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidWorkingWindow { start: 17, end: 9 })
        );
    }

    #[test]
    fn test_agent_default_prompt_when_blank() {
        let config: FileConfig = toml::from_str("[agent]\nsystem_prompt = \"\"\n").unwrap();
        let agent = config.agent.to_agent_config();
        assert!(agent.validate().is_ok());
        assert_eq!(agent.model, Model::default());
    }
}
