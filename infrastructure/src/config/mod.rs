//! Configuration file loading for neighborly
//!
//! Sources are merged with `figment`. Priority (highest to lowest):
//!
//! 1. `NEIGHBORLY_*` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./neighborly.toml` or `./.neighborly.toml`
//! 4. Global: `$XDG_CONFIG_HOME/neighborly/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileCalendarConfig, FileConfig, FileExecutionConfig,
    FileGeminiConfig, FileImageSearchConfig, FileLoggingConfig, FilePricingConfig,
    FileStorageConfig, FileToolsConfig, FileWebSearchConfig, rate_table,
};
pub use loader::ConfigLoader;
