//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["neighborly.toml", ".neighborly.toml"];
const ENV_PREFIX: &str = "NEIGHBORLY_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `NEIGHBORLY_GEMINI__API_KEY` style variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./neighborly.toml` or `./.neighborly.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/neighborly/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("neighborly").join("config.toml"))
    }

    /// The project-level config file, if one exists in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .into_iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations (for `neighborly config`)
    pub fn describe_sources() -> Vec<String> {
        let mut lines = Vec::new();

        match Self::project_config_path() {
            Some(path) => lines.push(format!("[FOUND] Project: {}", path.display())),
            None => lines.push("[     ] Project: ./neighborly.toml or ./.neighborly.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("[{}] Global:  {}", mark, path.display()));
        }

        lines.push(format!("[     ] Env:     {}*", ENV_PREFIX));
        lines.push("[     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_global_config_path_names_app() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("neighborly/config.toml"));
        }
    }

    #[test]
    fn test_explicit_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[execution]\nmax_tool_turns = 7\n\n[calendar]\nend_hour = 20").unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.execution.max_tool_turns, 7);
        assert_eq!(config.calendar.end_hour, 20);
        assert_eq!(config.calendar.start_hour, 9);
    }

    #[test]
    fn test_env_overrides_with_figment_jail() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NEIGHBORLY_GEMINI__TIMEOUT_SECONDS", "5");
            jail.set_env("NEIGHBORLY_AGENT__MODEL", "gemini-1.5-pro");
            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.gemini.timeout_seconds, 5);
            assert_eq!(config.agent.model, "gemini-1.5-pro");
            Ok(())
        });
    }
}
