//! # Configuration
//!
//! Four layers, each overriding the one before it: built-in defaults,
//! `~/.reel/config.toml`, environment (`REEL_API_URL`, `REEL_POSTER_URL`),
//! then command-line flags.
//!
//! The file is optional. On first run a fully commented template is written
//! next to where it is expected, listing every key with its default.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// File Layout (every field optional)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub poster_base_url: Option<String>,
    pub max_retries: Option<u32>,
}

/// Physical keys for each logical binding, e.g. `back = ["esc"]`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct KeysConfig {
    pub back: Option<Vec<String>>,
    pub quit: Option<Vec<String>>,
    pub search: Option<Vec<String>>,
    pub select: Option<Vec<String>>,
    pub next_item: Option<Vec<String>>,
    pub prev_item: Option<Vec<String>>,
    pub next_tab: Option<Vec<String>>,
    pub prev_tab: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w92";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_LOG_LEVEL: &str = "debug";

const CONFIG_TEMPLATE: &str = r#"# reel settings
# Uncomment a line to change it. Anything left commented uses the default.
# Environment variables and command-line flags take precedence over this file.

# [general]
# log_level = "debug"                 # error | warn | info | debug | trace

# [api]
# base_url = "http://localhost:8080"  # REEL_API_URL, --api-url
# poster_base_url = "https://image.tmdb.org/t/p/w92"  # REEL_POSTER_URL
# max_retries = 2

# [keys]
# back = ["esc"]
# quit = ["ctrl+c", "q"]
# search = ["s", "/"]
# select = ["enter"]
# next_item = ["down", "tab"]
# prev_item = ["up", "shift+tab"]
# next_tab = ["right"]
# prev_tab = ["left"]
"#;

// ============================================================================
// Resolved Values
// ============================================================================

/// Settings after every layer has been applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub poster_base_url: String,
    pub max_retries: u32,
    pub keys: KeysConfig,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Reading the File
// ============================================================================

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".reel").join("config.toml"))
}

/// Read `~/.reel/config.toml`, or fall back to defaults when there is no
/// home directory.
pub fn load_config() -> Result<ReelConfig, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            warn!("No home directory; running with built-in settings");
            Ok(ReelConfig::default())
        }
    }
}

/// Parse the file at `path`. A missing file is not an error: the template is
/// written there and defaults are returned.
pub fn load_from(path: &Path) -> Result<ReelConfig, ConfigError> {
    if !path.exists() {
        info!("Writing config template to {}", path.display());
        write_template(path);
        return Ok(ReelConfig::default());
    }

    let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ReelConfig = toml::from_str(&text).map_err(ConfigError::Parse)?;
    info!("Read config from {}", path.display());
    debug!("File config: {:?}", config);
    Ok(config)
}

fn write_template(path: &Path) {
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            warn!("Cannot create {}: {}", dir.display(), e);
            return;
        }
    }
    if let Err(e) = fs::write(path, CONFIG_TEMPLATE) {
        warn!("Cannot write config template: {}", e);
    }
}

// ============================================================================
// Layering
// ============================================================================

/// Apply environment and flag overrides on top of the file config.
pub fn resolve(
    config: &ReelConfig,
    cli_api_url: Option<&str>,
    cli_log_level: Option<&str>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_api_url, cli_log_level, |name| {
        std::env::var(name).ok()
    })
}

fn resolve_with_env(
    config: &ReelConfig,
    cli_api_url: Option<&str>,
    cli_log_level: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let api_base_url = cli_api_url
        .map(str::to_owned)
        .or_else(|| env("REEL_API_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());

    // No flag for this one
    let poster_base_url = env("REEL_POSTER_URL")
        .or_else(|| config.api.poster_base_url.clone())
        .unwrap_or_else(|| DEFAULT_POSTER_BASE_URL.to_owned());

    let log_level = cli_log_level
        .map(str::to_owned)
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned());

    ResolvedConfig {
        log_level,
        api_base_url,
        poster_base_url,
        max_retries: config.api.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        keys: config.keys.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("reel-config-test-{}-{}", std::process::id(), name))
            .join("config.toml")
    }

    #[test]
    fn test_empty_file_config_resolves_to_defaults() {
        let resolved = resolve_with_env(&ReelConfig::default(), None, None, no_env);
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(resolved.poster_base_url, DEFAULT_POSTER_BASE_URL);
        assert_eq!(resolved.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert!(resolved.keys.back.is_none());
    }

    #[test]
    fn test_file_values_beat_defaults() {
        let config = ReelConfig {
            general: GeneralConfig {
                log_level: Some("warn".to_string()),
            },
            api: ApiConfig {
                base_url: Some("http://films.local".to_string()),
                poster_base_url: None,
                max_retries: Some(5),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, None, no_env);
        assert_eq!(resolved.api_base_url, "http://films.local");
        assert_eq!(resolved.log_level, "warn");
        assert_eq!(resolved.max_retries, 5);
    }

    #[test]
    fn test_env_beats_file_and_flag_beats_env() {
        let config = ReelConfig {
            api: ApiConfig {
                base_url: Some("http://films.local".to_string()),
                poster_base_url: Some("http://img.file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |name: &str| match name {
            "REEL_API_URL" => Some("http://env.local".to_string()),
            "REEL_POSTER_URL" => Some("http://img.env".to_string()),
            _ => None,
        };

        let from_env = resolve_with_env(&config, None, None, env);
        assert_eq!(from_env.api_base_url, "http://env.local");
        assert_eq!(from_env.poster_base_url, "http://img.env");

        let from_flag = resolve_with_env(&config, Some("http://cli.local"), Some("trace"), env);
        assert_eq!(from_flag.api_base_url, "http://cli.local");
        assert_eq!(from_flag.log_level, "trace");
    }

    #[test]
    fn test_keys_section_parses() {
        let text = r#"
[general]
log_level = "info"

[api]
max_retries = 0

[keys]
back = ["esc", "backspace"]
quit = ["ctrl+q"]
"#;
        let config: ReelConfig = toml::from_str(text).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("info"));
        assert_eq!(config.api.max_retries, Some(0));
        assert_eq!(
            config.keys.back,
            Some(vec!["esc".to_string(), "backspace".to_string()])
        );
        assert!(config.keys.select.is_none());
    }

    #[test]
    fn test_template_is_all_comments() {
        let config: ReelConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert!(config.api.base_url.is_none());
        assert!(config.keys.quit.is_none());
    }

    #[test]
    fn test_missing_file_writes_template() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);

        let config = load_from(&path).unwrap();
        assert!(config.general.log_level.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[api]\nmax_retries = \"many\"\n").unwrap();

        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
