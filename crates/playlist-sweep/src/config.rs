//! Run configuration, loaded from environment variables and `.env`.

use crate::error::ConfigError;
use crate::stealth::fingerprint::Fingerprint;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Playlist scraped when no URL is configured.
pub const DEFAULT_PLAYLIST_URL: &str =
    "https://www.youtube.com/playlist?list=PLPJVlVRVmhc4Z01fD57jbzycm9I6W054x";

/// Base URL of the structured extraction service.
pub const DEFAULT_AGENTQL_ENDPOINT: &str = "https://api.agentql.com";

/// Element that marks the playlist as rendered.
pub const LIST_CONTAINER_SELECTOR: &str = "ytd-playlist-video-renderer";

/// Scroll loop tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSettings {
    /// Pixels advanced per scroll step.
    pub step_px: u64,
    /// Pause after each scroll so lazy content can render.
    pub settle: Duration,
    /// Pause after a failed extraction batch.
    pub failure_backoff: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            step_px: 1000,
            settle: Duration::from_millis(200),
            failure_backoff: Duration::from_secs(5),
        }
    }
}

/// Everything a scrape run needs.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub api_key: String,
    pub agentql_endpoint: String,
    pub target_url: String,
    pub output_dir: PathBuf,
    pub list_selector: String,
    pub navigation_timeout: Duration,
    pub ready_timeout: Duration,
    pub scroll: ScrollSettings,
    pub fingerprint: Fingerprint,
    pub headless: bool,
    pub no_sandbox: bool,
    pub chromium_path: Option<PathBuf>,
}

impl ScrapeConfig {
    /// Build a config with defaults around the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agentql_endpoint: DEFAULT_AGENTQL_ENDPOINT.to_string(),
            target_url: DEFAULT_PLAYLIST_URL.to_string(),
            output_dir: PathBuf::from("output"),
            list_selector: LIST_CONTAINER_SELECTOR.to_string(),
            navigation_timeout: Duration::from_secs(30),
            ready_timeout: Duration::from_secs(10),
            scroll: ScrollSettings::default(),
            fingerprint: Fingerprint::default(),
            headless: true,
            no_sandbox: false,
            chromium_path: None,
        }
    }

    /// Load from the process environment, falling back to a `.env` file
    /// found in the working directory or one of its parents.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_env_file(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
        };
        Self::from_layers(|key| std::env::var(key).ok(), &file)
    }

    /// `lookup` wins; `file` fills in whatever it leaves unset.
    fn from_layers<F>(lookup: F, file: &HashMap<String, String>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| lookup(key).or_else(|| file.get(key).cloned()))
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("AGENTQL_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = non_empty(lookup("AGENTQL_ENDPOINT")) {
            config.agentql_endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(url) = non_empty(lookup("PLAYLIST_SWEEP_URL")) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    name: "PLAYLIST_SWEEP_URL".into(),
                    reason: format!("'{url}' is not an http(s) URL"),
                });
            }
            config.target_url = url;
        }
        if let Some(dir) = non_empty(lookup("PLAYLIST_SWEEP_OUTPUT_DIR")) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty(lookup("PLAYLIST_SWEEP_CHROMIUM_PATH")) {
            config.chromium_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup("PLAYLIST_SWEEP_HEADFUL") {
            config.headless = !parse_flag("PLAYLIST_SWEEP_HEADFUL", &flag)?;
        }
        if let Some(flag) = lookup("PLAYLIST_SWEEP_NO_SANDBOX") {
            config.no_sandbox = parse_flag("PLAYLIST_SWEEP_NO_SANDBOX", &flag)?;
        }

        Ok(config)
    }
}

fn collect_env_file<I>(iter: I) -> Result<HashMap<String, String>, ConfigError>
where
    I: Iterator<Item = Result<(String, String), dotenvy::Error>>,
{
    iter.collect::<Result<_, _>>()
        .map_err(|e| ConfigError::EnvFile(e.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = ScrapeConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err =
            ScrapeConfig::from_lookup(lookup_from(&[("AGENTQL_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_defaults() {
        let config = ScrapeConfig::from_lookup(lookup_from(&[("AGENTQL_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.target_url, DEFAULT_PLAYLIST_URL);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.scroll.step_px, 1000);
        assert_eq!(config.scroll.settle, Duration::from_millis(200));
        assert_eq!(config.ready_timeout, Duration::from_secs(10));
        assert!(config.headless);
    }

    #[test]
    fn test_overrides() {
        let config = ScrapeConfig::from_lookup(lookup_from(&[
            ("AGENTQL_API_KEY", "k"),
            ("AGENTQL_ENDPOINT", "http://localhost:9000/"),
            ("PLAYLIST_SWEEP_URL", "https://example.com/playlist?list=X"),
            ("PLAYLIST_SWEEP_OUTPUT_DIR", "/tmp/out"),
            ("PLAYLIST_SWEEP_HEADFUL", "yes"),
            ("PLAYLIST_SWEEP_NO_SANDBOX", "1"),
        ]))
        .unwrap();
        assert_eq!(config.agentql_endpoint, "http://localhost:9000");
        assert_eq!(config.target_url, "https://example.com/playlist?list=X");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(!config.headless);
        assert!(config.no_sandbox);
    }

    fn write_env_file(contents: &str) -> (tempfile::TempDir, HashMap<String, String>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, contents).unwrap();
        let file = collect_env_file(dotenvy::from_path_iter(&path).unwrap()).unwrap();
        (dir, file)
    }

    #[test]
    fn test_env_file_supplies_api_key() {
        let (_dir, file) = write_env_file(
            "# local secrets\nAGENTQL_API_KEY=from-file\nPLAYLIST_SWEEP_OUTPUT_DIR=\"exports\"\n",
        );
        let config = ScrapeConfig::from_layers(lookup_from(&[]), &file).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.output_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_process_env_overrides_env_file() {
        let (_dir, file) = write_env_file("AGENTQL_API_KEY=from-file\n");
        let config =
            ScrapeConfig::from_layers(lookup_from(&[("AGENTQL_API_KEY", "from-env")]), &file)
                .unwrap();
        assert_eq!(config.api_key, "from-env");
    }

    #[test]
    fn test_env_file_without_key_is_still_missing() {
        let (_dir, file) = write_env_file("PLAYLIST_SWEEP_HEADFUL=1\n");
        let err = ScrapeConfig::from_layers(lookup_from(&[]), &file).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_invalid_values() {
        let err = ScrapeConfig::from_lookup(lookup_from(&[
            ("AGENTQL_API_KEY", "k"),
            ("PLAYLIST_SWEEP_URL", "ftp://nope"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ScrapeConfig::from_lookup(lookup_from(&[
            ("AGENTQL_API_KEY", "k"),
            ("PLAYLIST_SWEEP_HEADFUL", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
