use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Zao application backend
    pub api_base_url: String,
    /// Base URL of the weather backend
    pub weather_base_url: String,
    /// Base URL of the news backend
    pub news_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Directory holding the on-device cache files
    pub data_dir: PathBuf,
    /// Key namespace for cached entities
    pub namespace: String,
    /// Container initialization attempts before giving up
    pub init_retry_attempts: u32,
    /// Fixed delay between initialization attempts, in milliseconds
    pub init_retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            api_base_url: "https://api.zao.app".to_string(),
            weather_base_url: "https://weather.zao.app".to_string(),
            news_base_url: "https://news.zao.app".to_string(),
            request_timeout_secs: 10,
            data_dir: PathBuf::from(&home).join(".zao"),
            namespace: "zao".to_string(),
            init_retry_attempts: 3,
            init_retry_backoff_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("ZAO_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("ZAO_WEATHER_URL") {
            config.weather_base_url = url;
        }
        if let Ok(url) = std::env::var("ZAO_NEWS_URL") {
            config.news_base_url = url;
        }
        if let Ok(dir) = std::env::var("ZAO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(ns) = std::env::var("ZAO_NAMESPACE") {
            config.namespace = ns;
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/zao/config.yaml
    pub fn default_config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config").join("zao").join("config.yaml")
    }

    /// Per-request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fixed delay between container initialization attempts.
    pub fn init_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.init_retry_backoff_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
