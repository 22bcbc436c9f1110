use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const CACHE_FILE_NAME: &str = "static_records.cache";
/// One week.
pub const MAX_CACHE_LIFE_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    Substring,
    Tokenized,
}

impl SearchMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "tokenized" => Some(Self::Tokenized),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOrder {
    Default,
    SortedAlphabetically,
}

impl DisplayOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "default" => Some(Self::Default),
            "sorted_alphabetically" => Some(Self::SortedAlphabetically),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeFlags {
    pub top_tabs: bool,
    pub pinned_tabs: bool,
    pub unpinned_tabs: bool,
    pub spaces: bool,
}

impl Default for IncludeFlags {
    fn default() -> Self {
        Self {
            top_tabs: true,
            pinned_tabs: true,
            unpinned_tabs: true,
            spaces: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub search_method: SearchMethod,
    pub include: IncludeFlags,
    pub display_order: DisplayOrder,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub cache_life_minutes: u64,
    pub app_name: String,
    pub launch_timeout_secs: u64,
    pub launch_poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_method: SearchMethod::Tokenized,
            include: IncludeFlags::default(),
            display_order: DisplayOrder::Default,
            use_cache: false,
            cache_dir: std::env::temp_dir().join("tabfind"),
            cache_life_minutes: 10,
            app_name: "Arc".to_string(),
            launch_timeout_secs: 10,
            launch_poll_interval_ms: 100,
        }
    }
}

impl Config {
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    pub fn cache_ttl_secs(&self) -> f64 {
        self.cache_life_minutes.saturating_mul(60) as f64
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    pub fn launch_poll_interval(&self) -> Duration {
        Duration::from_millis(self.launch_poll_interval_ms)
    }

    /// Applies workflow variables on top of `self`. Unset variables keep the
    /// current value.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("search_method") {
            self.search_method = SearchMethod::parse(&value)
                .ok_or_else(|| ConfigError::invalid("search_method", &value))?;
        }
        if let Some(value) = lookup("includeTopTabs") {
            self.include.top_tabs = parse_flag("includeTopTabs", &value)?;
        }
        if let Some(value) = lookup("includePinnedTabs") {
            self.include.pinned_tabs = parse_flag("includePinnedTabs", &value)?;
        }
        if let Some(value) = lookup("includeUnpinnedTabs") {
            self.include.unpinned_tabs = parse_flag("includeUnpinnedTabs", &value)?;
        }
        if let Some(value) = lookup("includeSpaces") {
            self.include.spaces = parse_flag("includeSpaces", &value)?;
        }
        if let Some(value) = lookup("displayOrder") {
            self.display_order = DisplayOrder::parse(&value)
                .ok_or_else(|| ConfigError::invalid("displayOrder", &value))?;
        }
        if let Some(value) = lookup("use_cache") {
            self.use_cache = parse_flag("use_cache", &value)?;
        }
        if let Some(value) = lookup("cache_dir").or_else(|| lookup("alfred_workflow_cache")) {
            self.cache_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("cache_life") {
            self.cache_life_minutes = parse_number("cache_life", &value)?;
        }
        if let Some(value) = lookup("app_name") {
            self.app_name = value.trim().to_string();
        }
        if let Some(value) = lookup("launch_timeout") {
            self.launch_timeout_secs = parse_number("launch_timeout", &value)?;
        }
        Ok(self)
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_vars(lookup)
    }

    fn apply_file(mut self, file: FileConfig) -> Result<Self, ConfigError> {
        if let Some(value) = file.search_method {
            self.search_method = SearchMethod::parse(&value)
                .ok_or_else(|| ConfigError::invalid("search_method", &value))?;
        }
        if let Some(value) = file.include_top_tabs {
            self.include.top_tabs = value;
        }
        if let Some(value) = file.include_pinned_tabs {
            self.include.pinned_tabs = value;
        }
        if let Some(value) = file.include_unpinned_tabs {
            self.include.unpinned_tabs = value;
        }
        if let Some(value) = file.include_spaces {
            self.include.spaces = value;
        }
        if let Some(value) = file.display_order {
            self.display_order = DisplayOrder::parse(&value)
                .ok_or_else(|| ConfigError::invalid("displayOrder", &value))?;
        }
        if let Some(value) = file.use_cache {
            self.use_cache = value;
        }
        if let Some(value) = file.cache_dir {
            self.cache_dir = value;
        }
        if let Some(value) = file.cache_life {
            self.cache_life_minutes = value;
        }
        if let Some(value) = file.app_name {
            self.app_name = value;
        }
        if let Some(value) = file.launch_timeout {
            self.launch_timeout_secs = value;
        }
        if let Some(value) = file.launch_poll_interval_ms {
            self.launch_poll_interval_ms = value;
        }
        Ok(self)
    }
}

/// Optional TOML overrides, keyed like the workflow variables.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    search_method: Option<String>,
    #[serde(rename = "includeTopTabs")]
    include_top_tabs: Option<bool>,
    #[serde(rename = "includePinnedTabs")]
    include_pinned_tabs: Option<bool>,
    #[serde(rename = "includeUnpinnedTabs")]
    include_unpinned_tabs: Option<bool>,
    #[serde(rename = "includeSpaces")]
    include_spaces: Option<bool>,
    #[serde(rename = "displayOrder")]
    display_order: Option<String>,
    use_cache: Option<bool>,
    cache_dir: Option<PathBuf>,
    cache_life: Option<u64>,
    app_name: Option<String>,
    launch_timeout: Option<u64>,
    launch_poll_interval_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("{0}")]
    Validation(String),
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Defaults, then the optional TOML file, then workflow variables.
pub fn load<F>(config_path: Option<&Path>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    if let Some(path) = config_path {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config = config.apply_file(file)?;
    }

    let config = config.with_vars(lookup)?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.use_cache && cfg.cache_life_minutes == 0 {
        return Err(ConfigError::Validation(
            "cache_life must be at least 1 minute when use_cache is enabled".into(),
        ));
    }

    if cfg.cache_life_minutes > MAX_CACHE_LIFE_MINUTES {
        return Err(ConfigError::Validation(format!(
            "cache_life must be at most {MAX_CACHE_LIFE_MINUTES} minutes"
        )));
    }

    if cfg.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation("cache_dir is required".into()));
    }

    if cfg.app_name.trim().is_empty() {
        return Err(ConfigError::Validation("app_name is required".into()));
    }

    if cfg.launch_poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "launch_poll_interval_ms must be positive".into(),
        ));
    }

    Ok(())
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(key, value))
}
