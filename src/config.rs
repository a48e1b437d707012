use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::query::{JoinMode, SearchScope};
use crate::sentiment::ScoringMode;

const APP_DIR: &str = "news-sentiment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "relevancy")]
    Relevancy,
    #[serde(rename = "publishedAt")]
    PublishedAt,
}

impl SortBy {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relevancy" => Ok(SortBy::Relevancy),
            "publishedAt" | "published-at" => Ok(SortBy::PublishedAt),
            other => Err(format!("unknown sort order '{other}' (expected relevancy or publishedAt)")),
        }
    }
}

/// How the result table is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationMode {
    /// Provider order, one scrolling table.
    #[default]
    Plain,
    /// Newest first, fixed-size pages.
    Paginated,
}

impl std::str::FromStr for PresentationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "plain" => Ok(PresentationMode::Plain),
            "paginated" => Ok(PresentationMode::Paginated),
            other => Err(format!("unknown presentation '{other}' (expected plain or paginated)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_request_page_size")]
    pub request_page_size: u32,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub join_mode: JoinMode,

    #[serde(default)]
    pub scope: SearchScope,

    #[serde(default)]
    pub scoring: ScoringMode,

    #[serde(default)]
    pub presentation: PresentationMode,

    #[serde(default = "default_table_page_size")]
    pub table_page_size: usize,

    /// Chart the filtered view instead of the whole result set.
    #[serde(default = "default_true")]
    pub chart_follows_filter: bool,

    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_page_size() -> u32 {
    100
}

fn default_table_page_size() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            language: default_language(),
            request_page_size: default_request_page_size(),
            sort_by: SortBy::default(),
            join_mode: JoinMode::default(),
            scope: SearchScope::default(),
            scoring: ScoringMode::default(),
            presentation: PresentationMode::default(),
            table_page_size: default_table_page_size(),
            chart_follows_filter: true,
            export_dir: default_export_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing a default config there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.table_page_size == 0 {
            return Err(AppError::Config("table_page_size must be at least 1".to_string()));
        }
        if !(1..=100).contains(&self.request_page_size) {
            return Err(AppError::Config(
                "request_page_size must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// The API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.endpoint, "https://newsapi.org/v2/everything");
        assert_eq!(config.request_page_size, 100);
        assert!(config.api_key().is_none());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.table_page_size, config.table_page_size);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
api_key = "abc123"
join_mode = "any-of"
scope = "full-text"
scoring = "polarity"
presentation = "paginated"
sort_by = "publishedAt"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.join_mode, JoinMode::AnyOf);
        assert_eq!(config.scope, SearchScope::FullText);
        assert_eq!(config.scoring, ScoringMode::Polarity);
        assert_eq!(config.presentation, PresentationMode::Paginated);
        assert_eq!(config.sort_by, SortBy::PublishedAt);
        assert_eq!(config.language, "en");
        assert!(config.chart_follows_filter);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "table_page_size = 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));

        std::fs::write(&path, "request_page_size = 500\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));

        std::fs::write(&path, "join_mode = \"xor\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Toml(_))));
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config = Config {
            api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.api_key().is_none());
    }
}
