use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Source name NewsAPI uses for retracted or unavailable content.
pub const REMOVED_SOURCE: &str = "[Removed]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// An article exactly as NewsAPI returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ArticleRecord {
    pub fn source_name(&self) -> &str {
        self.source.name.as_deref().unwrap_or("")
    }

    pub fn is_removed(&self) -> bool {
        self.source_name() == REMOVED_SOURCE
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentScore {
    /// AFINN sum or polarity, depending on the scorer.
    pub value: Option<f64>,
    /// Only filled by the polarity scorer.
    pub subjectivity: Option<f64>,
}

impl SentimentScore {
    pub fn lexicon(value: f64) -> Self {
        Self {
            value: Some(value),
            subjectivity: None,
        }
    }

    pub fn polarity(polarity: f64, subjectivity: f64) -> Self {
        Self {
            value: Some(polarity),
            subjectivity: Some(subjectivity),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub sentiment: SentimentScore,
}

impl ScoredArticle {
    pub fn date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or("(no title)")
    }
}
