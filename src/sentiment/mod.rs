//! Per-article sentiment scoring.
//!
//! Two strategies exist and a search uses exactly one of them: an AFINN word
//! list summed over the title, or a polarity/subjectivity adjective lexicon
//! averaged over the description.

mod afinn;
mod polarity;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{ArticleRecord, SentimentScore};

pub use afinn::AfinnScorer;
pub use polarity::PolarityScorer;

static WORD: OnceLock<Regex> = OnceLock::new();

pub trait SentimentScorer: Send + Sync {
    fn score(&self, record: &ArticleRecord) -> SentimentScore;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// AFINN valence sum over the title.
    #[default]
    Lexicon,
    /// Polarity and subjectivity over the description.
    Polarity,
}

impl ScoringMode {
    pub fn scorer(&self) -> Box<dyn SentimentScorer> {
        match self {
            ScoringMode::Lexicon => Box::new(AfinnScorer::new()),
            ScoringMode::Polarity => Box::new(PolarityScorer::new()),
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ScoringMode::Lexicon => ScoringMode::Polarity,
            ScoringMode::Polarity => ScoringMode::Lexicon,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoringMode::Lexicon => "lexicon",
            ScoringMode::Polarity => "polarity",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicon" | "afinn" => Ok(ScoringMode::Lexicon),
            "polarity" => Ok(ScoringMode::Polarity),
            other => Err(format!("unknown scoring mode '{other}' (expected lexicon or polarity)")),
        }
    }
}

/// Lowercase word tokens, keeping inner apostrophes ("don't").
fn words(text: &str) -> Vec<String> {
    let word = WORD.get_or_init(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)*").expect("valid regex"));
    let normalized = text.to_lowercase().replace('\u{2019}', "'");
    word.find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}
