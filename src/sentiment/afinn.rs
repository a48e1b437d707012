use std::collections::HashMap;
use std::sync::OnceLock;

use super::{words, SentimentScorer};
use crate::models::{ArticleRecord, SentimentScore};

const AFINN_TSV: &str = include_str!("../../data/afinn.tsv");

static AFINN: OnceLock<HashMap<&'static str, i32>> = OnceLock::new();

fn lexicon() -> &'static HashMap<&'static str, i32> {
    AFINN.get_or_init(|| {
        AFINN_TSV
            .lines()
            .filter_map(|line| {
                let (word, valence) = line.split_once('\t')?;
                Some((word.trim(), valence.trim().parse().ok()?))
            })
            .collect()
    })
}

/// Sums AFINN valences over the article title. A missing title scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct AfinnScorer;

impl AfinnScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score_text(&self, text: &str) -> i32 {
        let lexicon = lexicon();
        words(text)
            .iter()
            .filter_map(|w| lexicon.get(w.as_str()))
            .sum()
    }
}

impl SentimentScorer for AfinnScorer {
    fn score(&self, record: &ArticleRecord) -> SentimentScore {
        let value = record
            .title
            .as_deref()
            .map(|title| self.score_text(title))
            .unwrap_or(0);
        SentimentScore::lexicon(f64::from(value))
    }
}
