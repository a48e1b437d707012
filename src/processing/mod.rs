//! Turns a raw NewsAPI article list into the scored table, the per-day chart
//! series and the export projection.

mod filter;
mod page;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::models::{ArticleRecord, DailyAggregate, ExportRow, ScoredArticle};
use crate::sentiment::SentimentScorer;

pub use filter::SourceFilter;
pub use page::{page_count, paginate, Page};

/// Shown for records whose source carries no name.
const UNKNOWN_SOURCE: &str = "Unknown";

/// Scored articles from one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub articles: Vec<ScoredArticle>,
    /// Records dropped for an unparsable timestamp or no text at all.
    pub skipped: usize,
    /// Records dropped because the provider marked them removed.
    pub removed: usize,
}

/// Everything a search can end in. The presentation layer only ever sees a
/// complete `ResultSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(ResultSet),
    NoResults,
    FetchFailed(String),
}

impl SearchOutcome {
    pub fn results(&self) -> Option<&ResultSet> {
        match self {
            SearchOutcome::Results(set) => Some(set),
            _ => None,
        }
    }

    pub fn results_mut(&mut self) -> Option<&mut ResultSet> {
        match self {
            SearchOutcome::Results(set) => Some(set),
            _ => None,
        }
    }
}

fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Clean and score a provider response.
///
/// Removed-source records are dropped before scoring. Records with an
/// unparsable timestamp, or with neither title nor description, are skipped
/// and counted. An empty response, or one with nothing left after cleaning,
/// is `NoResults`.
pub fn process(records: Vec<ArticleRecord>, scorer: &dyn SentimentScorer) -> SearchOutcome {
    if records.is_empty() {
        return SearchOutcome::NoResults;
    }

    let total = records.len();
    let mut set = ResultSet::default();

    for record in records {
        if record.is_removed() {
            set.removed += 1;
            continue;
        }

        if record.title.is_none() && record.description.is_none() {
            set.skipped += 1;
            continue;
        }

        let Some(published_at) = record.published_at.as_deref().and_then(parse_published) else {
            tracing::debug!(
                published_at = ?record.published_at,
                url = ?record.url,
                "Skipping article with unparsable timestamp"
            );
            set.skipped += 1;
            continue;
        };

        let sentiment = scorer.score(&record);
        set.articles.push(ScoredArticle {
            source: match record.source_name() {
                "" => UNKNOWN_SOURCE.to_string(),
                name => name.to_string(),
            },
            published_at,
            title: record.title,
            description: record.description,
            url: record.url.unwrap_or_default(),
            sentiment,
        });
    }

    tracing::debug!(
        total,
        kept = set.articles.len(),
        removed = set.removed,
        skipped = set.skipped,
        "Processed articles"
    );

    if set.articles.is_empty() {
        SearchOutcome::NoResults
    } else {
        SearchOutcome::Results(set)
    }
}

/// Newest first. Stable, so equal timestamps keep provider order.
pub fn sort_by_published_desc(articles: &mut [ScoredArticle]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Article count and mean sentiment per calendar day, ascending by date.
pub fn daily_aggregates<'a, I>(articles: I) -> Vec<DailyAggregate>
where
    I: IntoIterator<Item = &'a ScoredArticle>,
{
    // (count, score sum, scored count)
    let mut days: BTreeMap<_, (usize, f64, usize)> = BTreeMap::new();

    for article in articles {
        let day = days.entry(article.date()).or_insert((0, 0.0, 0));
        day.0 += 1;
        if let Some(value) = article.sentiment.value {
            day.1 += value;
            day.2 += 1;
        }
    }

    days.into_iter()
        .map(|(date, (count, sum, scored))| DailyAggregate {
            date,
            count,
            mean_sentiment: (scored > 0).then(|| sum / scored as f64),
        })
        .collect()
}

pub fn export_rows<'a, I>(articles: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a ScoredArticle>,
{
    articles
        .into_iter()
        .map(|a| ExportRow {
            source: a.source.clone(),
            date: a.date(),
            title: a.title.clone().unwrap_or_default(),
            url: a.url.clone(),
            sentiment: a.sentiment.value,
        })
        .collect()
}

/// Distinct source names, sorted.
pub fn sources(articles: &[ScoredArticle]) -> Vec<String> {
    articles
        .iter()
        .map(|a| a.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
