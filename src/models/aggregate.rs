use chrono::NaiveDate;
use serde::Serialize;

/// Per-day article volume and mean sentiment, used for the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub count: usize,
    /// None when no article on this day has a score.
    pub mean_sentiment: Option<f64>,
}

/// One spreadsheet row: Source, Date, Title, URL, Sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub source: String,
    pub date: NaiveDate,
    pub title: String,
    pub url: String,
    pub sentiment: Option<f64>,
}
