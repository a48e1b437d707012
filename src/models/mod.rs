mod aggregate;
mod article;

pub use aggregate::{DailyAggregate, ExportRow};
pub use article::{ArticleRecord, ScoredArticle, SentimentScore};
