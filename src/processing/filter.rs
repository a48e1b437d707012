use std::collections::BTreeSet;

use crate::models::ScoredArticle;

/// Which source outlets the table shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl SourceFilter {
    pub fn only<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SourceFilter::Only(sources.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, article: &ScoredArticle) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(sources) => sources.contains(&article.source),
        }
    }

    pub fn apply<'a>(&self, articles: &'a [ScoredArticle]) -> Vec<&'a ScoredArticle> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }

    pub fn label(&self) -> String {
        match self {
            SourceFilter::All => "all sources".to_string(),
            SourceFilter::Only(sources) if sources.len() == 1 => {
                sources.iter().next().cloned().unwrap_or_default()
            }
            SourceFilter::Only(sources) => format!("{} sources", sources.len()),
        }
    }
}
