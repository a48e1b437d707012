//! Command-line interface.
//!
//! Every flag overrides the matching config file field for this run only.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, PresentationMode, SortBy};
use crate::query::{JoinMode, SearchScope};
use crate::sentiment::ScoringMode;

/// Search NewsAPI by keyword, score sentiment and chart it per day.
///
/// Without `--query` the interactive terminal UI starts.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Run one search headless and print the results
    #[arg(short, long)]
    pub query: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// How keywords combine: single, all-of or any-of
    #[arg(short, long)]
    pub join: Option<JoinMode>,

    /// Match the title only or the full text: title or full-text
    #[arg(short, long)]
    pub scope: Option<SearchScope>,

    /// Sentiment strategy: lexicon (title) or polarity (description)
    #[arg(long)]
    pub scoring: Option<ScoringMode>,

    /// Table layout: plain or paginated
    #[arg(long)]
    pub presentation: Option<PresentationMode>,

    /// Provider ordering: relevancy or publishedAt
    #[arg(long)]
    pub sort_by: Option<SortBy>,

    /// Rows per table page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Page to print in headless paginated mode
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Only show these sources (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// Write news_data.xlsx to the export directory
    #[arg(long)]
    pub export: bool,

    /// Export directory
    #[arg(long)]
    pub export_dir: Option<String>,

    /// Write an HTML report to this path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(join) = self.join {
            config.join_mode = join;
        }
        if let Some(scope) = self.scope {
            config.scope = scope;
        }
        if let Some(scoring) = self.scoring {
            config.scoring = scoring;
        }
        if let Some(presentation) = self.presentation {
            config.presentation = presentation;
        }
        if let Some(sort_by) = self.sort_by {
            config.sort_by = sort_by;
        }
        if let Some(page_size) = self.page_size {
            config.table_page_size = page_size.max(1);
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = dir.clone();
        }
    }
}
