use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::{Config, PresentationMode};
use crate::error::{AppError, Result};
use crate::export;
use crate::models::{ArticleRecord, DailyAggregate, ScoredArticle};
use crate::news::NewsClient;
use crate::processing::{
    self, paginate, sort_by_published_desc, SearchOutcome, SourceFilter,
};
use crate::query::{build_query, JoinMode, SearchQuery, SearchScope};
use crate::sentiment::ScoringMode;
use crate::tui::AppAction;

// Message for a completed search
pub struct SearchResult {
    pub search_id: u64,
    pub query: SearchQuery,
    pub scoring: ScoringMode,
    pub result: std::result::Result<Vec<ArticleRecord>, String>, // records or fetch failure message
}

pub fn fetch_failure_message(error: &AppError) -> String {
    match error {
        AppError::NewsApi { message, .. } => format!("Failed to fetch news articles: {message}"),
        other => format!("Failed to fetch news articles: {other}"),
    }
}

pub struct App {
    // Data
    pub outcome: Option<SearchOutcome>,
    pub last_query: Option<SearchQuery>,
    pub last_scoring: ScoringMode,
    pub sources: Vec<String>,

    // Pipeline modes
    pub join_mode: JoinMode,
    pub scope: SearchScope,
    pub scoring: ScoringMode,
    pub presentation: PresentationMode,
    pub table_page_size: usize,
    pub chart_follows_filter: bool,

    // UI State
    pub input: String,
    pub input_active: bool,
    pub filter: SourceFilter,
    pub page: usize,
    pub selected_index: usize,
    pub show_help: bool,
    pub picker_active: bool,
    pub picker_index: usize,
    pub picker_selection: BTreeSet<String>,
    pub status: Option<String>,

    // Async state
    pub is_searching: bool,
    next_search_id: u64,
    pending_search_id: Option<u64>,
    search_rx: mpsc::Receiver<SearchResult>,
    search_tx: mpsc::Sender<SearchResult>,

    // Services
    client: Option<Arc<NewsClient>>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = match config.api_key() {
            Some(_) => Some(Arc::new(NewsClient::new(config)?)),
            None => None,
        };

        let (search_tx, search_rx) = mpsc::channel(4);

        Ok(Self {
            outcome: None,
            last_query: None,
            last_scoring: config.scoring,
            sources: Vec::new(),
            join_mode: config.join_mode,
            scope: config.scope,
            scoring: config.scoring,
            presentation: config.presentation,
            table_page_size: config.table_page_size.max(1),
            chart_follows_filter: config.chart_follows_filter,
            input: String::new(),
            input_active: true,
            filter: SourceFilter::All,
            page: 1,
            selected_index: 0,
            show_help: false,
            picker_active: false,
            picker_index: 0,
            picker_selection: BTreeSet::new(),
            status: None,
            is_searching: false,
            next_search_id: 0,
            pending_search_id: None,
            search_rx,
            search_tx,
            client,
            export_dir: PathBuf::from(&config.export_dir),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.client.is_some()
    }

    /// Every scored article of the current search, in table order.
    pub fn articles(&self) -> &[ScoredArticle] {
        self.outcome
            .as_ref()
            .and_then(SearchOutcome::results)
            .map(|set| set.articles.as_slice())
            .unwrap_or(&[])
    }

    pub fn filtered_articles(&self) -> Vec<&ScoredArticle> {
        self.filter.apply(self.articles())
    }

    pub fn total_pages(&self) -> usize {
        match self.presentation {
            PresentationMode::Plain => 1,
            PresentationMode::Paginated => {
                processing::page_count(self.filtered_articles().len(), self.table_page_size)
            }
        }
    }

    /// Rows the table shows right now.
    pub fn visible_articles(&self) -> Vec<&ScoredArticle> {
        let filtered = self.filtered_articles();
        match self.presentation {
            PresentationMode::Plain => filtered,
            PresentationMode::Paginated => {
                paginate(&filtered, self.table_page_size, self.page).items.to_vec()
            }
        }
    }

    pub fn selected_article(&self) -> Option<&ScoredArticle> {
        self.visible_articles().get(self.selected_index).copied()
    }

    /// Series for the volume and sentiment charts.
    pub fn chart_series(&self) -> Vec<DailyAggregate> {
        if self.chart_follows_filter {
            processing::daily_aggregates(self.filtered_articles())
        } else {
            processing::daily_aggregates(self.articles())
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.visible_articles().len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.visible_articles().len().saturating_sub(1);
            }

            AppAction::NextPage => {
                if self.page < self.total_pages() {
                    self.page += 1;
                    self.selected_index = 0;
                }
            }

            AppAction::PrevPage => {
                if self.page > 1 {
                    self.page -= 1;
                    self.selected_index = 0;
                }
            }

            AppAction::StartInput => {
                self.input_active = true;
            }

            AppAction::InputChar(c) => {
                self.input.push(c);
            }

            AppAction::InputBackspace => {
                self.input.pop();
            }

            AppAction::InputConfirm => {
                self.input_active = false;
                self.submit_search();
            }

            AppAction::InputCancel => {
                self.input_active = false;
            }

            AppAction::CycleJoinMode => {
                self.join_mode = self.join_mode.cycle();
            }

            AppAction::ToggleScope => {
                self.scope = self.scope.toggle();
            }

            AppAction::ToggleScoring => {
                self.scoring = self.scoring.toggle();
                if self.outcome.is_some() {
                    self.status = Some(format!(
                        "Scoring set to {}; applies to the next search",
                        self.scoring
                    ));
                }
            }

            AppAction::OpenSourcePicker => {
                if !self.sources.is_empty() {
                    self.picker_selection = match &self.filter {
                        SourceFilter::All => BTreeSet::new(),
                        SourceFilter::Only(selected) => selected.clone(),
                    };
                    self.picker_index = 0;
                    self.picker_active = true;
                }
            }

            AppAction::PickerUp => {
                self.picker_index = self.picker_index.saturating_sub(1);
            }

            AppAction::PickerDown => {
                if self.picker_index + 1 < self.sources.len() {
                    self.picker_index += 1;
                }
            }

            AppAction::PickerToggle => {
                if let Some(source) = self.sources.get(self.picker_index) {
                    if !self.picker_selection.remove(source) {
                        self.picker_selection.insert(source.clone());
                    }
                }
            }

            AppAction::PickerSelectAll => {
                self.picker_selection.clear();
            }

            AppAction::PickerConfirm => {
                let selection = std::mem::take(&mut self.picker_selection);
                self.set_filter(if selection.is_empty() {
                    SourceFilter::All
                } else {
                    SourceFilter::Only(selection)
                });
                self.picker_active = false;
            }

            AppAction::PickerCancel => {
                self.picker_selection.clear();
                self.picker_active = false;
            }

            AppAction::Export => {
                self.export().await?;
            }

            AppAction::OpenInBrowser => {
                if let Some(article) = self.selected_article() {
                    let url = article.url.clone();
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    pub fn set_filter(&mut self, filter: SourceFilter) {
        self.filter = filter;
        self.page = 1;
        self.selected_index = 0;
    }

    /// Jump to `page`, clamped to the pages the filtered table has.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
        self.selected_index = 0;
    }

    fn next_query(&self) -> Option<SearchQuery> {
        build_query(&self.input, self.join_mode, self.scope)
    }

    /// Start a background search for the current input. A newer submission
    /// supersedes any search still in flight.
    pub fn submit_search(&mut self) {
        let Some(query) = self.next_query() else {
            self.status = Some("Enter a keyword to search for news".to_string());
            return;
        };

        let Some(client) = &self.client else {
            self.status = Some(missing_key_message());
            return;
        };

        self.next_search_id += 1;
        let search_id = self.next_search_id;
        self.pending_search_id = Some(search_id);
        self.is_searching = true;
        self.status = Some(format!("Searching for '{}'...", query.query));

        let client = Arc::clone(client);
        let tx = self.search_tx.clone();
        let scoring = self.scoring;

        tokio::spawn(async move {
            let result = client
                .search(&query)
                .await
                .map_err(|e| fetch_failure_message(&e));

            let _ = tx
                .send(SearchResult {
                    search_id,
                    query,
                    scoring,
                    result,
                })
                .await;
        });
    }

    /// Poll for a completed search (non-blocking)
    pub fn poll_search_result(&mut self) {
        while let Ok(result) = self.search_rx.try_recv() {
            if self.pending_search_id != Some(result.search_id) {
                tracing::debug!(search_id = result.search_id, "Dropping superseded search result");
                continue;
            }
            self.pending_search_id = None;
            self.is_searching = false;
            self.apply_search_result(result.query, result.scoring, result.result);
        }
    }

    /// Run one search to completion, for headless use.
    pub async fn search_blocking(&mut self, raw: &str) -> Result<()> {
        self.input = raw.to_string();
        let Some(query) = self.next_query() else {
            return Err(anyhow::anyhow!("Enter a keyword to search for news").into());
        };
        let Some(client) = &self.client else {
            return Err(AppError::Config(missing_key_message()));
        };

        let result = client
            .search(&query)
            .await
            .map_err(|e| fetch_failure_message(&e));
        self.apply_search_result(query, self.scoring, result);
        Ok(())
    }

    pub fn apply_search_result(
        &mut self,
        query: SearchQuery,
        scoring: ScoringMode,
        result: std::result::Result<Vec<ArticleRecord>, String>,
    ) {
        let mut outcome = match result {
            Ok(records) => processing::process(records, scoring.scorer().as_ref()),
            Err(message) => SearchOutcome::FetchFailed(message),
        };

        if self.presentation == PresentationMode::Paginated {
            if let Some(set) = outcome.results_mut() {
                sort_by_published_desc(&mut set.articles);
            }
        }

        self.status = Some(match &outcome {
            SearchOutcome::Results(set) if set.skipped > 0 => format!(
                "{} articles for '{}' ({} malformed skipped)",
                set.articles.len(),
                query.keyword,
                set.skipped
            ),
            SearchOutcome::Results(set) => {
                format!("{} articles for '{}'", set.articles.len(), query.keyword)
            }
            SearchOutcome::NoResults => "No news articles found.".to_string(),
            SearchOutcome::FetchFailed(message) => message.clone(),
        });

        self.sources = outcome
            .results()
            .map(|set| processing::sources(&set.articles))
            .unwrap_or_default();
        self.outcome = Some(outcome);
        self.last_query = Some(query);
        self.last_scoring = scoring;
        self.set_filter(SourceFilter::All);
    }

    /// Export the filtered table, across all pages, as `news_data.xlsx`.
    pub async fn export(&mut self) -> Result<Option<PathBuf>> {
        if self.articles().is_empty() {
            self.status = Some("Nothing to export".to_string());
            return Ok(None);
        }

        let rows = processing::export_rows(self.filtered_articles());
        match export::write_xlsx(&self.export_dir, &rows).await {
            Ok(path) => {
                self.status = Some(format!("Exported {} rows to {}", rows.len(), path.display()));
                Ok(Some(path))
            }
            Err(e) => {
                tracing::error!("Failed to export spreadsheet: {}", e);
                self.status = Some(format!("Export failed: {e}"));
                Ok(None)
            }
        }
    }
}

fn missing_key_message() -> String {
    format!(
        "NewsAPI key not configured. Set NEWSAPI_KEY or add api_key to {}",
        Config::config_path().display()
    )
}
