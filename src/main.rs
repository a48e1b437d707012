use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod cli;
mod config;
mod error;
mod export;
mod models;
mod news;
mod processing;
mod query;
mod sentiment;
mod tui;

use app::App;
use cli::Cli;
use config::{Config, PresentationMode};
use error::Result;
use processing::{paginate, SearchOutcome, SourceFilter};
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    // Load configuration, then let flags override it
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    args.apply(&mut config);

    let mut app = App::new(&config)?;

    // Headless search: print, optionally export, and exit
    if let Some(raw) = &args.query {
        let ok = run_headless(&mut app, &args, raw).await?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Poll for completed searches
        app.poll_search_result();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.input_active, app.picker_active, app.show_help)
                    {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Returns false when the search failed.
async fn run_headless(app: &mut App, args: &Cli, raw: &str) -> Result<bool> {
    app.search_blocking(raw).await?;

    match &app.outcome {
        Some(SearchOutcome::FetchFailed(message)) => {
            eprintln!("{message}");
            return Ok(false);
        }
        Some(SearchOutcome::NoResults) | None => {
            println!("No news articles found.");
            return Ok(true);
        }
        Some(SearchOutcome::Results(_)) => {}
    }

    if !args.sources.is_empty() {
        app.set_filter(SourceFilter::only(args.sources.iter().cloned()));
    }
    app.set_page(args.page);

    let keyword = app
        .last_query
        .as_ref()
        .map(|q| q.keyword.clone())
        .unwrap_or_default();
    let scope = app.scope.label();
    println!("Results for '{keyword}' in {scope}:");

    for article in app.visible_articles() {
        let sentiment = article
            .sentiment
            .value
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {} {:>7}  {}  <{}>",
            truncate(&article.source, 20),
            article.date(),
            sentiment,
            article.title_or_placeholder(),
            article.url
        );
    }
    if app.presentation == PresentationMode::Paginated {
        println!("Page {} of {}", app.page, app.total_pages());
    }
    if let Some(status) = &app.status {
        println!("{status}");
    }

    let series = app.chart_series();
    println!("\nVolume of News Articles and Average Sentiment Over Time");
    for day in &series {
        let mean = day
            .mean_sentiment
            .map(|m| format!("{m:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {:>4}  {:>7}", day.date, day.count, mean);
    }

    let mut exported = None;
    if args.export {
        if let Some(path) = app.export().await? {
            println!("Wrote {}", path.display());
            exported = Some(path);
        }
    }

    if let Some(path) = &args.html {
        let filtered = app.filtered_articles();
        let page = match app.presentation {
            PresentationMode::Plain => paginate(&filtered, filtered.len(), 1),
            PresentationMode::Paginated => paginate(&filtered, app.table_page_size, app.page),
        };
        let html = export::html::render_report(&keyword, &page, &series, exported.as_deref());
        tokio::fs::write(path, html).await?;
        tracing::info!(path = %path.display(), "Wrote HTML report");
        println!("Wrote {}", path.display());
    }

    Ok(true)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
