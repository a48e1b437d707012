use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, List, ListItem, ListState,
        Paragraph, Row, Table, TableState, Wrap,
    },
    Frame,
};

use crate::app::App;
use crate::config::PresentationMode;
use crate::models::DailyAggregate;
use crate::processing::SearchOutcome;
use crate::sentiment::ScoringMode;

pub fn draw(frame: &mut Frame, app: &App) {
    // Input bar, body, status line
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Keyword input
            Constraint::Min(0),    // Table and charts
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    // Body: 3/5 table, 2/5 charts
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(3, 5), Constraint::Ratio(2, 5)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Results table
            Constraint::Length(7), // Selected article
        ])
        .split(body[0]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(body[1]);

    render_input(frame, app, rows[0]);
    render_results(frame, app, left[0]);
    render_detail(frame, app, left[1]);

    let series = app.chart_series();
    render_volume_chart(frame, app, &series, charts[0]);
    render_sentiment_chart(frame, &series, charts[1]);

    render_status(frame, app, rows[2]);

    // Render source picker popup if active
    if app.picker_active {
        render_source_picker(frame, app);
    }

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " News Search [{} | {} | {}] ",
        app.join_mode, app.scope, app.scoring
    );

    let border = if app.input_active {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let text = if app.input_active {
        format!("> {}_", app.input)
    } else if app.input.is_empty() {
        "Press / to enter keywords".to_string()
    } else {
        format!("> {}", app.input)
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, area);
}

fn results_title(app: &App) -> String {
    let keyword = app
        .last_query
        .as_ref()
        .map(|q| q.keyword.as_str())
        .unwrap_or("");
    let filter = app.filter.label();

    match app.presentation {
        PresentationMode::Plain => format!(" Results for '{keyword}' [{filter}] "),
        PresentationMode::Paginated => format!(
            " Results for '{keyword}' [{filter}] page {}/{} ",
            app.page,
            app.total_pages()
        ),
    }
}

fn format_sentiment(value: Option<f64>, scoring: ScoringMode) -> String {
    match (value, scoring) {
        (None, _) => "-".to_string(),
        (Some(v), ScoringMode::Lexicon) => format!("{v:.0}"),
        (Some(v), ScoringMode::Polarity) => format!("{v:.2}"),
    }
}

fn sentiment_color(value: Option<f64>) -> Color {
    match value {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        _ => Color::Gray,
    }
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(results_title(app))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let message = match &app.outcome {
        _ if app.is_searching && app.outcome.is_none() => Some("Searching...".to_string()),
        None if !app.has_api_key() => Some(
            "NewsAPI key not configured.\n\nSet NEWSAPI_KEY or add api_key to:\n~/.config/news-sentiment/config.toml"
                .to_string(),
        ),
        None => Some("Enter a keyword to search for news.".to_string()),
        Some(SearchOutcome::NoResults) => Some("No news articles found.".to_string()),
        Some(SearchOutcome::FetchFailed(message)) => Some(message.clone()),
        Some(SearchOutcome::Results(_)) => None,
    };

    if let Some(message) = message {
        let paragraph = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let polarity = app.last_scoring == ScoringMode::Polarity;
    let mut header = vec!["Source", "Date", "Title", "URL", "Sentiment"];
    if polarity {
        header.push("Subj.");
    }

    let rows: Vec<Row> = app
        .visible_articles()
        .into_iter()
        .map(|article| {
            let mut cells = vec![
                Cell::from(article.source.clone()).style(Style::default().fg(Color::Blue)),
                Cell::from(article.date().to_string()),
                Cell::from(article.title_or_placeholder().to_string()),
                Cell::from(article.url.clone()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format_sentiment(article.sentiment.value, app.last_scoring))
                    .style(Style::default().fg(sentiment_color(article.sentiment.value))),
            ];
            if polarity {
                cells.push(Cell::from(format_sentiment(
                    article.sentiment.subjectivity,
                    ScoringMode::Polarity,
                )));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Percentage(50),
        Constraint::Percentage(30),
        Constraint::Length(9),
    ];
    if polarity {
        widths.push(Constraint::Length(5));
    }

    let table = Table::new(rows, widths)
        .header(
            Row::new(header)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Article ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let Some(article) = app.selected_article() else {
        frame.render_widget(block, area);
        return;
    };

    let width = block.inner(area).width.max(10) as usize;
    let mut lines: Vec<Line> = textwrap::wrap(article.title_or_placeholder(), width)
        .into_iter()
        .map(|l| Line::styled(l.into_owned(), Style::default().add_modifier(Modifier::BOLD)))
        .collect();
    if let Some(description) = &article.description {
        lines.extend(
            textwrap::wrap(description, width)
                .into_iter()
                .map(|l| Line::from(l.into_owned())),
        );
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Chart x coordinate: days since the first date in the series.
fn day_offsets(series: &[DailyAggregate]) -> Option<(NaiveDate, f64)> {
    let first = series.first()?.date;
    let last = series.last()?.date;
    Some((first, (last - first).num_days() as f64))
}

/// A connecting line plus a dot per day. A line alone draws nothing for a
/// single point.
fn line_with_markers<'a>(name: &'a str, color: Color, points: &'a [(f64, f64)]) -> Vec<Dataset<'a>> {
    vec![
        Dataset::default()
            .name(name)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(points),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(color))
            .data(points),
    ]
}

/// Evenly spaced axis labels: bottom, middle and top of the bounds.
fn value_labels(lo: f64, hi: f64) -> Vec<String> {
    vec![
        format!("{lo:.1}"),
        format!("{:.1}", (lo + hi) / 2.0),
        format!("{hi:.1}"),
    ]
}

fn x_axis<'a>(series: &[DailyAggregate]) -> Axis<'a> {
    let (labels, max) = match (series.first(), series.last(), day_offsets(series)) {
        (Some(first), Some(last), Some((_, span))) => (
            vec![first.date.format("%m-%d").to_string(), last.date.format("%m-%d").to_string()],
            span.max(1.0),
        ),
        _ => (vec![String::new()], 1.0),
    };

    Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, max])
        .labels(labels)
}

fn render_volume_chart(frame: &mut Frame, app: &App, series: &[DailyAggregate], area: Rect) {
    let keyword = app
        .last_query
        .as_ref()
        .map(|q| q.keyword.as_str())
        .unwrap_or("");
    let block = Block::default()
        .title(format!(" Volume of News Articles for \"{keyword}\" "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let Some((first, _)) = day_offsets(series) else {
        frame.render_widget(block, area);
        return;
    };

    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|d| ((d.date - first).num_days() as f64, d.count as f64))
        .collect();
    let max_count = series.iter().map(|d| d.count).max().unwrap_or(1).max(1) as f64;

    let datasets = line_with_markers("Articles", Color::Blue, &points);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis(series))
        .y_axis(
            Axis::default()
                .title("Number of Articles")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max_count])
                .labels(vec!["0".to_string(), format!("{max_count:.0}")]),
        );

    frame.render_widget(chart, area);
}

fn render_sentiment_chart(frame: &mut Frame, series: &[DailyAggregate], area: Rect) {
    let block = Block::default()
        .title(" Average Sentiment Over Time ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some((first, _)) = day_offsets(series) else {
        frame.render_widget(block, area);
        return;
    };

    // Days where every article lacks a score have no point.
    let points: Vec<(f64, f64)> = series
        .iter()
        .filter_map(|d| {
            d.mean_sentiment
                .map(|m| ((d.date - first).num_days() as f64, m))
        })
        .collect();

    let (mut lo, mut hi) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let datasets = line_with_markers("Average Sentiment", Color::Green, &points);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis(series))
        .y_axis(
            Axis::default()
                .title("Average Sentiment")
                .style(Style::default().fg(Color::Gray))
                .bounds([lo, hi])
                .labels(value_labels(lo, hi)),
        );

    frame.render_widget(chart, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "/:search  m:join  t:scope  c:scoring  s:sources  n/p:page  x:export  ?:help  q:quit";
    let line = match &app.status {
        Some(status) => Line::from(vec![
            Span::styled(status.clone(), Style::default().fg(Color::White)),
            Span::styled(format!("  |  {hints}"), Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_source_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(40, 60, frame.area());

    let items: Vec<ListItem> = app
        .sources
        .iter()
        .map(|source| {
            let mark = if app.picker_selection.contains(source) {
                "[x] "
            } else {
                "[ ] "
            };
            ListItem::new(format!("{mark}{source}"))
        })
        .collect();

    let title = if app.picker_selection.is_empty() {
        " Sources: all (space:toggle a:all enter:apply) ".to_string()
    } else {
        format!(" Sources: {} selected ", app.picker_selection.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.picker_index));

    // Clear the area first
    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Search:",
        "   / or i   Edit keywords, Enter to search",
        "   m        Cycle join mode (single, all-of, any-of)",
        "   t        Toggle title-only / full-text",
        "   c        Toggle scoring (lexicon, polarity)",
        "",
        " Results:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   n / p    Next / previous page",
        "   s        Filter by source",
        "   o        Open in browser",
        "   x        Export news_data.xlsx",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
