//! Static HTML report: the paginated table with clickable links plus the
//! per-day series.

use std::path::Path;

use crate::models::{DailyAggregate, ScoredArticle};
use crate::processing::Page;

use super::{EXPORT_FILE_NAME, EXPORT_MIME};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Anchor for a table cell. Only http(s) URLs become links.
pub fn link(url: &str) -> String {
    let escaped = escape(url);
    if url.starts_with("http://") || url.starts_with("https://") {
        format!(r#"<a href="{escaped}" target="_blank" rel="noopener">{escaped}</a>"#)
    } else {
        escaped
    }
}

fn sentiment_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn table(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for header in headers {
        out.push_str(&format!("<th>{header}</th>"));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// Render one page of results plus the per-day series. `download` is the
/// exported workbook to link to, if one was written.
pub fn render_report(
    keyword: &str,
    page: &Page<'_, &ScoredArticle>,
    aggregates: &[DailyAggregate],
    download: Option<&Path>,
) -> String {
    let title = escape(keyword);
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>News for {title}</title>\n</head>\n<body>\n\
         <h1>Results for &#39;{title}&#39;</h1>\n<p>Page {} of {}</p>\n",
        page.number, page.total_pages
    );

    html.push_str(&table(
        &["Source", "Date", "Title", "URL", "Sentiment"],
        page.items.iter().map(|article| {
            vec![
                escape(&article.source),
                article.date().to_string(),
                escape(article.title.as_deref().unwrap_or_default()),
                link(&article.url),
                sentiment_cell(article.sentiment.value),
            ]
        }),
    ));

    html.push_str("<h2>Volume of News Articles and Average Sentiment Over Time</h2>\n");
    html.push_str(&table(
        &["Date", "Articles", "Average Sentiment"],
        aggregates.iter().map(|day| {
            vec![
                day.date.to_string(),
                day.count.to_string(),
                sentiment_cell(day.mean_sentiment),
            ]
        }),
    ));

    if let Some(path) = download {
        html.push_str(&format!(
            "<p><a href=\"{}\" type=\"{EXPORT_MIME}\" download=\"{EXPORT_FILE_NAME}\">Download data as Excel</a></p>\n",
            escape(&path.display().to_string())
        ));
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::paginate;
    use crate::processing::test_support::scored;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_link_escapes_href() {
        assert_eq!(
            link("https://x.com/?a=1&b=\"2\""),
            r#"<a href="https://x.com/?a=1&amp;b=&quot;2&quot;" target="_blank" rel="noopener">https://x.com/?a=1&amp;b=&quot;2&quot;</a>"#
        );
    }

    #[test]
    fn test_link_rejects_other_schemes() {
        assert_eq!(link("javascript:alert(1)"), "javascript:alert(1)");
    }

    #[test]
    fn test_report_contains_page_rows_and_download() {
        let mut first = scored("BBC", "2024-01-02T00:00:00Z", Some(2.0));
        first.title = Some("<script>alert(1)</script>".to_string());
        let articles = vec![first, scored("AP", "2024-01-01T00:00:00Z", None)];
        let refs: Vec<&ScoredArticle> = articles.iter().collect();
        let page = paginate(&refs, 1, 2);
        let aggregates = crate::processing::daily_aggregates(refs.iter().copied());

        let html = render_report(
            "climate & policy",
            &page,
            &aggregates,
            Some(Path::new("out/news_data.xlsx")),
        );
        assert!(html.contains("Results for &#39;climate &amp; policy&#39;"));
        assert!(html.contains("Page 2 of 2"));
        assert!(html.contains("<td>AP</td>"));
        assert!(!html.contains("<td>BBC</td>"));
        assert!(html.contains("<td>2024-01-02</td><td>1</td><td>2.00</td>"));
        assert!(html.contains(r#"href="out/news_data.xlsx""#));
        assert!(html.contains(EXPORT_MIME));

        let page = paginate(&refs, 1, 1);
        let html = render_report("x", &page, &aggregates, None);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        // no workbook written, no link
        assert!(!html.contains("Download data as Excel"));
    }
}
