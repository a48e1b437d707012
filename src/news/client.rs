use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::{Config, SortBy};
use crate::error::{AppError, Result};
use crate::models::ArticleRecord;
use crate::query::SearchQuery;

const USER_AGENT: &str = concat!("news-sentiment/", env!("CARGO_PKG_VERSION"));
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<ArticleRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the NewsAPI `everything` endpoint.
pub struct NewsClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
    page_size: u32,
    sort_by: SortBy,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| AppError::Config("NewsAPI key not configured".to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language: config.language.clone(),
            page_size: config.request_page_size,
            sort_by: config.sort_by,
        })
    }

    pub fn request_url(&self, query: &SearchQuery) -> Result<Url> {
        let page_size = self.page_size.to_string();
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                (query.param_name(), query.query.as_str()),
                ("apiKey", self.api_key.as_str()),
                ("sortBy", self.sort_by.as_param()),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// One GET against the endpoint. Non-200 responses become
    /// `AppError::NewsApi` carrying the provider's message.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<ArticleRecord>> {
        let url = self.request_url(query)?;
        tracing::debug!(url = %redact(&url), "Searching NewsAPI");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let articles = parse_response(status, &body)?;
        tracing::info!(
            query = %query.query,
            scope = %query.scope,
            count = articles.len(),
            "Fetched articles"
        );
        Ok(articles)
    }
}

/// Interpret a NewsAPI response body.
pub fn parse_response(status: StatusCode, body: &str) -> Result<Vec<ArticleRecord>> {
    if status != StatusCode::OK {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        tracing::warn!(status = status.as_u16(), %message, "NewsAPI request failed");
        return Err(AppError::NewsApi {
            status: status.as_u16(),
            message,
        });
    }

    let response: EverythingResponse = serde_json::from_str(body)?;
    Ok(response.articles)
}

fn redact(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_query, JoinMode, SearchScope};

    fn client() -> NewsClient {
        let config = Config {
            api_key: Some("secret".to_string()),
            ..Config::default()
        };
        NewsClient::new(&config).unwrap()
    }

    fn params(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_request_url_title_scope() {
        let query = build_query("climate, policy", JoinMode::AllOf, SearchScope::TitleOnly).unwrap();
        let url = client().request_url(&query).unwrap();

        assert_eq!(url.host_str(), Some("newsapi.org"));
        assert_eq!(url.path(), "/v2/everything");
        assert_eq!(
            params(&url),
            vec![
                ("qInTitle".to_string(), "climate AND policy".to_string()),
                ("apiKey".to_string(), "secret".to_string()),
                ("sortBy".to_string(), "relevancy".to_string()),
                ("language".to_string(), "en".to_string()),
                ("pageSize".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_url_full_text_scope() {
        let query = build_query("rust", JoinMode::Single, SearchScope::FullText).unwrap();
        let url = client().request_url(&query).unwrap();
        let params = params(&url);
        assert!(params.contains(&("q".to_string(), "rust".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "qInTitle"));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = NewsClient::new(&Config::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_redact_hides_key() {
        let query = build_query("rust", JoinMode::Single, SearchScope::FullText).unwrap();
        let url = client().request_url(&query).unwrap();
        let shown = redact(&url).to_string();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("apiKey=***") || shown.contains("apiKey=%2A%2A%2A"));
    }

    #[test]
    fn test_parse_ok_articles() {
        let body = r#"{
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": "bbc-news", "name": "BBC News"},
                    "author": "Someone",
                    "title": "Good news",
                    "description": null,
                    "url": "https://bbc.co.uk/a",
                    "publishedAt": "2024-01-01T10:00:00Z",
                    "content": "..."
                },
                {
                    "source": {"id": null, "name": "[Removed]"},
                    "title": "[Removed]",
                    "url": "https://removed.com",
                    "publishedAt": "1970-01-01T00:00:00Z"
                }
            ]
        }"#;
        let articles = parse_response(StatusCode::OK, body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source_name(), "BBC News");
        assert_eq!(articles[0].title.as_deref(), Some("Good news"));
        assert_eq!(articles[0].description, None);
        assert!(articles[1].is_removed());
    }

    #[test]
    fn test_parse_ok_without_articles_is_empty() {
        let articles = parse_response(StatusCode::OK, r#"{"status":"ok","totalResults":0}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_parse_error_uses_message() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        match parse_response(StatusCode::UNAUTHORIZED, body) {
            Err(AppError::NewsApi { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Your API key is invalid.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_falls_back() {
        match parse_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") {
            Err(AppError::NewsApi { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Unknown error");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_ok_body_is_json_error() {
        assert!(matches!(
            parse_response(StatusCode::OK, "not json"),
            Err(AppError::Json(_))
        ));
    }
}
