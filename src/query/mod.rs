//! Keyword entry to NewsAPI query translation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN_SEPARATOR: OnceLock<Regex> = OnceLock::new();

/// How multiple keywords are combined into one provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinMode {
    /// The whole entry is one keyword.
    #[default]
    Single,
    /// Every keyword must match.
    AllOf,
    /// At least one keyword must match.
    AnyOf,
}

impl JoinMode {
    pub fn connector(&self) -> Option<&'static str> {
        match self {
            JoinMode::Single => None,
            JoinMode::AllOf => Some("AND"),
            JoinMode::AnyOf => Some("OR"),
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            JoinMode::Single => JoinMode::AllOf,
            JoinMode::AllOf => JoinMode::AnyOf,
            JoinMode::AnyOf => JoinMode::Single,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JoinMode::Single => "single",
            JoinMode::AllOf => "all-of",
            JoinMode::AnyOf => "any-of",
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(JoinMode::Single),
            "all-of" | "and" => Ok(JoinMode::AllOf),
            "any-of" | "or" => Ok(JoinMode::AnyOf),
            other => Err(format!("unknown join mode '{other}' (expected single, all-of or any-of)")),
        }
    }
}

/// Whether the query is matched against titles only or the full article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchScope {
    #[default]
    #[serde(rename = "title")]
    TitleOnly,
    FullText,
}

impl SearchScope {
    /// NewsAPI parameter that carries the query string.
    pub fn param_name(&self) -> &'static str {
        match self {
            SearchScope::TitleOnly => "qInTitle",
            SearchScope::FullText => "q",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            SearchScope::TitleOnly => SearchScope::FullText,
            SearchScope::FullText => SearchScope::TitleOnly,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchScope::TitleOnly => "title",
            SearchScope::FullText => "full-text",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" | "title-only" => Ok(SearchScope::TitleOnly),
            "full-text" | "full" | "all" => Ok(SearchScope::FullText),
            other => Err(format!("unknown scope '{other}' (expected title or full-text)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// What the user typed, trimmed. Used for headings.
    pub keyword: String,
    pub query: String,
    pub scope: SearchScope,
}

impl SearchQuery {
    pub fn param_name(&self) -> &'static str {
        self.scope.param_name()
    }
}

/// Split a keyword entry on commas and/or whitespace, dropping empty tokens.
pub fn tokenize(raw: &str) -> Vec<String> {
    let separator = TOKEN_SEPARATOR.get_or_init(|| Regex::new(r"[,\s]+").expect("valid regex"));
    separator
        .split(raw)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the provider query for a keyword entry.
///
/// Returns `None` when the entry holds no keywords, in which case no search
/// should be issued.
pub fn build_query(raw: &str, join: JoinMode, scope: SearchScope) -> Option<SearchQuery> {
    let keyword = raw.trim();
    if keyword.is_empty() {
        return None;
    }

    let query = match join.connector() {
        None => keyword.to_string(),
        Some(connector) => {
            let tokens = tokenize(keyword);
            if tokens.is_empty() {
                return None;
            }
            tokens.join(&format!(" {connector} "))
        }
    };

    Some(SearchQuery {
        keyword: keyword.to_string(),
        query,
        scope,
    })
}
