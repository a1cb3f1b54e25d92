use palace_logging::palace_debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::parse_page_url;
use crate::{ApiClient, ApiError};

const SNIPPET_CHARS: usize = 260;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Selection,
    FullPage,
}

/// Text captured from a page, sent to the mind palace for extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCapture {
    pub raw_text: String,
    pub html: Option<String>,
    pub page_url: String,
    pub page_title: String,
    pub selection_type: SelectionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub topic: String,
    pub domain: String,
    pub limit: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            topic: String::new(),
            domain: String::new(),
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default, rename = "_id")]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub source: Option<HitSource>,
}

impl SearchHit {
    /// Id to pass to [`ApiClient::document`].
    pub fn doc_id(&self) -> Option<&str> {
        non_empty(self.object_id.as_deref()).or_else(|| non_empty(self.id.as_deref()))
    }

    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.source.as_ref().and_then(|s| s.url.as_deref())))
            .or_else(|| non_empty(self.id.as_deref()))
            .unwrap_or("Doc")
    }

    /// Summary, or raw text when there is no summary, cut to 260 characters.
    pub fn snippet(&self) -> String {
        non_empty(self.summary.as_deref())
            .or_else(|| non_empty(self.raw_text.as_deref()))
            .map(|text| text.chars().take(SNIPPET_CHARS).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

impl ApiClient {
    pub async fn capture(&self, capture: &PageCapture) -> Result<Value, ApiError> {
        if capture.raw_text.trim().is_empty() {
            return Err(ApiError::Validation("nothing to capture".to_string()));
        }
        parse_page_url(&capture.page_url)?;
        let endpoint = self.endpoint(&["api", "mind-palace", "page", "extract"])?;
        palace_debug!(
            "POST {} kind={:?} text_len={}",
            endpoint,
            capture.selection_type,
            capture.raw_text.len()
        );
        self.send_json(self.request(Method::POST, endpoint).json(capture))
            .await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ApiError> {
        let mut endpoint = self.endpoint(&["api", "mind-palace", "search"])?;
        {
            let mut pairs = endpoint.query_pairs_mut();
            pairs.append_pair("limit", &query.limit.to_string());
            for (key, value) in [
                ("q", &query.q),
                ("topic", &query.topic),
                ("domain", &query.domain),
            ] {
                let value = value.trim();
                if !value.is_empty() {
                    pairs.append_pair(key, value);
                }
            }
        }
        self.send_json(self.request(Method::GET, endpoint)).await
    }

    pub async fn document(&self, id: &str) -> Result<Value, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::Validation("document id must not be empty".to_string()));
        }
        let endpoint = self.endpoint(&["api", "mind-palace", "doc", id.trim()])?;
        self.send_json(self.request(Method::GET, endpoint)).await
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
