use palace_logging::{palace_debug, palace_warn};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::parse_page_url;
use crate::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeResult {
    /// Page content as markdown. Empty when the backend returned none.
    pub markdown: String,
    /// Set when the backend already stored the page as a note.
    pub note_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

impl ApiClient {
    /// Scrapes a single page. A 2xx body that is not JSON yields an empty result.
    pub async fn scrape(&self, url: &str) -> Result<ScrapeResult, ApiError> {
        parse_page_url(url)?;
        let endpoint = self.endpoint(&["scrape-website"])?;
        palace_debug!("POST {} url={}", endpoint, url.trim());
        let body = self
            .send(
                self.request(Method::POST, endpoint)
                    .json(&ScrapeRequest { url: url.trim() }),
            )
            .await?;

        let response: ScrapeResponse = match serde_json::from_str(&body) {
            Ok(response) => response,
            Err(err) => {
                palace_warn!("Scrape response for {} was not JSON: {}", url, err);
                ScrapeResponse::default()
            }
        };

        let markdown = response
            .markdown
            .filter(|md| !md.is_empty())
            .or_else(|| response.data.and_then(|data| data.markdown))
            .unwrap_or_default();
        Ok(ScrapeResult {
            markdown,
            note_id: response.id.filter(|id| !id.is_empty()),
        })
    }
}
