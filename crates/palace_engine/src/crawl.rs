use palace_core::{CrawlOptions, CrawlStatus, JobId, StatusReport};
use palace_logging::palace_debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ApiClient, ApiError};

/// The three crawl endpoints the orchestrator drives.
#[async_trait::async_trait]
pub trait CrawlBackend: Send + Sync {
    /// Creates a crawl. `Ok(None)` means the backend answered without an id.
    async fn start_crawl(
        &self,
        url: &str,
        options: &CrawlOptions,
    ) -> Result<Option<JobId>, ApiError>;

    async fn crawl_status(&self, job_id: &str) -> Result<StatusReport, ApiError>;

    /// Stores the crawled pages and returns how many were inserted.
    async fn save_crawl(&self, job_id: &str) -> Result<u64, ApiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    url: &'a str,
    max_depth: u32,
    limit: u32,
    scrape_options: ScrapeOptions,
}

#[derive(Debug, Serialize)]
struct ScrapeOptions {
    formats: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    #[serde(default, alias = "id")]
    crawl_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    completed: Option<Value>,
    #[serde(default)]
    total: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    inserted_count: Option<u64>,
}

#[async_trait::async_trait]
impl CrawlBackend for ApiClient {
    async fn start_crawl(
        &self,
        url: &str,
        options: &CrawlOptions,
    ) -> Result<Option<JobId>, ApiError> {
        let endpoint = self.endpoint(&["crawl-start"])?;
        let body = StartRequest {
            url,
            max_depth: options.max_depth,
            limit: options.limit,
            scrape_options: ScrapeOptions {
                formats: options.formats.iter().map(|f| f.as_str()).collect(),
            },
        };
        palace_debug!(
            "POST {} max_depth={} limit={}",
            endpoint,
            options.max_depth,
            options.limit
        );
        let response: StartResponse = self
            .send_json(self.request(Method::POST, endpoint).json(&body))
            .await?;
        Ok(response.crawl_id)
    }

    async fn crawl_status(&self, job_id: &str) -> Result<StatusReport, ApiError> {
        let endpoint = self.endpoint(&["crawl-status", job_id])?;
        let response: StatusResponse = self
            .send_json(self.request(Method::GET, endpoint))
            .await?;
        let status = response
            .status
            .as_deref()
            .map_or(CrawlStatus::Unknown, CrawlStatus::from_wire);
        Ok(StatusReport {
            status,
            completed: page_count(response.completed.as_ref()),
            total: page_count(response.total.as_ref()),
        })
    }

    async fn save_crawl(&self, job_id: &str) -> Result<u64, ApiError> {
        let endpoint = self.endpoint(&["crawl-save", job_id])?;
        let response: SaveResponse = self
            .send_json(self.request(Method::POST, endpoint))
            .await?;
        response
            .inserted_count
            .ok_or(ApiError::MissingField("inserted_count"))
    }
}

/// Page counts are advisory. Anything that is not a non-negative number reads as 0.
fn page_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::page_count;

    #[test]
    fn page_count_is_lenient() {
        assert_eq!(page_count(Some(&json!(7))), 7);
        assert_eq!(page_count(Some(&json!(-1))), 0);
        assert_eq!(page_count(Some(&json!(3.9))), 3);
        assert_eq!(page_count(Some(&json!("12"))), 0);
        assert_eq!(page_count(Some(&Value::Null)), 0);
        assert_eq!(page_count(None), 0);
    }
}
