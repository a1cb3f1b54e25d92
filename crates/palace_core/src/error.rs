use thiserror::Error;

use crate::JobId;

/// Terminal failure of a crawl run. None of these are retried by the
/// orchestrator; callers may retry the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    #[error("crawl failed to start: {0}")]
    Start(String),
    #[error("failed to get crawl status: {0}")]
    Status(String),
    #[error("crawl timed out after {attempts} status checks")]
    Timeout { attempts: u32 },
    #[error("crawl {job_id} failed to complete")]
    JobFailed { job_id: JobId },
    #[error("failed to save crawl results: {0}")]
    Save(String),
    #[error("crawl cancelled")]
    Cancelled,
}
