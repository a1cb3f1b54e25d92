use std::time::Duration;

use crate::{CrawlError, CrawlOptions, CrawlStatus, CrawlSummary, JobId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestStart { url: String, options: CrawlOptions },
    /// Wait `delay`, then poll. `attempt` is 1-based.
    SchedulePoll {
        job_id: JobId,
        attempt: u32,
        delay: Duration,
    },
    RequestSave { job_id: JobId },
    ReportProgress {
        completed: u64,
        total: u64,
        status: CrawlStatus,
    },
    /// Back to 0% and hidden.
    ResetProgress,
    Finished(Result<CrawlSummary, CrawlError>),
}
