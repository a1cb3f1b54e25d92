use crate::{CrawlOptions, JobId, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Caller asked for a crawl of `url`.
    StartRequested { url: String, options: CrawlOptions },
    /// Backend created the crawl.
    StartAccepted { job_id: JobId },
    /// Backend refused to create the crawl, or the request never made it.
    StartRejected { reason: String },
    /// A poll came back.
    StatusReceived(StatusReport),
    /// A poll request failed.
    StatusRejected { reason: String },
    /// Backend stored the crawled pages.
    SaveSucceeded { inserted_count: u64 },
    SaveRejected { reason: String },
    /// Caller gave up on the run.
    CancelRequested,
}
