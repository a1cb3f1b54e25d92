use palace_core::CrawlStatus;

/// Write-only destination for crawl progress. Owned by the caller.
pub trait ProgressSink: Send + Sync {
    fn set_progress(&self, completed: u64, total: u64, status: CrawlStatus);

    /// Back to 0% and hidden.
    fn reset(&self);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn set_progress(&self, _completed: u64, _total: u64, _status: CrawlStatus) {}

    fn reset(&self) {}
}
