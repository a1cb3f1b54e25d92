use std::fmt;
use std::time::Duration;

/// Opaque identifier the backend assigns to a crawl.
pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStatus {
    Starting,
    Running,
    Completed,
    Failed,
    /// Any status string the backend sends that we do not recognise.
    Unknown,
}

impl CrawlStatus {
    /// Parses the backend's status string. Matching is case-insensitive.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "starting" => CrawlStatus::Starting,
            "running" | "scraping" => CrawlStatus::Running,
            "completed" => CrawlStatus::Completed,
            "failed" => CrawlStatus::Failed,
            _ => CrawlStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrawlStatus::Starting => "starting",
            CrawlStatus::Running => "running",
            CrawlStatus::Completed => "completed",
            CrawlStatus::Failed => "failed",
            CrawlStatus::Unknown => "unknown",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CrawlStatus::Completed | CrawlStatus::Failed)
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Html,
}

impl ContentFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentFormat::Markdown => "markdown",
            ContentFormat::Html => "html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    pub max_depth: u32,
    pub limit: u32,
    pub formats: Vec<ContentFormat>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 2,
            limit: 10,
            formats: vec![ContentFormat::Markdown],
        }
    }
}

/// How often and how long a crawl is polled before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 240,
        }
    }
}

/// One decoded poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub status: CrawlStatus,
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    pub id: JobId,
    pub status: CrawlStatus,
    pub completed: u64,
    pub total: u64,
}

impl CrawlJob {
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            status: CrawlStatus::Starting,
            completed: 0,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub job_id: JobId,
    pub inserted_count: u64,
    pub pages_completed: u64,
    pub total: u64,
}
