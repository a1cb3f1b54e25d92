//! Palace engine: HTTP clients for the note and crawl backends, and crawl orchestration.
mod client;
mod crawl;
mod error;
mod filename;
mod notes;
mod orchestrator;
mod palace;
mod persist;
mod scrape;
mod sink;
mod sleep;

pub use client::{ApiClient, ApiSettings};
pub use crawl::CrawlBackend;
pub use error::ApiError;
pub use filename::{document_filename, title_from_markdown};
pub use notes::{NewNote, Note, NotePage, DEFAULT_PAGE_SIZE};
pub use orchestrator::CrawlOrchestrator;
pub use palace::{HitSource, PageCapture, SearchHit, SearchQuery, SearchResults, SelectionKind};
pub use persist::{ensure_output_dir, MarkdownDocument, MarkdownWriter, PersistError};
pub use scrape::ScrapeResult;
pub use sink::{NoopProgressSink, ProgressSink};
pub use sleep::{Sleeper, TokioSleeper};

pub use palace_core::{
    ContentFormat, CrawlError, CrawlOptions, CrawlStatus, CrawlSummary, JobId, PollPolicy,
    StatusReport,
};
pub use tokio_util::sync::CancellationToken;
