//! Palace core: pure crawl state machine and progress view model.
mod effect;
mod error;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::CrawlError;
pub use msg::Msg;
pub use state::{CrawlPhase, CrawlState};
pub use types::{
    ContentFormat, CrawlJob, CrawlOptions, CrawlStatus, CrawlSummary, JobId, PollPolicy,
    StatusReport,
};
pub use update::update;
pub use view_model::ProgressView;
