use crate::view_model::ProgressView;
use crate::{CrawlJob, PollPolicy, StatusReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPhase {
    #[default]
    Idle,
    Starting,
    Polling,
    Saving,
    Done,
    StartFailed,
    Failed,
    TimedOut,
    Cancelled,
}

impl CrawlPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CrawlPhase::Done
                | CrawlPhase::StartFailed
                | CrawlPhase::Failed
                | CrawlPhase::TimedOut
                | CrawlPhase::Cancelled
        )
    }

    /// Phases in which a cancel request still has something to stop.
    pub(crate) fn is_cancellable(self) -> bool {
        matches!(
            self,
            CrawlPhase::Starting | CrawlPhase::Polling | CrawlPhase::Saving
        )
    }
}

/// State of a single crawl run. One job at most; dropped when the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    policy: PollPolicy,
    phase: CrawlPhase,
    target_url: Option<String>,
    job: Option<CrawlJob>,
    attempts: u32,
    progress: ProgressView,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new(PollPolicy::default())
    }
}

impl CrawlState {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            phase: CrawlPhase::Idle,
            target_url: None,
            job: None,
            attempts: 0,
            progress: ProgressView::neutral(),
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn job(&self) -> Option<&CrawlJob> {
        self.job.as_ref()
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Number of status polls answered so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn view(&self) -> ProgressView {
        self.progress
    }

    pub(crate) fn begin(&mut self, url: String) {
        self.phase = CrawlPhase::Starting;
        self.target_url = Some(url);
    }

    pub(crate) fn accept_job(&mut self, job: CrawlJob) {
        self.phase = CrawlPhase::Polling;
        self.job = Some(job);
        self.attempts = 0;
    }

    /// Folds a poll answer into the job. Completed counts never go backwards.
    pub(crate) fn apply_report(&mut self, report: StatusReport) -> Option<&CrawlJob> {
        self.attempts = self.attempts.saturating_add(1);
        let job = self.job.as_mut()?;
        job.status = report.status;
        job.completed = job.completed.max(report.completed);
        job.total = report.total;
        self.progress = ProgressView::reporting(job.completed, job.total, job.status);
        Some(job)
    }

    pub(crate) fn set_phase(&mut self, phase: CrawlPhase) {
        self.phase = phase;
    }

    /// Ends the run: progress goes neutral and the job reference is dropped.
    pub(crate) fn finish(&mut self, phase: CrawlPhase) -> Option<CrawlJob> {
        self.phase = phase;
        self.progress = ProgressView::neutral();
        self.job.take()
    }
}
