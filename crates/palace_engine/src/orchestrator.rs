use std::collections::VecDeque;
use std::future::Future;

use palace_core::{
    update, CrawlError, CrawlOptions, CrawlState, CrawlSummary, Effect, JobId, Msg, PollPolicy,
    StatusReport,
};
use palace_logging::{palace_debug, palace_info, palace_warn};
use tokio_util::sync::CancellationToken;

use crate::client::parse_page_url;
use crate::{CrawlBackend, ProgressSink, Sleeper, TokioSleeper};

/// Drives one crawl at a time: start, poll until terminal, then save.
///
/// The orchestrator holds no per-job state; each `run` owns its own [`CrawlState`].
pub struct CrawlOrchestrator<B, S = TokioSleeper> {
    backend: B,
    sleeper: S,
    policy: PollPolicy,
}

impl<B: CrawlBackend> CrawlOrchestrator<B, TokioSleeper> {
    pub fn new(backend: B) -> Self {
        Self::with_sleeper(backend, TokioSleeper, PollPolicy::default())
    }
}

impl<B: CrawlBackend, S: Sleeper> CrawlOrchestrator<B, S> {
    pub fn with_sleeper(backend: B, sleeper: S, policy: PollPolicy) -> Self {
        Self {
            backend,
            sleeper,
            policy,
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn start(
        &self,
        target_url: &str,
        options: &CrawlOptions,
    ) -> Result<JobId, CrawlError> {
        self.request_start(target_url, options)
            .await
            .map_err(CrawlError::Start)
    }

    pub async fn poll(&self, job_id: &str) -> Result<StatusReport, CrawlError> {
        self.backend
            .crawl_status(job_id)
            .await
            .map_err(|err| CrawlError::Status(err.to_string()))
    }

    /// Asks the backend to store the finished crawl. Returns the inserted count.
    pub async fn finalize(&self, job_id: &str) -> Result<u64, CrawlError> {
        self.backend
            .save_crawl(job_id)
            .await
            .map_err(|err| CrawlError::Save(err.to_string()))
    }

    /// Runs a crawl to completion.
    ///
    /// `sink` sees one `set_progress` per answered poll and is reset on every exit path.
    /// Cancelling `cancel` stops the run at the next suspend point.
    pub async fn run(
        &self,
        target_url: &str,
        options: &CrawlOptions,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut state = CrawlState::new(self.policy);
        let mut inbox = VecDeque::from([Msg::StartRequested {
            url: target_url.to_string(),
            options: options.clone(),
        }]);

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;

            for effect in effects {
                match effect {
                    Effect::RequestStart { url, options } => {
                        palace_info!("Starting crawl of {}", url);
                        let msg = cancellable(cancel, async {
                            match self.request_start(&url, &options).await {
                                Ok(job_id) => Msg::StartAccepted { job_id },
                                Err(reason) => Msg::StartRejected { reason },
                            }
                        })
                        .await;
                        inbox.push_back(msg);
                    }
                    Effect::SchedulePoll {
                        job_id,
                        attempt,
                        delay,
                    } => {
                        let msg = cancellable(cancel, async {
                            self.sleeper.sleep(delay).await;
                            palace_debug!("Polling crawl {} (attempt {})", job_id, attempt);
                            match self.backend.crawl_status(&job_id).await {
                                Ok(report) => Msg::StatusReceived(report),
                                Err(err) => Msg::StatusRejected {
                                    reason: err.to_string(),
                                },
                            }
                        })
                        .await;
                        inbox.push_back(msg);
                    }
                    Effect::RequestSave { job_id } => {
                        palace_info!("Crawl {} completed, saving results", job_id);
                        let msg = cancellable(cancel, async {
                            match self.backend.save_crawl(&job_id).await {
                                Ok(inserted_count) => Msg::SaveSucceeded { inserted_count },
                                Err(err) => Msg::SaveRejected {
                                    reason: err.to_string(),
                                },
                            }
                        })
                        .await;
                        inbox.push_back(msg);
                    }
                    Effect::ReportProgress {
                        completed,
                        total,
                        status,
                    } => sink.set_progress(completed, total, status),
                    Effect::ResetProgress => sink.reset(),
                    Effect::Finished(outcome) => {
                        match &outcome {
                            Ok(summary) => palace_info!(
                                "Crawl {} saved {} documents ({} pages)",
                                summary.job_id,
                                summary.inserted_count,
                                summary.pages_completed
                            ),
                            Err(err) => palace_warn!("Crawl of {} ended: {}", target_url, err),
                        }
                        return outcome;
                    }
                }
            }
        }

        // The state machine always emits `Finished` before running dry.
        sink.reset();
        Err(CrawlError::Status(format!(
            "crawl stopped in phase {:?} without an outcome",
            state.phase()
        )))
    }

    async fn request_start(
        &self,
        target_url: &str,
        options: &CrawlOptions,
    ) -> Result<JobId, String> {
        parse_page_url(target_url).map_err(|err| err.to_string())?;
        let job_id = self
            .backend
            .start_crawl(target_url.trim(), options)
            .await
            .map_err(|err| err.to_string())?;
        match job_id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err("backend did not return a crawl id".to_string()),
        }
    }
}

async fn cancellable<F>(cancel: &CancellationToken, work: F) -> Msg
where
    F: Future<Output = Msg>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Msg::CancelRequested,
        msg = work => msg,
    }
}
