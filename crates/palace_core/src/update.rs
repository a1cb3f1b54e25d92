use crate::{
    CrawlError, CrawlJob, CrawlPhase, CrawlState, CrawlStatus, CrawlSummary, Effect, Msg,
    StatusReport,
};

/// Pure update function: applies a message to the crawl state and returns any effects.
///
/// Messages that do not fit the current phase are dropped without touching the state.
pub fn update(mut state: CrawlState, msg: Msg) -> (CrawlState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (CrawlPhase::Idle, Msg::StartRequested { url, options }) => {
            state.begin(url.clone());
            vec![Effect::RequestStart { url, options }]
        }
        (CrawlPhase::Starting, Msg::StartAccepted { job_id }) => {
            let job_id = job_id.trim().to_string();
            if job_id.is_empty() {
                fail(
                    &mut state,
                    CrawlPhase::StartFailed,
                    CrawlError::Start("backend did not return a crawl id".to_string()),
                )
            } else if state.policy().max_attempts == 0 {
                state.accept_job(CrawlJob::new(job_id));
                fail(
                    &mut state,
                    CrawlPhase::TimedOut,
                    CrawlError::Timeout { attempts: 0 },
                )
            } else {
                let delay = state.policy().interval;
                state.accept_job(CrawlJob::new(job_id.clone()));
                vec![Effect::SchedulePoll {
                    job_id,
                    attempt: 1,
                    delay,
                }]
            }
        }
        (CrawlPhase::Starting, Msg::StartRejected { reason }) => fail(
            &mut state,
            CrawlPhase::StartFailed,
            CrawlError::Start(reason),
        ),
        (CrawlPhase::Polling, Msg::StatusReceived(report)) => apply_status(&mut state, report),
        (CrawlPhase::Polling, Msg::StatusRejected { reason }) => {
            fail(&mut state, CrawlPhase::Failed, CrawlError::Status(reason))
        }
        (CrawlPhase::Saving, Msg::SaveSucceeded { inserted_count }) => {
            match state.finish(CrawlPhase::Done) {
                Some(job) => vec![
                    Effect::ResetProgress,
                    Effect::Finished(Ok(CrawlSummary {
                        job_id: job.id,
                        inserted_count,
                        pages_completed: job.completed,
                        total: job.total,
                    })),
                ],
                None => vec![Effect::ResetProgress],
            }
        }
        (CrawlPhase::Saving, Msg::SaveRejected { reason }) => {
            fail(&mut state, CrawlPhase::Failed, CrawlError::Save(reason))
        }
        (phase, Msg::CancelRequested) if phase.is_cancellable() => {
            fail(&mut state, CrawlPhase::Cancelled, CrawlError::Cancelled)
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn apply_status(state: &mut CrawlState, report: StatusReport) -> Vec<Effect> {
    let (job_id, completed, total, status) = match state.apply_report(report) {
        Some(job) => (job.id.clone(), job.completed, job.total, job.status),
        None => return Vec::new(),
    };

    let mut effects = vec![Effect::ReportProgress {
        completed,
        total,
        status,
    }];
    match status {
        CrawlStatus::Completed => {
            state.set_phase(CrawlPhase::Saving);
            effects.push(Effect::RequestSave { job_id });
        }
        CrawlStatus::Failed => {
            effects.extend(fail(
                state,
                CrawlPhase::Failed,
                CrawlError::JobFailed { job_id },
            ));
        }
        _ if state.attempts() >= state.policy().max_attempts => {
            let attempts = state.attempts();
            effects.extend(fail(
                state,
                CrawlPhase::TimedOut,
                CrawlError::Timeout { attempts },
            ));
        }
        _ => effects.push(Effect::SchedulePoll {
            job_id,
            attempt: state.attempts() + 1,
            delay: state.policy().interval,
        }),
    }
    effects
}

fn fail(state: &mut CrawlState, phase: CrawlPhase, error: CrawlError) -> Vec<Effect> {
    state.finish(phase);
    vec![Effect::ResetProgress, Effect::Finished(Err(error))]
}
