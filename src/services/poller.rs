use std::time::Duration;

use tokio::time::sleep;

use crate::models::job::{BatchJob, JobStatus};
use crate::services::api::{ApiError, ScanApi};

/// Terminal outcome of a poll loop, carrying the final snapshot.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Completed(BatchJob),
    Failed(BatchJob),
}

impl PollOutcome {
    pub fn job(&self) -> &BatchJob {
        match self {
            PollOutcome::Completed(job) | PollOutcome::Failed(job) => job,
        }
    }
}

/// Drives a batch job to a terminal state by polling its status endpoint.
///
/// One request per interval; each response overwrites the snapshot and is
/// handed to the observer before the status is re-evaluated. A transport
/// error ends the loop immediately — there is no retry here; restarting is
/// the caller's decision. Cancellation is dropping the returned future: no
/// further requests go out, though one already in flight cannot be recalled.
pub struct BatchPoller<'a, A: ScanApi> {
    api: &'a A,
    interval: Duration,
}

impl<'a, A: ScanApi> BatchPoller<'a, A> {
    pub fn new(api: &'a A, interval: Duration) -> Self {
        Self { api, interval }
    }

    /// Poll `job` until the server reports `completed` or `failed`.
    ///
    /// A snapshot that is already terminal returns at once without issuing
    /// any request.
    pub async fn run<F>(&self, job: BatchJob, mut on_update: F) -> Result<PollOutcome, ApiError>
    where
        F: FnMut(&BatchJob),
    {
        match job.status {
            JobStatus::Completed => return Ok(PollOutcome::Completed(job)),
            JobStatus::Failed => return Ok(PollOutcome::Failed(job)),
            JobStatus::Pending | JobStatus::Processing => {}
        }

        let job_id = job.id;

        loop {
            sleep(self.interval).await;

            let snapshot = self.api.batch_status(job_id).await?;
            metrics::counter!("batch_polls_total").increment(1);

            tracing::debug!(
                job_id,
                status = %snapshot.status,
                processed = snapshot.processed_domains,
                total = snapshot.total_domains,
                "poll"
            );

            on_update(&snapshot);

            match snapshot.status {
                JobStatus::Completed => return Ok(PollOutcome::Completed(snapshot)),
                JobStatus::Failed => return Ok(PollOutcome::Failed(snapshot)),
                JobStatus::Pending | JobStatus::Processing => {}
            }
        }
    }
}
