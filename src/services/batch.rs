use std::time::Duration;

use garde::Validate;

use crate::config::AppConfig;
use crate::models::job::BatchJob;
use crate::models::scan::{BatchScanRequest, ScanResult};
use crate::services::api::{ApiError, ScanApi};
use crate::services::poller::{BatchPoller, PollOutcome};
use crate::services::validation::{self, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] ApiError),

    #[error("batch job {} failed on the server", .job.id)]
    JobFailed { job: BatchJob },
}

/// Final state of a completed batch: the terminal snapshot plus every
/// fetched result, in server order.
#[derive(Debug)]
pub struct BatchReport {
    pub job: BatchJob,
    pub results: Vec<ScanResult>,
}

/// End-to-end batch workflow: validate, submit, poll, fetch.
pub struct BatchRunner<A: ScanApi> {
    api: A,
    poll_interval: Duration,
    max_batch_size: usize,
    results_page_size: u32,
}

impl<A: ScanApi> BatchRunner<A> {
    pub fn new(api: A, config: &AppConfig) -> Self {
        Self {
            api,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_batch_size: config.max_batch_size,
            results_page_size: config.results_page_size,
        }
    }

    /// Run a batch to completion.
    ///
    /// `candidates` is raw user input; it is sanitized, deduped, and bounds-
    /// checked before anything touches the network. Submission failure means
    /// no job exists and polling never starts. `on_update` sees every status
    /// snapshot the poll loop receives. Results are fetched once, only when
    /// the server reports `completed`; a server-side failure surfaces as
    /// [`BatchError::JobFailed`] with the final snapshot attached.
    pub async fn run<F>(
        &self,
        candidates: Vec<String>,
        use_safelist: bool,
        mut on_update: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&BatchJob),
    {
        let domains = validation::prepare_domains(candidates, self.max_batch_size)?;

        let request = BatchScanRequest {
            domains,
            use_safelist,
        };
        request.validate().map_err(ValidationError::from)?;

        let job = self.api.submit_batch(&request).await?;
        metrics::counter!("batch_jobs_submitted_total").increment(1);

        tracing::info!(
            job_id = job.id,
            total = job.total_domains,
            status = %job.status,
            "batch job accepted"
        );

        on_update(&job);

        let poller = BatchPoller::new(&self.api, self.poll_interval);
        let outcome = poller.run(job, &mut on_update).await?;

        match outcome {
            PollOutcome::Completed(job) => {
                metrics::counter!("batch_jobs_completed_total").increment(1);

                let results = self.fetch_all_results(job.id).await?;
                tracing::info!(
                    job_id = job.id,
                    results = results.len(),
                    malicious = job.malicious_count,
                    suspicious = job.suspicious_count,
                    benign = job.benign_count,
                    "batch job completed"
                );

                Ok(BatchReport { job, results })
            }
            PollOutcome::Failed(job) => {
                metrics::counter!("batch_jobs_failed_total").increment(1);
                tracing::warn!(
                    job_id = job.id,
                    error = job.error_message.as_deref().unwrap_or("unknown"),
                    "batch job failed on server"
                );
                Err(BatchError::JobFailed { job })
            }
        }
    }

    /// Page through the results endpoint in order. A page shorter than the
    /// page size is the last one.
    pub async fn fetch_all_results(&self, job_id: i64) -> Result<Vec<ScanResult>, ApiError> {
        let mut results = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self
                .api
                .batch_results(job_id, page, self.results_page_size)
                .await?;
            let len = batch.len();
            results.extend(batch);

            if len < self.results_page_size as usize {
                break;
            }
            page += 1;
        }

        Ok(results)
    }
}
