use serde::Serialize;

use crate::models::job::BatchJob;

/// Progress figures derived from a job snapshot.
///
/// Recomputed from scratch on every poll response — there is no state here
/// beyond the snapshot itself. The percentage is computed locally rather
/// than trusted from the wire, so a job with `total == 0` is 0% and nothing
/// ever leaves [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchProgress {
    pub total: u64,
    pub processed: u64,
    pub malicious: u64,
    pub suspicious: u64,
    pub benign: u64,
    pub percentage: f64,
}

impl BatchProgress {
    pub fn from_job(job: &BatchJob) -> Self {
        let percentage = if job.total_domains == 0 {
            0.0
        } else {
            (job.processed_domains as f64 / job.total_domains as f64 * 100.0).clamp(0.0, 100.0)
        };

        Self {
            total: job.total_domains,
            processed: job.processed_domains,
            malicious: job.malicious_count,
            suspicious: job.suspicious_count,
            benign: job.benign_count,
            percentage,
        }
    }
}
