use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Status of a batch scan job as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed jobs never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Snapshot of a batch scan job.
///
/// The server exposes the job through two endpoints with slightly different
/// shapes: the creation response carries timestamps but no
/// `progress_percentage`, while the status endpoint carries the percentage
/// but no timestamps. Fields absent from a given response fall back to their
/// defaults, so one struct deserializes both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: i64,
    pub status: JobStatus,
    pub total_domains: u64,
    #[serde(default)]
    pub processed_domains: u64,
    #[serde(default)]
    pub malicious_count: u64,
    #[serde(default)]
    pub suspicious_count: u64,
    #[serde(default)]
    pub benign_count: u64,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub estimated_time_remaining: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_creation_response() {
        // POST /api/scan/batch: timestamps present, no percentage
        let json = r#"{
            "id": 42,
            "user_id": 1,
            "filename": null,
            "total_domains": 2,
            "processed_domains": 0,
            "malicious_count": 0,
            "suspicious_count": 0,
            "benign_count": 0,
            "status": "pending",
            "error_message": null,
            "created_at": "2026-02-01T12:00:00Z",
            "completed_at": null
        }"#;

        let job: BatchJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, 42);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.total_domains, 2);
        assert_eq!(job.progress_percentage, 0.0);
        assert!(job.created_at.is_some());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn deserializes_status_response() {
        // GET /api/scan/batch/{id}: percentage present, no timestamps
        let json = r#"{
            "id": 42,
            "status": "processing",
            "total_domains": 2,
            "processed_domains": 1,
            "malicious_count": 0,
            "suspicious_count": 0,
            "benign_count": 1,
            "progress_percentage": 50.0,
            "estimated_time_remaining": null
        }"#;

        let job: BatchJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.processed_domains, 1);
        assert_eq!(job.progress_percentage, 50.0);
        assert!(job.created_at.is_none());
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }
}
