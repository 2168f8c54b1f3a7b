use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::job::BatchJob;
use crate::models::scan::{BatchScanRequest, ScanRequest, ScanResult};

/// Remote scan API surface.
///
/// The poller and batch runner are generic over this trait; tests substitute
/// a mock, the CLI wires in [`ScanApiClient`].
#[async_trait]
pub trait ScanApi: Send + Sync {
    /// Submit a batch of domains, returning the freshly created job.
    async fn submit_batch(&self, request: &BatchScanRequest) -> Result<BatchJob, ApiError>;

    /// Fetch the latest status snapshot for a job.
    async fn batch_status(&self, job_id: i64) -> Result<BatchJob, ApiError>;

    /// Fetch one page of results for a completed job.
    async fn batch_results(
        &self,
        job_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ScanResult>, ApiError>;

    /// Classify a single domain synchronously.
    async fn scan_single(&self, request: &ScanRequest) -> Result<ScanResult, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authorization rejected by server (token missing or expired)")]
    Unauthorized,

    #[error("server returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
}

/// HTTP client for the threat-detection API.
pub struct ScanApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ScanApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ScanApi for ScanApiClient {
    async fn submit_batch(&self, request: &BatchScanRequest) -> Result<BatchJob, ApiError> {
        let response = self
            .http
            .post(format!("{}/api/scan/batch", self.base_url))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn batch_status(&self, job_id: i64) -> Result<BatchJob, ApiError> {
        let response = self
            .http
            .get(format!("{}/api/scan/batch/{}", self.base_url, job_id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn batch_results(
        &self,
        job_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<ScanResult>, ApiError> {
        let response = self
            .http
            .get(format!(
                "{}/api/scan/batch/{}/results",
                self.base_url, job_id
            ))
            .query(&[("page", page), ("page_size", page_size)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn scan_single(&self, request: &ScanRequest) -> Result<ScanResult, ApiError> {
        let response = self
            .http
            .post(format!("{}/api/scan/single", self.base_url))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        Self::decode(response).await
    }
}

/// Extract the `detail` string from an error body, falling back to the raw
/// text. The backend reports errors as `{"detail": "..."}`.
fn error_detail(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => match parsed.detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_plain_string() {
        assert_eq!(
            error_detail(r#"{"detail": "Batch size exceeds maximum limit of 10000"}"#),
            "Batch size exceeds maximum limit of 10000"
        );
    }

    #[test]
    fn error_detail_structured() {
        // Pydantic validation errors put an array in detail
        let body = r#"{"detail": [{"loc": ["body", "domains"], "msg": "field required"}]}"#;
        assert!(error_detail(body).contains("field required"));
    }

    #[test]
    fn error_detail_non_json_body() {
        assert_eq!(error_detail("  Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = ScanApiClient::new("http://localhost:8000/", "token").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }
}
