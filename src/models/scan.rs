use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Classification label assigned to a scanned domain.
///
/// The server may grow new labels; anything unrecognized deserializes as
/// `Unknown` instead of failing the whole result page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Prediction {
    Benign,
    Suspicious,
    Malicious,
    #[serde(other)]
    Unknown,
}

/// Request to scan a single domain.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ScanRequest {
    #[garde(length(min = 1, max = 255))]
    pub domain: String,

    #[garde(skip)]
    pub use_safelist: bool,
}

/// Request to start a batch scan job.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct BatchScanRequest {
    #[garde(length(min = 1, max = 10_000))]
    pub domains: Vec<String>,

    #[garde(skip)]
    pub use_safelist: bool,
}

/// Classification output for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub id: i64,
    pub domain: String,
    pub prediction: Prediction,
    pub confidence: f64,
    pub method: String,
    pub reason: String,
    pub stage: Option<String>,
    pub latency_ms: f64,
    #[serde(default)]
    pub typosquatting_target: Option<String>,
    #[serde(default)]
    pub edit_distance: Option<i64>,
    #[serde(default)]
    pub safelist_tier: Option<String>,
    #[serde(default)]
    pub features: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_unknown_catch_all() {
        let p: Prediction = serde_json::from_str("\"QUARANTINED\"").unwrap();
        assert_eq!(p, Prediction::Unknown);

        let p: Prediction = serde_json::from_str("\"MALICIOUS\"").unwrap();
        assert_eq!(p, Prediction::Malicious);
    }

    #[test]
    fn batch_request_bounds() {
        let empty = BatchScanRequest {
            domains: vec![],
            use_safelist: true,
        };
        assert!(empty.validate().is_err());

        let ok = BatchScanRequest {
            domains: vec!["example.com".to_string()],
            use_safelist: true,
        };
        assert!(ok.validate().is_ok());
    }
}
