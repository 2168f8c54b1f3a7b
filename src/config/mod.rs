use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the threat-detection API (e.g., "http://localhost:8000")
    pub api_base_url: String,

    /// Bearer token sent with every request
    pub api_token: String,

    /// Delay between job status polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Largest batch the server accepts in a single submission
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Page size used when fetching batch results
    #[serde(default = "default_results_page_size")]
    pub results_page_size: u32,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_batch_size() -> usize {
    10_000
}

fn default_results_page_size() -> u32 {
    50
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
