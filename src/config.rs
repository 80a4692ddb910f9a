use std::env;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the HTTP server binds to
    pub port: u16,

    /// API credential for the Pappers company registry
    pub pappers_api_token: String,

    /// Base URL of the Pappers API (overridable for testing)
    pub pappers_base_url: String,

    /// Destination URL for result dispatch
    pub webhook_url: String,

    /// Maximum number of linked-company searches in flight per job
    pub lookup_concurrency: usize,

    /// Capacity of the webhook dispatch queue
    pub dispatch_queue_capacity: usize,

    /// How long completed/failed jobs are retained before pruning (seconds)
    pub job_ttl_secs: u64,

    /// Directory for log files
    pub log_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Required environment variables:
    /// - PAPPERS_API_TOKEN: credential for the company-registry API
    /// - WEBHOOK_URL: destination for aggregated results
    ///
    /// Optional environment variables:
    /// - PORT: HTTP listen port (default: 3000)
    /// - PAPPERS_BASE_URL: registry base URL (default: https://api.pappers.fr/v2)
    /// - LOOKUP_CONCURRENCY: parallel secondary lookups per job (default: 4)
    /// - DISPATCH_QUEUE_CAPACITY: webhook queue size (default: 64)
    /// - JOB_TTL_SECS: retention for finished jobs (default: 3600)
    /// - LOG_DIR: log file directory (default: logs)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let pappers_api_token = env::var("PAPPERS_API_TOKEN")
            .map_err(|_| "PAPPERS_API_TOKEN must be set in .env file or environment".to_string())?;

        let webhook_url = env::var("WEBHOOK_URL")
            .map_err(|_| "WEBHOOK_URL must be set in .env file or environment".to_string())?;

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let pappers_base_url = env::var("PAPPERS_BASE_URL")
            .unwrap_or_else(|_| "https://api.pappers.fr/v2".to_string());

        let lookup_concurrency = env::var("LOOKUP_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4);

        let dispatch_queue_capacity = env::var("DISPATCH_QUEUE_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64);

        let job_ttl_secs = env::var("JOB_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Config {
            port,
            pappers_api_token,
            pappers_base_url,
            webhook_url,
            lookup_concurrency,
            dispatch_queue_capacity,
            job_ttl_secs,
            log_dir,
        })
    }
}
