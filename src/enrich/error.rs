use thiserror::Error;

/// Failures of the optional enrichment call. The orchestrator treats every
/// variant the same way: log and fall back to the offline result.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Enrichment service is not configured: {0}")]
    MissingCredentials(String),

    #[error("Invalid enrichment response: {0}")]
    InvalidResponse(String),

    #[error("Enrichment request timed out after {0}s")]
    Timeout(u64),
}

impl From<serde_json::Error> for EnrichmentError {
    fn from(err: serde_json::Error) -> Self {
        EnrichmentError::InvalidResponse(err.to_string())
    }
}
