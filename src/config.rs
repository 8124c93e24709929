use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the analysis pipeline. Statistical thresholds that are part
/// of the model (streak lengths, trend window, grade cut-offs) are fixed
/// constants in their modules, not configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum number of trades before an analysis is attempted. Below this
    /// the caller gets `AnalysisError::NotEnoughTrades` and should prompt
    /// the user to log more trades.
    pub min_trades: usize,
    /// First hour (inclusive) of the weekday-by-hour grid.
    pub grid_start_hour: u32,
    /// Last hour (inclusive) of the weekday-by-hour grid.
    pub grid_end_hour: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_trades: 5,
            grid_start_hour: 7,
            grid_end_hour: 17,
        }
    }
}

/// Connection settings for the optional enrichment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Endpoint that accepts the sanitized trade digest and returns an
    /// enrichment payload.
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Hard deadline for the single best-effort request. No retries.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
