use serde::{Deserialize, Serialize};

use crate::models::{Insight, Observation, PerformanceGrade};

/// Sanitized per-trade projection sent to the enrichment service.
///
/// Deliberately excludes notes and photos; only the fields listed here ever
/// leave the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDigest {
    pub pair: String,
    pub pnl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<crate::models::TradeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Weekday name ("Mon"..."Sun"), derived from the trade date.
    pub weekday: String,
    /// Flattened category-qualified tag strings.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Narrative additions returned by the enrichment service.
///
/// `overall_summary` is required: a response without it does not have the
/// expected shape and is rejected outright rather than partially trusted.
/// A `performance_grade` may be present on the wire but is never honored;
/// the offline-computed grade always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    pub overall_summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub actionable_insights: Vec<Insight>,
    #[serde(default)]
    pub key_observations: Vec<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_grade: Option<PerformanceGrade>,
}
