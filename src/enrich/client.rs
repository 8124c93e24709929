use async_trait::async_trait;
use chrono::Datelike;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::EnrichmentConfig;
use crate::models::Trade;

use super::error::EnrichmentError;
use super::types::{EnrichmentPayload, TradeDigest};

/// Optional external collaborator that turns a sanitized trade digest into
/// narrative additions for the report. Implementations must be best-effort:
/// a single request, no retries.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn enrich(&self, digest: &[TradeDigest]) -> Result<EnrichmentPayload, EnrichmentError>;
}

/// Build the sanitized projection sent to a provider. Notes and photos are
/// never included.
pub fn digest_trades(trades: &[Trade]) -> Vec<TradeDigest> {
    trades
        .iter()
        .map(|t| TradeDigest {
            pair: t.pair.clone(),
            pnl: t.pnl,
            trade_type: t.trade_type,
            rating: t.rating,
            weekday: t.date.weekday().to_string(),
            tags: t.tags.to_prefixed(),
        })
        .collect()
}

/// HTTP-backed enrichment provider.
pub struct LlmEnrichment {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl LlmEnrichment {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichmentError> {
        if config.endpoint.is_empty() {
            return Err(EnrichmentError::MissingCredentials(
                "no endpoint set".to_string(),
            ));
        }
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| EnrichmentError::MissingCredentials("no API key set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    fn build_headers(&self) -> Result<HeaderMap, EnrichmentError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|e| {
                EnrichmentError::MissingCredentials(format!("Invalid API key: {}", e))
            })?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl EnrichmentProvider for LlmEnrichment {
    async fn enrich(&self, digest: &[TradeDigest]) -> Result<EnrichmentPayload, EnrichmentError> {
        let headers = self.build_headers()?;
        let body = serde_json::json!({ "trades": digest });

        let response = self
            .http_client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::InvalidResponse(format!(
                "service returned {}",
                status
            )));
        }

        let raw = response.text().await?;
        let payload: EnrichmentPayload = serde_json::from_str(&raw)?;
        if payload.overall_summary.trim().is_empty() {
            return Err(EnrichmentError::InvalidResponse(
                "empty summary".to_string(),
            ));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::test_support::trade;
    use crate::models::{TagCategory, TagKey};

    #[test]
    fn digest_excludes_notes_and_photos() {
        let mut t = trade("2026-03-02", Some("09:30"), 75.0);
        t.notes = "very private journal entry".to_string();
        t.photos = vec!["base64imagedata".to_string()];
        t.tags.insert(TagKey::new(TagCategory::Strategy, "Breakout"));

        let digest = digest_trades(&[t]);
        assert_eq!(digest.len(), 1);
        assert_eq!(digest[0].pair, "EUR/USD");
        assert_eq!(digest[0].weekday, "Mon");
        assert_eq!(digest[0].tags, vec!["strategy:Breakout".to_string()]);

        let json = serde_json::to_string(&digest).unwrap();
        assert!(!json.contains("private"));
        assert!(!json.contains("base64imagedata"));
    }

    #[test]
    fn unconfigured_client_is_rejected() {
        let config = EnrichmentConfig::default();
        assert!(matches!(
            LlmEnrichment::new(&config),
            Err(EnrichmentError::MissingCredentials(_))
        ));

        let config = EnrichmentConfig {
            endpoint: "https://enrich.example/api".to_string(),
            api_key: None,
            ..Default::default()
        };
        assert!(matches!(
            LlmEnrichment::new(&config),
            Err(EnrichmentError::MissingCredentials(_))
        ));
    }

    #[test]
    fn payload_without_summary_fails_to_parse() {
        let raw = r#"{"strengths": ["good entries"]}"#;
        let parsed: Result<EnrichmentPayload, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }
}
