pub mod client;
pub mod error;
pub mod types;

pub use client::{digest_trades, EnrichmentProvider, LlmEnrichment};
pub use error::EnrichmentError;
pub use types::{EnrichmentPayload, TradeDigest};
