//! Offline trading-performance analysis for a personal trading journal.
//!
//! The engine is a deterministic statistics pipeline: a raw `Trade` list goes
//! through pure aggregators (tag attribution, time-of-day attribution, streak
//! and trend detection), a consistency/grading model, and an orchestrator
//! that assembles the final [`models::AnalysisResult`]. An optional
//! LLM-backed enrichment call can add narrative to the report but can never
//! displace the locally computed metrics.
//!
//! Broker-report import (`import`) converts two export formats — HTML account
//! statements and xlsx trade-history workbooks — into the canonical trade
//! shape.

pub mod analysis;
pub mod config;
pub mod enrich;
pub mod import;
pub mod models;
pub mod store;

pub use analysis::{AnalysisError, Analyzer};
pub use config::{AnalysisConfig, EnrichmentConfig};
pub use enrich::{EnrichmentError, EnrichmentProvider, LlmEnrichment};
pub use import::{ImportError, ImportOutcome};
pub use models::{AnalysisResult, Trade};
pub use store::{MemoryStore, StoreError, TradeStore};
