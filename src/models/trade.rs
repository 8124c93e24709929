use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::tags::TradeTags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Long,
    Short,
}

/// One journaled trade. Immutable once persisted; edits are a full replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    pub pair: String,
    pub pnl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<TradeType>,
    #[serde(default)]
    pub tags: TradeTags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

impl Trade {
    /// Generate a fresh trade id (`TRADE-<millis>-<uuid prefix>`).
    pub fn generate_id() -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        let prefix = uuid.split('-').next().unwrap_or("0");
        format!(
            "TRADE-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            prefix
        )
    }

    /// Composite chronological ordering key: date, then time. An absent
    /// time sorts before any timed trade on the same date.
    pub fn chronological_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        (self.date, self.time)
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < 0.0
    }
}

/// Copy of the trade list sorted by the composite chronological key,
/// oldest first. Components that need "most recent N trades" must go
/// through this, never through insertion order.
pub fn sorted_chronologically(trades: &[Trade]) -> Vec<Trade> {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(Trade::chronological_key);
    sorted
}
