use std::sync::Mutex;

use thiserror::Error;

use crate::models::Trade;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Trade store unavailable: {0}")]
    Unavailable(String),
}

/// Upstream collaborator that owns trade persistence. Constructed by the
/// embedding application and passed in explicitly; the analysis core never
/// reaches for process-wide storage state and never writes back during
/// analysis.
pub trait TradeStore: Send + Sync {
    fn list_trades(&self) -> Result<Vec<Trade>, StoreError>;

    /// Persist newly imported trades. Analysis-irrelevant fields (notes,
    /// photos) round-trip untouched.
    fn save_trades(&self, trades: Vec<Trade>) -> Result<(), StoreError>;
}

/// In-memory store, used by embedders without their own backend and by
/// tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: Mutex<Vec<Trade>>,
}

impl MemoryStore {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self {
            trades: Mutex::new(trades),
        }
    }
}

impl TradeStore for MemoryStore {
    fn list_trades(&self) -> Result<Vec<Trade>, StoreError> {
        let trades = self
            .trades
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(trades.clone())
    }

    fn save_trades(&self, new_trades: Vec<Trade>) -> Result<(), StoreError> {
        let mut trades = self
            .trades
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        trades.extend(new_trades);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::test_support::trade;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default();
        store
            .save_trades(vec![trade("2026-01-05", None, 40.0)])
            .unwrap();
        store
            .save_trades(vec![trade("2026-01-06", None, -15.0)])
            .unwrap();

        let trades = store.list_trades().unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].pnl, 40.0);
    }
}
