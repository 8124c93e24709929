use serde::{Deserialize, Serialize};

use crate::models::Trade;

/// Lifetime aggregate metrics over a trade list. These are the authoritative
/// numbers every other component (grading, trends, insights) reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeMetrics {
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub total_pnl: f64,
    pub gross_profit: f64,
    /// Magnitude of all losing P&L, always >= 0.
    pub gross_loss: f64,
    /// Percentage in [0, 100]; 0 when there are no trades.
    pub win_rate: f64,
    /// Gross profit over gross loss magnitude; +inf with profits and no
    /// losses, 0 with neither.
    pub profit_factor: f64,
    pub avg_win: f64,
    /// Mean losing-trade magnitude, always >= 0.
    pub avg_loss: f64,
}

pub fn compute(trades: &[Trade]) -> LifetimeMetrics {
    let mut m = LifetimeMetrics {
        trade_count: trades.len(),
        ..Default::default()
    };

    for trade in trades {
        m.total_pnl += trade.pnl;
        if trade.is_win() {
            m.gross_profit += trade.pnl;
            m.win_count += 1;
        } else if trade.is_loss() {
            m.gross_loss += trade.pnl.abs();
            m.loss_count += 1;
        }
    }

    m.win_rate = win_rate(m.win_count, m.trade_count);
    m.profit_factor = profit_factor(m.gross_profit, m.gross_loss);
    if m.win_count > 0 {
        m.avg_win = m.gross_profit / m.win_count as f64;
    }
    if m.loss_count > 0 {
        m.avg_loss = m.gross_loss / m.loss_count as f64;
    }

    m
}

/// Win percentage in [0, 100]; 0 when `total` is 0.
pub fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    wins as f64 / total as f64 * 100.0
}

/// Gross profit over gross loss magnitude. +inf when there is profit and no
/// loss; 0 when there is neither.
pub fn profit_factor(gross_profit: f64, gross_loss: f64) -> f64 {
    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::test_support::trade;

    #[test]
    fn metrics_over_mixed_trades() {
        let trades = vec![
            trade("2026-01-05", None, 100.0),
            trade("2026-01-06", None, -50.0),
            trade("2026-01-07", None, 200.0),
            trade("2026-01-08", None, -50.0),
        ];
        let m = compute(&trades);

        assert_eq!(m.trade_count, 4);
        assert_eq!(m.win_count, 2);
        assert_eq!(m.loss_count, 2);
        assert_eq!(m.total_pnl, 200.0);
        assert_eq!(m.win_rate, 50.0);
        assert_eq!(m.profit_factor, 3.0);
        assert_eq!(m.avg_win, 150.0);
        assert_eq!(m.avg_loss, 50.0);
    }

    #[test]
    fn profit_factor_is_infinite_without_losses() {
        let trades = vec![
            trade("2026-01-05", None, 10.0),
            trade("2026-01-06", None, 30.0),
        ];
        let m = compute(&trades);
        assert!(m.profit_factor.is_infinite());
        assert_eq!(m.avg_loss, 0.0);
    }

    #[test]
    fn zero_pnl_trades_count_as_neither_win_nor_loss() {
        let trades = vec![
            trade("2026-01-05", None, 0.0),
            trade("2026-01-06", None, 25.0),
        ];
        let m = compute(&trades);
        assert_eq!(m.win_count, 1);
        assert_eq!(m.loss_count, 0);
        assert_eq!(m.win_rate, 50.0);
    }

    #[test]
    fn win_rate_and_profit_factor_are_never_nan() {
        let m = compute(&[]);
        assert!(!m.win_rate.is_nan());
        assert!(!m.profit_factor.is_nan());
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.profit_factor, 0.0);
    }
}
