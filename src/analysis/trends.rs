use serde::{Deserialize, Serialize};

use crate::analysis::metrics;
use crate::models::{sorted_chronologically, Trade};

/// Size of the recent-performance window, in trades.
pub const RECENT_WINDOW: usize = 20;
/// Degradation fires when lifetime win rate exceeds the recent window's by
/// more than this many percentage points.
pub const WIN_RATE_DROP_PCT: f64 = 15.0;
/// Degradation fires when the recent profit factor falls below this fraction
/// of the lifetime profit factor.
pub const PROFIT_FACTOR_RATIO: f64 = 0.7;

/// Recent-window performance against the lifetime baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub lifetime_win_rate: f64,
    pub recent_win_rate: f64,
    pub lifetime_profit_factor: f64,
    pub recent_profit_factor: f64,
}

impl TrendSnapshot {
    /// True when recent performance has degraded against the baseline:
    /// the win rate dropped by more than `WIN_RATE_DROP_PCT` points, or the
    /// profit factor fell below `PROFIT_FACTOR_RATIO` of a finite lifetime
    /// value.
    pub fn degraded(&self) -> bool {
        if self.lifetime_win_rate - self.recent_win_rate > WIN_RATE_DROP_PCT {
            return true;
        }
        self.lifetime_profit_factor.is_finite()
            && self.recent_profit_factor < PROFIT_FACTOR_RATIO * self.lifetime_profit_factor
    }
}

/// Compare the most recent `RECENT_WINDOW` trades to the lifetime baseline.
/// Returns `None` until the history is at least twice the window size, so
/// the recent window is never the bulk of the history.
pub fn evaluate(trades: &[Trade]) -> Option<TrendSnapshot> {
    if trades.len() < 2 * RECENT_WINDOW {
        return None;
    }

    let sorted = sorted_chronologically(trades);
    let recent = &sorted[sorted.len() - RECENT_WINDOW..];

    let lifetime = metrics::compute(&sorted);
    let window = metrics::compute(recent);

    Some(TrendSnapshot {
        lifetime_win_rate: lifetime.win_rate,
        recent_win_rate: window.win_rate,
        lifetime_profit_factor: lifetime.profit_factor,
        recent_profit_factor: window.profit_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::test_support::trade;

    fn date(i: usize) -> String {
        format!("2026-01-{:02}", i % 28 + 1)
    }

    /// `early` trades followed chronologically by `late` trades.
    fn history(early: &[f64], late: &[f64]) -> Vec<Trade> {
        early
            .iter()
            .chain(late.iter())
            .enumerate()
            .map(|(i, &pnl)| {
                let mut t = trade(&date(i / 24), None, pnl);
                t.time = Some(
                    chrono::NaiveTime::from_hms_opt((i % 24) as u32, 0, 0).unwrap(),
                );
                t
            })
            .collect()
    }

    #[test]
    fn too_little_history_is_not_evaluated() {
        let pnls: Vec<f64> = vec![10.0; 39];
        let trades = history(&pnls, &[]);
        assert!(evaluate(&trades).is_none());
    }

    #[test]
    fn win_rate_collapse_fires_degradation() {
        // 30 early trades at 80% win rate, then 20 recent at 40%.
        let mut early = Vec::new();
        for i in 0..30 {
            early.push(if i % 5 == 4 { -50.0 } else { 50.0 });
        }
        let mut late = Vec::new();
        for i in 0..20 {
            late.push(if i % 5 < 2 { 50.0 } else { -50.0 });
        }

        let snapshot = evaluate(&history(&early, &late)).expect("snapshot");
        assert!(snapshot.lifetime_win_rate > snapshot.recent_win_rate);
        assert!(snapshot.degraded());
    }

    #[test]
    fn steady_performance_does_not_fire() {
        // Uniform 60% win rate with wins outsizing losses throughout.
        let pnls: Vec<f64> = (0..50)
            .map(|i| if i % 5 < 3 { 80.0 } else { -50.0 })
            .collect();
        let trades = history(&pnls, &[]);
        let snapshot = evaluate(&trades).expect("snapshot");
        assert!(!snapshot.degraded());
    }

    #[test]
    fn infinite_lifetime_profit_factor_skips_ratio_check() {
        // No losing trades at all: lifetime pf is +inf, recent pf is +inf;
        // only the win-rate branch could fire, and it does not.
        let pnls: Vec<f64> = vec![25.0; 48];
        let trades = history(&pnls, &[]);
        let snapshot = evaluate(&trades).expect("snapshot");
        assert!(snapshot.lifetime_profit_factor.is_infinite());
        assert!(!snapshot.degraded());
    }

    #[test]
    fn profit_factor_collapse_fires_even_with_stable_win_rate() {
        // Same 50% win rate everywhere; early wins are large, recent wins
        // barely cover their losses.
        let mut early = Vec::new();
        for i in 0..30 {
            early.push(if i % 2 == 0 { 200.0 } else { -50.0 });
        }
        let mut late = Vec::new();
        for i in 0..20 {
            late.push(if i % 2 == 0 { 55.0 } else { -50.0 });
        }

        let snapshot = evaluate(&history(&early, &late)).expect("snapshot");
        assert!((snapshot.lifetime_win_rate - snapshot.recent_win_rate).abs() < WIN_RATE_DROP_PCT);
        assert!(snapshot.degraded());
    }
}
