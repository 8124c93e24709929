use crate::models::{sorted_chronologically, Streak, StreakImpact, StreakKind, Trade};

/// A trailing run shorter than this is not reported.
pub const MIN_STREAK_LEN: usize = 3;
/// Runs at or above this length are flagged high impact.
pub const HIGH_IMPACT_LEN: usize = 5;

impl Streak {
    pub fn impact(&self) -> StreakImpact {
        if self.length >= HIGH_IMPACT_LEN {
            StreakImpact::High
        } else {
            StreakImpact::Low
        }
    }
}

/// Current consecutive win/loss run over the most recent trades.
///
/// Input order does not matter; trades are sorted by the composite
/// chronological key first. A zero-P&L trade breaks the run.
pub fn detect(trades: &[Trade]) -> Option<Streak> {
    if trades.len() < MIN_STREAK_LEN {
        return None;
    }

    let sorted = sorted_chronologically(trades);
    let latest = sorted.last()?;
    let kind = if latest.is_win() {
        StreakKind::Win
    } else if latest.is_loss() {
        StreakKind::Loss
    } else {
        return None;
    };

    let length = sorted
        .iter()
        .rev()
        .take_while(|t| match kind {
            StreakKind::Win => t.is_win(),
            StreakKind::Loss => t.is_loss(),
        })
        .count();

    if length >= MIN_STREAK_LEN {
        Some(Streak { kind, length })
    } else {
        None
    }
}
