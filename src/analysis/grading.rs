use crate::analysis::metrics::LifetimeMetrics;
use crate::models::{GradeLetter, PerformanceGrade, Trade};

/// Minimum trades before the consistency score is meaningful.
pub const MIN_CONSISTENCY_SAMPLE: usize = 5;

const PF_WEIGHT: f64 = 0.45;
const WR_WEIGHT: f64 = 0.35;
const CONSISTENCY_WEIGHT: f64 = 0.20;

/// 1-10 measure of P&L volatility relative to magnitude, sign-agnostic.
///
/// Coefficient of variation = stddev(pnl) / mean(|pnl|), mapped through
/// `round(10 * e^(-0.6 * cv))` and clamped to [1, 10]. Identical outcomes
/// (cv = 0) score the full 10. Returns 0 below the minimum sample or when
/// every P&L is zero.
pub fn consistency_score(trades: &[Trade]) -> u8 {
    if trades.len() < MIN_CONSISTENCY_SAMPLE {
        return 0;
    }

    let n = trades.len() as f64;
    let mean = trades.iter().map(|t| t.pnl).sum::<f64>() / n;
    let variance = trades
        .iter()
        .map(|t| (t.pnl - mean).powi(2))
        .sum::<f64>()
        / n;
    let mean_abs = trades.iter().map(|t| t.pnl.abs()).sum::<f64>() / n;
    if mean_abs == 0.0 {
        return 0;
    }

    let cv = variance.sqrt() / mean_abs;
    let score = (10.0 * (-0.6 * cv).exp()).round();
    score.clamp(1.0, 10.0) as u8
}

fn profit_factor_score(pf: f64) -> f64 {
    if pf.is_infinite() || pf > 2.0 {
        10.0
    } else if pf > 1.5 {
        8.0
    } else if pf > 1.2 {
        6.0
    } else if pf > 1.0 {
        4.0
    } else {
        2.0
    }
}

fn win_rate_score(wr: f64) -> f64 {
    if wr > 65.0 {
        10.0
    } else if wr > 55.0 {
        8.0
    } else if wr > 50.0 {
        6.0
    } else if wr > 40.0 {
        4.0
    } else {
        2.0
    }
}

/// A-D letter grade from the weighted profit-factor, win-rate and
/// consistency sub-scores.
pub fn grade(metrics: &LifetimeMetrics, consistency: u8) -> PerformanceGrade {
    let total = PF_WEIGHT * profit_factor_score(metrics.profit_factor)
        + WR_WEIGHT * win_rate_score(metrics.win_rate)
        + CONSISTENCY_WEIGHT * consistency as f64;

    let letter = if total > 8.5 {
        GradeLetter::A
    } else if total > 7.0 {
        GradeLetter::B
    } else if total > 5.0 {
        GradeLetter::C
    } else {
        GradeLetter::D
    };

    PerformanceGrade {
        letter,
        summary: letter.summary().to_string(),
    }
}
