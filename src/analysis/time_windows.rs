use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::analysis::metrics;
use crate::models::Trade;

/// Minimum trades in an hour bucket before it can qualify as golden hour.
pub const MIN_HOUR_SAMPLE: usize = 5;
/// Minimum trades in a named window before it can qualify as best window.
pub const MIN_WINDOW_SAMPLE: usize = 3;

/// Named intraday windows. Non-overlapping, half-open (`start <= t < end`),
/// so each timed trade lands in at most one.
const NAMED_WINDOWS: [(&str, (u32, u32), (u32, u32)); 5] = [
    ("Opening Bell", (8, 0), (10, 0)),
    ("Late Morning", (10, 0), (12, 0)),
    ("Lunch Lull", (12, 0), (14, 0)),
    ("Afternoon Drive", (14, 0), (16, 0)),
    ("Power Hour", (16, 0), (18, 0)),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub hour: u32,
    pub pnl: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenHour {
    pub hour: u32,
    pub avg_pnl: f64,
    pub count: usize,
}

/// One populated cell of the weekday-by-hour grid. Empty cells are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub weekday: Weekday,
    pub hour: u32,
    pub pnl: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStat {
    pub name: String,
    pub pnl: f64,
    pub win_count: usize,
    pub count: usize,
    pub win_rate: f64,
}

/// Per-hour `{pnl, count}` over timed trades, sorted by hour. Hours with no
/// trades are omitted.
pub fn hourly_buckets(trades: &[Trade]) -> Vec<HourBucket> {
    let mut buckets: [(f64, usize); 24] = [(0.0, 0); 24];
    for trade in trades {
        if let Some(time) = trade.time {
            let slot = &mut buckets[time.hour() as usize];
            slot.0 += trade.pnl;
            slot.1 += 1;
        }
    }

    buckets
        .iter()
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(hour, (pnl, count))| HourBucket {
            hour: hour as u32,
            pnl: *pnl,
            count: *count,
        })
        .collect()
}

/// The hour with the highest average P&L among buckets with enough trades.
/// Reported only when that average is positive.
pub fn golden_hour(buckets: &[HourBucket]) -> Option<GoldenHour> {
    buckets
        .iter()
        .filter(|b| b.count >= MIN_HOUR_SAMPLE)
        .map(|b| GoldenHour {
            hour: b.hour,
            avg_pnl: b.pnl / b.count as f64,
            count: b.count,
        })
        .max_by(|a, b| {
            a.avg_pnl
                .partial_cmp(&b.avg_pnl)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|g| g.avg_pnl > 0.0)
}

/// Sparse weekday-by-hour grid restricted to the trading week
/// (Monday-Friday) and the `[start_hour, end_hour]` range.
pub fn weekday_hour_grid(trades: &[Trade], start_hour: u32, end_hour: u32) -> Vec<GridCell> {
    let mut cells: Vec<GridCell> = Vec::new();

    for trade in trades {
        let Some(time) = trade.time else { continue };
        let weekday = trade.date.weekday();
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            continue;
        }
        let hour = time.hour();
        if hour < start_hour || hour > end_hour {
            continue;
        }

        match cells
            .iter_mut()
            .find(|c| c.weekday == weekday && c.hour == hour)
        {
            Some(cell) => {
                cell.pnl += trade.pnl;
                cell.count += 1;
            }
            None => cells.push(GridCell {
                weekday,
                hour,
                pnl: trade.pnl,
                count: 1,
            }),
        }
    }

    cells.sort_by_key(|c| (c.weekday.num_days_from_monday(), c.hour));
    cells
}

fn window_contains(start: (u32, u32), end: (u32, u32), time: NaiveTime) -> bool {
    let start = NaiveTime::from_hms_opt(start.0, start.1, 0).expect("window start");
    let end = NaiveTime::from_hms_opt(end.0, end.1, 0).expect("window end");
    time >= start && time < end
}

/// Aggregate timed trades into the named windows. Windows with no trades
/// are still returned with zero counts so callers see the full set.
pub fn window_stats(trades: &[Trade]) -> Vec<WindowStat> {
    let mut stats: Vec<WindowStat> = NAMED_WINDOWS
        .iter()
        .map(|(name, _, _)| WindowStat {
            name: name.to_string(),
            pnl: 0.0,
            win_count: 0,
            count: 0,
            win_rate: 0.0,
        })
        .collect();

    for trade in trades {
        let Some(time) = trade.time else { continue };
        for (i, (_, start, end)) in NAMED_WINDOWS.iter().enumerate() {
            if window_contains(*start, *end, time) {
                stats[i].pnl += trade.pnl;
                stats[i].count += 1;
                if trade.is_win() {
                    stats[i].win_count += 1;
                }
                break;
            }
        }
    }

    for stat in &mut stats {
        stat.win_rate = metrics::win_rate(stat.win_count, stat.count);
    }
    stats
}

/// Highest win rate among windows with enough trades and positive P&L.
pub fn best_window(stats: &[WindowStat]) -> Option<&WindowStat> {
    stats
        .iter()
        .filter(|w| w.count >= MIN_WINDOW_SAMPLE && w.pnl > 0.0)
        .max_by(|a, b| {
            a.win_rate
                .partial_cmp(&b.win_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Most negative total P&L among losing or sub-50% windows, excluding the
/// best window by name when the two coincide.
pub fn worst_window<'a>(stats: &'a [WindowStat], best: Option<&WindowStat>) -> Option<&'a WindowStat> {
    stats
        .iter()
        .filter(|w| w.count > 0 && (w.win_rate < 50.0 || w.pnl < 0.0))
        .filter(|w| best.map(|b| b.name != w.name).unwrap_or(true))
        .min_by(|a, b| {
            a.pnl
                .partial_cmp(&b.pnl)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
