use std::collections::HashMap;

use crate::analysis::metrics;
use crate::models::{TagKey, TagStat, Trade};

/// Minimum trade sample before a tag is ranked. Keeps one-off tags out of
/// the significant lists.
pub const MIN_TAG_SAMPLE: usize = 3;

/// Top-N used in the compact UI summary.
pub const TOP_SUMMARY: usize = 3;
/// Top-N used in the full report.
pub const TOP_REPORT: usize = 5;

#[derive(Debug, Clone, Default)]
struct TagAccum {
    total_pnl: f64,
    trade_count: usize,
    win_count: usize,
}

/// Aggregate P&L per tag. Every tag value a trade carries, across all
/// categories, receives the trade's full P&L contribution.
pub fn aggregate(trades: &[Trade]) -> HashMap<TagKey, (f64, usize, usize)> {
    let mut accum: HashMap<TagKey, TagAccum> = HashMap::new();

    for trade in trades {
        for key in trade.tags.flatten() {
            let entry = accum.entry(key).or_default();
            entry.total_pnl += trade.pnl;
            entry.trade_count += 1;
            if trade.is_win() {
                entry.win_count += 1;
            }
        }
    }

    accum
        .into_iter()
        .map(|(k, a)| (k, (a.total_pnl, a.trade_count, a.win_count)))
        .collect()
}

/// All per-tag stats, unranked.
pub fn tag_stats(trades: &[Trade]) -> Vec<TagStat> {
    aggregate(trades)
        .into_iter()
        .map(|(key, (total_pnl, trade_count, win_count))| TagStat {
            tag: key.to_string(),
            total_pnl,
            trade_count,
            win_count,
            win_rate: metrics::win_rate(win_count, trade_count),
        })
        .collect()
}

/// Tags with a large enough sample to rank (`trade_count >= MIN_TAG_SAMPLE`).
pub fn significant_stats(trades: &[Trade]) -> Vec<TagStat> {
    let mut stats: Vec<TagStat> = tag_stats(trades)
        .into_iter()
        .filter(|s| s.trade_count >= MIN_TAG_SAMPLE)
        .collect();
    // Deterministic order for equal aggregates
    stats.sort_by(|a, b| a.tag.cmp(&b.tag));
    stats
}

/// Positive-P&L tags, best first, truncated to `n`.
pub fn top_profitable(stats: &[TagStat], n: usize) -> Vec<TagStat> {
    let mut profitable: Vec<TagStat> = stats
        .iter()
        .filter(|s| s.total_pnl > 0.0)
        .cloned()
        .collect();
    profitable.sort_by(|a, b| {
        b.total_pnl
            .partial_cmp(&a.total_pnl)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    profitable.truncate(n);
    profitable
}

/// Negative-P&L tags, most negative first, truncated to `n`.
pub fn top_unprofitable(stats: &[TagStat], n: usize) -> Vec<TagStat> {
    let mut unprofitable: Vec<TagStat> = stats
        .iter()
        .filter(|s| s.total_pnl < 0.0)
        .cloned()
        .collect();
    unprofitable.sort_by(|a, b| {
        a.total_pnl
            .partial_cmp(&b.total_pnl)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    unprofitable.truncate(n);
    unprofitable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::test_support::trade;
    use crate::models::{TagCategory, Trade};

    fn tagged(date: &str, pnl: f64, tags: &[(&str, &str)]) -> Trade {
        let mut t = trade(date, None, pnl);
        for (category, value) in tags {
            t.tags
                .insert(TagKey::new(category.parse().unwrap(), *value));
        }
        t
    }

    #[test]
    fn trade_contributes_to_every_tag_it_carries() {
        let trades = vec![tagged(
            "2026-02-02",
            80.0,
            &[
                ("strategy", "Breakout"),
                ("session", "London"),
                ("emotions", "Calm"),
            ],
        )];

        let stats = tag_stats(&trades);
        assert_eq!(stats.len(), 3);
        for stat in &stats {
            assert_eq!(stat.total_pnl, 80.0);
            assert_eq!(stat.trade_count, 1);
            assert_eq!(stat.win_count, 1);
            assert_eq!(stat.win_rate, 100.0);
        }
    }

    #[test]
    fn aggregation_matches_manual_tally() {
        let trades = vec![
            tagged("2026-02-02", 50.0, &[("strategy", "Breakout")]),
            tagged("2026-02-03", -20.0, &[("strategy", "Breakout"), ("mistakes", "FOMO")]),
            tagged("2026-02-04", 10.0, &[("mistakes", "FOMO")]),
        ];

        let by_tag = aggregate(&trades);
        let breakout = &by_tag[&TagKey::new(TagCategory::Strategy, "Breakout")];
        assert_eq!(*breakout, (30.0, 2, 1));
        let fomo = &by_tag[&TagKey::new(TagCategory::Mistakes, "FOMO")];
        assert_eq!(*fomo, (-10.0, 2, 1));

        // Total weighted contributions reconcile with the raw trades.
        let attributed: usize = by_tag.values().map(|(_, count, _)| count).sum();
        let manual: usize = trades.iter().map(|t| t.tags.flatten().len()).sum();
        assert_eq!(attributed, manual);
    }

    #[test]
    fn tags_below_sample_threshold_are_not_significant() {
        let mut trades = vec![
            tagged("2026-02-02", 50.0, &[("strategy", "Breakout")]),
            tagged("2026-02-03", 100.0, &[("strategy", "Breakout")]),
        ];
        assert!(significant_stats(&trades).is_empty());

        trades.push(tagged("2026-02-04", 75.0, &[("strategy", "Breakout")]));
        let stats = significant_stats(&trades);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].tag, "strategy:Breakout");
        assert_eq!(stats[0].total_pnl, 225.0);
        assert_eq!(stats[0].win_rate, 100.0);
    }

    #[test]
    fn top_lists_sort_and_truncate() {
        let stats = vec![
            TagStat { tag: "strategy:A".into(), total_pnl: 120.0, trade_count: 4, win_count: 3, win_rate: 75.0 },
            TagStat { tag: "strategy:B".into(), total_pnl: 300.0, trade_count: 5, win_count: 4, win_rate: 80.0 },
            TagStat { tag: "strategy:C".into(), total_pnl: -80.0, trade_count: 3, win_count: 1, win_rate: 33.3 },
            TagStat { tag: "strategy:D".into(), total_pnl: -200.0, trade_count: 6, win_count: 2, win_rate: 33.3 },
            TagStat { tag: "strategy:E".into(), total_pnl: 40.0, trade_count: 3, win_count: 2, win_rate: 66.7 },
        ];

        let profitable = top_profitable(&stats, 2);
        assert_eq!(profitable[0].tag, "strategy:B");
        assert_eq!(profitable[1].tag, "strategy:A");
        assert_eq!(profitable.len(), 2);

        let unprofitable = top_unprofitable(&stats, TOP_REPORT);
        assert_eq!(unprofitable[0].tag, "strategy:D");
        assert_eq!(unprofitable[1].tag, "strategy:C");
        assert_eq!(unprofitable.len(), 2);
    }
}
