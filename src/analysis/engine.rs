use thiserror::Error;

use crate::analysis::metrics::{self, LifetimeMetrics};
use crate::analysis::{grading, streaks, tags, time_windows, trends};
use crate::config::AnalysisConfig;
use crate::enrich::{digest_trades, EnrichmentPayload, EnrichmentProvider};
use crate::models::{
    AnalysisResult, Insight, InsightTopic, KeyMetrics, Observation, StreakKind, TagCategory,
    TagPerformance, TagStat, Trade,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Precondition, not a data error: the caller should prompt the user to
    /// log more trades, not to fix an input file.
    #[error("Not enough trades to analyze: have {actual}, need at least {required}")]
    NotEnoughTrades { required: usize, actual: usize },
}

/// Composes the aggregators into one `AnalysisResult`.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Offline analysis: pure, synchronous, deterministic.
    pub fn analyze(&self, trades: &[Trade]) -> Result<AnalysisResult, AnalysisError> {
        if trades.len() < self.config.min_trades {
            return Err(AnalysisError::NotEnoughTrades {
                required: self.config.min_trades,
                actual: trades.len(),
            });
        }

        // Authoritative metrics first; nothing downstream may overwrite them.
        let lifetime = metrics::compute(trades);
        let consistency = grading::consistency_score(trades);
        let performance_grade = grading::grade(&lifetime, consistency);
        let key_metrics = KeyMetrics {
            consistency_score: consistency,
            profit_factor: lifetime.profit_factor,
            win_rate: lifetime.win_rate,
            total_pnl: lifetime.total_pnl,
            trade_count: lifetime.trade_count,
            avg_win: lifetime.avg_win,
            avg_loss: lifetime.avg_loss,
        };

        let significant = tags::significant_stats(trades);
        let tag_performance = TagPerformance {
            profitable: tags::top_profitable(&significant, tags::TOP_REPORT),
            unprofitable: tags::top_unprofitable(&significant, tags::TOP_REPORT),
        };

        let actionable_insights = build_insights(trades, &significant);
        let (strengths, weaknesses) = strengths_and_weaknesses(&lifetime);

        let overall_summary = overall_summary(&lifetime, &performance_grade.letter);
        let mut key_observations = vec![
            Observation {
                text: overall_summary.clone(),
                topic: InsightTopic::Performance,
            },
            Observation {
                text: risk_profile(&lifetime),
                topic: InsightTopic::Risk,
            },
        ];
        if let Some(streak) = streaks::detect(trades) {
            key_observations.push(streak_observation(streak));
        }

        Ok(AnalysisResult {
            overall_summary,
            strengths,
            weaknesses,
            actionable_insights,
            key_observations,
            performance_grade,
            key_metrics,
            tag_performance,
        })
    }

    /// Sparse weekday-by-hour P&L grid for the calendar visualization,
    /// restricted to the configured hour range. Not an input to grading.
    pub fn weekday_grid(&self, trades: &[Trade]) -> Vec<time_windows::GridCell> {
        time_windows::weekday_hour_grid(
            trades,
            self.config.grid_start_hour,
            self.config.grid_end_hour,
        )
    }

    /// Offline analysis plus a single best-effort enrichment call. Any
    /// provider failure degrades silently to the offline-only result.
    pub async fn analyze_enriched(
        &self,
        trades: &[Trade],
        provider: &dyn EnrichmentProvider,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut result = self.analyze(trades)?;

        let digest = digest_trades(trades);
        match provider.enrich(&digest).await {
            Ok(payload) => merge_enrichment(&mut result, payload),
            Err(e) => {
                log::warn!("Enrichment unavailable, keeping offline analysis: {}", e);
            }
        }

        Ok(result)
    }
}

/// Bounded insight set, built in fixed priority order: best tag, worst tag,
/// worst mistake tag, trend degradation, golden hour.
fn build_insights(trades: &[Trade], significant: &[TagStat]) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(best) = tags::top_profitable(significant, 1).into_iter().next() {
        insights.push(Insight {
            pattern: format!(
                "{} is your most profitable tag: {:+.2} across {} trades ({:.0}% win rate).",
                best.tag, best.total_pnl, best.trade_count, best.win_rate
            ),
            recommendation: "Lean into this setup; it carries your edge. Look for more of these \
                             conditions before taking other trades."
                .to_string(),
            related_tags: vec![best.tag],
            topic: InsightTopic::Strategy,
        });
    }

    if let Some(worst) = tags::top_unprofitable(significant, 1).into_iter().next() {
        insights.push(Insight {
            pattern: format!(
                "{} is your biggest drag: {:+.2} across {} trades ({:.0}% win rate).",
                worst.tag, worst.total_pnl, worst.trade_count, worst.win_rate
            ),
            recommendation: "Cut size or stand aside when this label applies until the numbers \
                             turn around."
                .to_string(),
            related_tags: vec![worst.tag],
            topic: InsightTopic::Risk,
        });
    }

    let mistake_prefix = format!("{}:", TagCategory::Mistakes.as_str());
    if let Some(mistake) = significant
        .iter()
        .filter(|s| s.tag.starts_with(&mistake_prefix) && s.total_pnl < 0.0)
        .min_by(|a, b| {
            a.total_pnl
                .partial_cmp(&b.total_pnl)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    {
        insights.push(Insight {
            pattern: format!(
                "The mistake \"{}\" has cost you {:.2} over {} trades.",
                mistake.tag.trim_start_matches(&mistake_prefix),
                mistake.total_pnl.abs(),
                mistake.trade_count
            ),
            recommendation: "Add a pre-trade checklist item for this mistake and skip the trade \
                             when it fails."
                .to_string(),
            related_tags: vec![mistake.tag.clone()],
            topic: InsightTopic::Risk,
        });
    }

    if let Some(snapshot) = trends::evaluate(trades) {
        if snapshot.degraded() {
            insights.push(Insight {
                pattern: format!(
                    "Your recent {} trades are running below your baseline: win rate {:.0}% vs \
                     {:.0}% lifetime.",
                    trends::RECENT_WINDOW,
                    snapshot.recent_win_rate,
                    snapshot.lifetime_win_rate
                ),
                recommendation: "Reduce size and review your last batch of trades; something in \
                                 the market or your execution has changed."
                    .to_string(),
                related_tags: Vec::new(),
                topic: InsightTopic::Performance,
            });
        }
    }

    if let Some(golden) = time_windows::golden_hour(&time_windows::hourly_buckets(trades)) {
        insights.push(Insight {
            pattern: format!(
                "Your best hour is {:02}:00-{:02}:59, averaging {:+.2} per trade over {} trades.",
                golden.hour,
                golden.hour,
                golden.avg_pnl,
                golden.count
            ),
            recommendation: "Concentrate your trading in this window and be pickier outside it."
                .to_string(),
            related_tags: Vec::new(),
            topic: InsightTopic::Timing,
        });
    }

    insights
}

fn strengths_and_weaknesses(m: &LifetimeMetrics) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if m.win_rate > 55.0 {
        strengths.push(format!(
            "Strong win rate: {:.1}% of trades close positive.",
            m.win_rate
        ));
    } else if m.win_rate < 45.0 {
        weaknesses.push(format!(
            "Low win rate: only {:.1}% of trades close positive.",
            m.win_rate
        ));
    }

    if m.profit_factor > 1.5 {
        strengths.push(format!(
            "Healthy profit factor: gross profits are {}x gross losses.",
            format_profit_factor(m.profit_factor)
        ));
    } else if m.profit_factor < 1.0 {
        weaknesses.push(format!(
            "Profit factor below 1: losses ({:.2}) outweigh profits ({:.2}).",
            m.gross_loss, m.gross_profit
        ));
    }

    (strengths, weaknesses)
}

fn format_profit_factor(pf: f64) -> String {
    if pf.is_finite() {
        format!("{:.2}", pf)
    } else {
        "∞".to_string()
    }
}

fn overall_summary(m: &LifetimeMetrics, letter: &crate::models::GradeLetter) -> String {
    format!(
        "Analyzed {} trades: {:+.2} total P&L, {:.1}% win rate, profit factor {}, grade {:?}.",
        m.trade_count,
        m.total_pnl,
        m.win_rate,
        format_profit_factor(m.profit_factor),
        letter
    )
}

/// Qualitative risk-profile label from the avg-win/avg-loss ratio combined
/// with the win rate. Five discrete buckets.
fn risk_profile(m: &LifetimeMetrics) -> String {
    let ratio = if m.avg_loss > 0.0 {
        m.avg_win / m.avg_loss
    } else {
        f64::INFINITY
    };

    let label = if ratio >= 2.0 && m.win_rate >= 50.0 {
        "High-conviction profile: winners run more than twice your losers and you hit better \
         than half the time."
    } else if ratio >= 2.0 {
        "Home-run profile: infrequent but large winners carry the account. Expect long losing \
         stretches."
    } else if ratio >= 1.0 {
        "Balanced profile: winners and losers are similar in size, so the win rate decides \
         everything."
    } else if m.win_rate >= 60.0 {
        "Scalper profile: a high hit rate of small winners. Watch costs and the occasional \
         outsized loss."
    } else {
        "Adverse profile: losers run larger than winners without the hit rate to cover them."
    };

    label.to_string()
}

fn streak_observation(streak: crate::models::Streak) -> Observation {
    match streak.kind {
        StreakKind::Win => Observation {
            text: format!(
                "You are on a {}-trade winning streak. Stay with the process that built it.",
                streak.length
            ),
            topic: InsightTopic::Performance,
        },
        StreakKind::Loss => Observation {
            text: format!(
                "You are on a {}-trade losing streak. Consider a pause or reduced size.",
                streak.length
            ),
            topic: InsightTopic::Risk,
        },
    }
}

/// Merge narrative fields from an enrichment payload, then re-assert the
/// locally computed authoritative fields so a less reliable source can never
/// shadow them.
fn merge_enrichment(result: &mut AnalysisResult, payload: EnrichmentPayload) {
    let key_metrics = result.key_metrics.clone();
    let performance_grade = result.performance_grade.clone();
    let tag_performance = result.tag_performance.clone();

    if !payload.overall_summary.trim().is_empty() {
        result.overall_summary = payload.overall_summary;
    }
    result.strengths.extend(payload.strengths);
    result.weaknesses.extend(payload.weaknesses);
    result.actionable_insights.extend(payload.actionable_insights);
    result.key_observations.extend(payload.key_observations);
    // payload.performance_grade is deliberately dropped

    result.key_metrics = key_metrics;
    result.performance_grade = performance_grade;
    result.tag_performance = tag_performance;
}
